/// Provides streaming compression and decompression sessions,
/// and their backends
pub mod codec;

/// Provides the read façade for on-the-fly decompression
pub mod read;

/// Provides the write façade for on-the-fly compression
pub mod write;

mod engine;

pub use codec::{CodecError, DEFAULT_LEVEL, MAX_LEVEL, MIN_LEVEL};
pub use read::DecompressReader;
pub use write::CompressWriter;
