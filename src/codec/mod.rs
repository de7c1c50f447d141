use thiserror::Error;

/// Provides a [Compressor] and [Decompressor] for the zlib format using [flate2]
#[cfg(feature = "zlib")]
pub mod zlib;

/// Lowest accepted compression level
pub const MIN_LEVEL: u32 = 1;

/// Highest accepted compression level
pub const MAX_LEVEL: u32 = 9;

/// Default compression level, balancing ratio and speed
pub const DEFAULT_LEVEL: u32 = 6;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("corrupt compressed data: {0}")]
    Corrupt(String),

    #[error("no codec backend was compiled in")]
    Unsupported
}

/// Streaming decompression session. A single [Decompressor::update] call
/// may consume only part of its input and produce zero or more output
/// bytes; dictionary state is carried between calls.
pub trait Decompressor {
    /// Tries to decompress data
    ///
    /// The return values are the amount of input bytes consumed,
    /// and the decompressed bytes produced by this call
    fn update(&mut self, data: &[u8]) -> Result<(usize, &[u8]), CodecError>;

    /// Returns whether the end of the compressed frame has been reached
    fn finished(&self) -> bool;
}

/// Streaming compression session. Output is appended to a caller buffer;
/// a frame is only complete once [Compressor::finish] has run.
pub trait Compressor {
    /// Compresses a block of data, appending the output to "out"
    fn update(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<(), CodecError>;

    /// Emits all output the session has buffered so far, so that
    /// everything written up to this point becomes decodable
    fn flush(&mut self, out: &mut Vec<u8>) -> Result<(), CodecError>;

    /// Finalizes the frame, appending the end-of-frame marker to "out".
    /// The session must not be updated afterwards
    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CodecError>;
}

/// Tries to create a [Decompressor] for the default backend
///
/// Returns [CodecError::Unsupported] if the crate was built
/// without a codec backend feature
pub fn new_decompressor() -> Result<Box<dyn Decompressor>, CodecError> {
    #[cfg(feature = "zlib")]
    return Ok(Box::new(zlib::ZlibDecompressor::new()));

    #[cfg(not(feature = "zlib"))]
    Err(CodecError::Unsupported)
}

/// Tries to create a [Compressor] for the default backend. The level is
/// clamped to [MIN_LEVEL]..=[MAX_LEVEL]
///
/// Returns [CodecError::Unsupported] if the crate was built
/// without a codec backend feature
pub fn new_compressor(level: u32) -> Result<Box<dyn Compressor>, CodecError> {
    #[cfg(feature = "zlib")]
    return Ok(Box::new(zlib::ZlibCompressor::new(level)));

    #[cfg(not(feature = "zlib"))]
    {
        let _ = level;
        Err(CodecError::Unsupported)
    }
}
