use std::fmt::Debug;

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use super::{Compressor, Decompressor, CodecError, MIN_LEVEL, MAX_LEVEL};

// Scratch space handed to a single inflate call
const INFLATE_OUT_CAP: usize = 8192;

// Capacity reserved ahead of a single deflate call
const DEFLATE_OUT_STEP: usize = 4096;

/// Wrapper around a [flate2::Decompress] session (zlib format)
pub struct ZlibDecompressor {
    session: Decompress,
    out: Vec<u8>,
    finished: bool
}

impl Debug for ZlibDecompressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZlibDecompressor")
            .field("finished", &self.finished)
            .finish()
    }
}

impl Default for ZlibDecompressor {
    /// Identical to [ZlibDecompressor::new]
    fn default() -> Self {
        Self::new()
    }
}

impl ZlibDecompressor {
    /// Creates a new ZlibDecompressor with a fresh session
    pub fn new() -> Self {
        Self {
            session: Decompress::new(true),
            out: vec![0; INFLATE_OUT_CAP],
            finished: false
        }
    }
}

impl Decompressor for ZlibDecompressor {
    fn update(&mut self, data: &[u8]) -> Result<(usize, &[u8]), CodecError> {
        if self.finished {
            return Ok((data.len(), &[]));
        }

        let in_before = self.session.total_in();
        let out_before = self.session.total_out();

        let status = self.session
            .decompress(data, &mut self.out, FlushDecompress::None)
            .map_err(|e| CodecError::Corrupt(e.to_string()))?;

        if status == Status::StreamEnd {
            self.finished = true;
        }

        let consumed = (self.session.total_in() - in_before) as usize;
        let produced = (self.session.total_out() - out_before) as usize;

        Ok((consumed, &self.out[..produced]))
    }

    fn finished(&self) -> bool {
        self.finished
    }
}

/// Wrapper around a [flate2::Compress] session (zlib format)
pub struct ZlibCompressor(Compress);

impl Debug for ZlibCompressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZlibCompressor")
            .finish()
    }
}

impl ZlibCompressor {
    /// Creates a new ZlibCompressor with a fresh session. The level
    /// is clamped to the valid range instead of being rejected
    pub fn new(level: u32) -> Self {
        let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        Self(Compress::new(Compression::new(level), true))
    }

    fn drive(&mut self, mut data: &[u8], out: &mut Vec<u8>, flush: FlushCompress) -> Result<(), CodecError> {
        loop {
            if out.capacity() == out.len() {
                out.reserve(DEFLATE_OUT_STEP);
            }

            let in_before = self.0.total_in();
            let status = self.0
                .compress_vec(data, out, flush)
                .map_err(|e| CodecError::Corrupt(e.to_string()))?;

            let consumed = (self.0.total_in() - in_before) as usize;
            data = &data[consumed..];

            if status == Status::StreamEnd {
                return Ok(());
            }

            // Finishing ends through StreamEnd alone
            if flush == FlushCompress::Finish {
                continue;
            }

            // A partially filled output buffer means the session has
            // nothing more to emit for this call
            if data.is_empty() && (flush == FlushCompress::None || out.len() < out.capacity()) {
                return Ok(());
            }
        }
    }
}

impl Compressor for ZlibCompressor {
    fn update(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<(), CodecError> {
        self.drive(data, out, FlushCompress::None)
    }

    fn flush(&mut self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        self.drive(&[], out, FlushCompress::Sync)
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        self.drive(&[], out, FlushCompress::Finish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress_fully(level: u32, payload: &[u8]) -> Vec<u8> {
        let mut compressor = ZlibCompressor::new(level);
        let mut compressed = Vec::new();
        compressor.update(payload, &mut compressed).unwrap();
        compressor.finish(&mut compressed).unwrap();
        compressed
    }

    #[test]
    fn session_state_carries_across_calls() {
        let mut compressor = ZlibCompressor::new(6);
        let mut compressed = Vec::new();
        compressor.update(b"hello ", &mut compressed).unwrap();
        compressor.update(b"world", &mut compressed).unwrap();
        compressor.finish(&mut compressed).unwrap();

        let mut decompressor = ZlibDecompressor::new();
        let mut payload = Vec::new();
        let mut rest = &compressed[..];
        while !decompressor.finished() {
            let (consumed, produced) = decompressor.update(rest).unwrap();
            payload.extend_from_slice(produced);
            rest = &rest[consumed..];
        }

        assert_eq!(payload, b"hello world");
    }

    #[test]
    fn out_of_range_levels_are_clamped() {
        let payload = b"clamped levels still compress".repeat(100);

        assert_eq!(compress_fully(0, &payload), compress_fully(1, &payload));
        assert_eq!(compress_fully(10, &payload), compress_fully(9, &payload));
        assert_eq!(compress_fully(u32::MAX, &payload), compress_fully(9, &payload));
    }

    #[test]
    fn invalid_header_is_corrupt() {
        let mut decompressor = ZlibDecompressor::new();
        assert!(matches!(
            decompressor.update(&[0xff, 0xff, 0xff, 0xff]),
            Err(CodecError::Corrupt(..))
        ));
    }
}
