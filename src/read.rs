use std::io::{self, Read};

use crate::codec::CodecError;
use crate::engine::PullEngine;

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "stream is not open")
}

fn failed() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "stream is in a failed state")
}

/// A read façade that decompresses data from another source stream
/// on the fly
///
/// Open it on an existing [Read] providing compressed data, and read
/// the corresponding uncompressed data from it. The source may be
/// passed by value (owned, released on [DecompressReader::close]) or
/// as a `&mut` reference (borrowed).
///
/// Seeking is not supported.
///
/// ```
/// use std::io::Read;
/// use stream_press::DecompressReader;
///
/// # fn example(compressed: &[u8]) -> anyhow::Result<()> {
/// let mut reader = DecompressReader::new();
/// reader.open(compressed)?;
///
/// let mut data = Vec::new();
/// reader.read_to_end(&mut data)?;
/// # Ok(())
/// # }
/// ```
pub struct DecompressReader<R: Read> {
    engine: Option<PullEngine>,
    source: Option<R>,
    failed: bool
}

impl<R: Read> std::fmt::Debug for DecompressReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecompressReader")
            .field("open", &self.is_open())
            .field("failed", &self.failed)
            .finish()
    }
}

impl<R: Read> Default for DecompressReader<R> {
    /// Identical to [DecompressReader::new]
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Read> DecompressReader<R> {
    /// Creates a new, closed DecompressReader
    pub fn new() -> Self {
        Self {
            engine: None,
            source: None,
            failed: false
        }
    }

    /// Binds "source" and starts a fresh decompression session,
    /// discarding any state left over from a previous one. Returns
    /// self for call chaining
    ///
    /// Returns [CodecError::Unsupported] if the crate was built
    /// without a codec backend feature
    pub fn open(&mut self, source: R) -> Result<&mut Self, CodecError> {
        self.engine = Some(PullEngine::new()?);
        self.source = Some(source);
        self.failed = false;
        Ok(self)
    }

    /// Tears the session down and hands the source back, returning
    /// the reader to its closed state. Dropping the returned value
    /// releases the source; a second close returns None and releases
    /// nothing
    pub fn close(&mut self) -> Option<R> {
        self.engine = None;
        self.failed = false;
        self.source.take()
    }

    /// Returns whether a source is currently bound
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Returns whether a previous read failed. The failure is sticky
    /// until the reader is reopened
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Returns whether the end of the compressed frame was reached.
    /// Distinct from [DecompressReader::is_failed]
    pub fn is_eof(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| e.end_of_frame())
    }
}

impl<R: Read> Read for DecompressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.failed {
            return Err(failed());
        }

        let (Some(engine), Some(source)) = (&mut self.engine, &mut self.source) else {
            return Err(closed());
        };

        engine.read(source, buf).inspect_err(|_| self.failed = true)
    }
}
