use std::io::{self, Write};

use crate::codec::{CodecError, DEFAULT_LEVEL};
use crate::engine::PushEngine;

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "stream is not open")
}

fn failed() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "stream is in a failed state")
}

/// A write façade that compresses data to another destination stream
/// on the fly
///
/// Open it on an existing [Write] that accepts compressed data, and
/// write the uncompressed source data to it. Writes are buffered into
/// blocks and are not guaranteed visible in the destination until a
/// block fills up, [Write::flush] is called, or the writer is closed;
/// only [CompressWriter::close] (or dropping the writer) guarantees
/// the complete frame, including its end marker, has been written out.
///
/// Seeking is not supported.
///
/// ```
/// use std::io::Write;
/// use stream_press::CompressWriter;
///
/// # fn example() -> anyhow::Result<()> {
/// let mut compressed = Vec::new();
///
/// let mut writer = CompressWriter::new();
/// writer.open(&mut compressed)?;
/// writer.write_all(b"some data")?;
/// writer.close()?;
/// # Ok(())
/// # }
/// ```
pub struct CompressWriter<W: Write> {
    engine: Option<PushEngine>,
    dest: Option<W>,
    failed: bool
}

impl<W: Write> std::fmt::Debug for CompressWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressWriter")
            .field("open", &self.is_open())
            .field("failed", &self.failed)
            .finish()
    }
}

impl<W: Write> Default for CompressWriter<W> {
    /// Identical to [CompressWriter::new]
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> CompressWriter<W> {
    /// Creates a new, closed CompressWriter
    pub fn new() -> Self {
        Self {
            engine: None,
            dest: None,
            failed: false
        }
    }

    /// Binds "dest" with the default compression level.
    /// See [CompressWriter::open_with_level]
    pub fn open(&mut self, dest: W) -> Result<&mut Self, CodecError> {
        self.open_with_level(dest, DEFAULT_LEVEL)
    }

    /// Binds "dest" and starts a fresh compression session at the
    /// given level, discarding any state left over from a previous
    /// session without flushing it. Out-of-range levels are clamped,
    /// never rejected. Returns self for call chaining
    ///
    /// Returns [CodecError::Unsupported] if the crate was built
    /// without a codec backend feature
    pub fn open_with_level(&mut self, dest: W, level: u32) -> Result<&mut Self, CodecError> {
        self.engine = Some(PushEngine::new(level)?);
        self.dest = Some(dest);
        self.failed = false;
        Ok(self)
    }

    /// Compresses any pending partial block, writes the end-of-frame
    /// marker and hands the destination back, returning the writer to
    /// its closed state. Dropping the returned value releases the
    /// destination; a second close returns None and releases nothing
    ///
    /// This is the only point at which the complete compressed frame
    /// is guaranteed to have reached the destination
    pub fn close(&mut self) -> io::Result<Option<W>> {
        let result = match (&mut self.engine, &mut self.dest) {
            // A failed writer cannot produce a valid frame; just release
            (Some(engine), Some(dest)) if !self.failed => engine.finish(dest),
            _ => Ok(())
        };

        self.engine = None;
        self.failed = false;

        match result {
            Ok(()) => Ok(self.dest.take()),
            Err(e) => {
                self.dest.take();
                Err(e)
            }
        }
    }

    /// Returns whether a destination is currently bound
    pub fn is_open(&self) -> bool {
        self.dest.is_some()
    }

    /// Returns whether a previous write failed. The failure is sticky
    /// until the writer is reopened
    pub fn is_failed(&self) -> bool {
        self.failed
    }
}

impl<W: Write> Write for CompressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failed {
            return Err(failed());
        }

        let (Some(engine), Some(dest)) = (&mut self.engine, &mut self.dest) else {
            return Err(closed());
        };

        engine.write(dest, buf).inspect_err(|_| self.failed = true)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.failed {
            return Err(failed());
        }

        let (Some(engine), Some(dest)) = (&mut self.engine, &mut self.dest) else {
            return Err(closed());
        };

        engine.flush(dest).inspect_err(|_| self.failed = true)
    }
}

impl<W: Write> Drop for CompressWriter<W> {
    /// Closing on drop keeps the last partial block from being
    /// silently truncated when [CompressWriter::close] was never
    /// called explicitly. Errors are unreported here; call close
    /// to observe them
    fn drop(&mut self) {
        let _ = self.close();
    }
}
