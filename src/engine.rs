use std::io::{self, Read, Write};

use crate::codec::{self, Compressor, Decompressor, CodecError};

/// How many compressed bytes are pulled from the source at once
pub(crate) const CHUNK_SIZE: usize = 4096;

/// How many uncompressed bytes accumulate before a block is pushed out
pub(crate) const BLOCK_SIZE: usize = 4096;

fn corrupt(e: CodecError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Fixed-capacity buffer for compressed bytes in transit, with
/// read and write cursors. 0 <= read <= write <= capacity holds
/// at all times.
#[derive(Debug)]
pub(crate) struct ChunkBuffer {
    data: Box<[u8]>,
    read_cursor: usize,
    write_cursor: usize
}

impl ChunkBuffer {
    fn new() -> Self {
        Self {
            data: vec![0; CHUNK_SIZE].into_boxed_slice(),
            read_cursor: 0,
            write_cursor: 0
        }
    }

    fn is_empty(&self) -> bool {
        self.read_cursor == self.write_cursor
    }

    fn is_full(&self) -> bool {
        self.write_cursor - self.read_cursor == self.data.len()
    }

    fn readable(&self) -> &[u8] {
        &self.data[self.read_cursor..self.write_cursor]
    }

    fn consume(&mut self, amount: usize) {
        self.read_cursor += amount;
        if self.read_cursor == self.write_cursor {
            self.read_cursor = 0;
            self.write_cursor = 0;
        }
    }

    /// Tops the buffer up from "source", compacting first if needed.
    /// Returns how many bytes were read; 0 means source exhaustion,
    /// as a full buffer never touches the source
    fn fill_from(&mut self, source: &mut dyn Read) -> io::Result<usize> {
        if self.is_full() {
            return Ok(0);
        }

        if self.read_cursor > 0 {
            self.data.copy_within(self.read_cursor..self.write_cursor, 0);
            self.write_cursor -= self.read_cursor;
            self.read_cursor = 0;
        }

        let count = source.read(&mut self.data[self.write_cursor..])?;
        self.write_cursor += count;
        Ok(count)
    }
}

/// Decompression half of the buffer engine. Owns the compressed
/// in-transit buffer, the decompressed lookahead and the codec
/// session; pulls from an externally provided source on underflow.
pub(crate) struct PullEngine {
    chunk: ChunkBuffer,
    lookahead: Vec<u8>,
    lookahead_cursor: usize,
    session: Box<dyn Decompressor>,
    source_exhausted: bool,
    end_of_frame: bool
}

impl PullEngine {
    pub(crate) fn new() -> Result<Self, CodecError> {
        Ok(Self {
            chunk: ChunkBuffer::new(),
            lookahead: Vec::new(),
            lookahead_cursor: 0,
            session: codec::new_decompressor()?,
            source_exhausted: false,
            end_of_frame: false
        })
    }

    pub(crate) fn end_of_frame(&self) -> bool {
        self.end_of_frame && self.lookahead_cursor == self.lookahead.len()
    }

    /// Serves decompressed bytes into "buf", pulling compressed chunks
    /// from "source" whenever the lookahead runs dry (underflow).
    /// Returns 0 only at the end of the compressed frame
    pub(crate) fn read(&mut self, source: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            // Serve what has already been decompressed
            if self.lookahead_cursor < self.lookahead.len() {
                let available = &self.lookahead[self.lookahead_cursor..];
                let count = std::cmp::min(buf.len(), available.len());
                buf[..count].copy_from_slice(&available[..count]);

                self.lookahead_cursor += count;
                if self.lookahead_cursor == self.lookahead.len() {
                    self.lookahead.clear();
                    self.lookahead_cursor = 0;
                }

                return Ok(count);
            }

            if self.end_of_frame {
                return Ok(0);
            }

            if !self.chunk.is_empty() {
                let (consumed, produced) = self.session
                    .update(self.chunk.readable())
                    .map_err(corrupt)?;

                let progressed = consumed > 0 || !produced.is_empty();
                self.lookahead.extend_from_slice(produced);
                self.chunk.consume(consumed);

                if self.session.finished() {
                    // Anything left in the chunk is trailing data past
                    // the frame end; it is not ours to interpret
                    self.end_of_frame = true;
                    continue;
                }

                if progressed {
                    continue;
                }
            }

            // The session needs more input than the chunk holds. A
            // session stalled on a full chunk is corrupt data, not a
            // short source
            if self.chunk.is_full() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "decompression made no progress"
                ));
            }

            if self.source_exhausted || self.chunk.fill_from(source)? == 0 {
                self.source_exhausted = true;
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "compressed stream was truncated"
                ));
            }
        }
    }
}

/// Compression half of the buffer engine. Accumulates caller bytes
/// into a pending block and pushes compressed output to an externally
/// provided sink on overflow.
pub(crate) struct PushEngine {
    block: Vec<u8>,
    staged: Vec<u8>,
    session: Box<dyn Compressor>
}

impl PushEngine {
    pub(crate) fn new(level: u32) -> Result<Self, CodecError> {
        Ok(Self {
            block: Vec::with_capacity(BLOCK_SIZE),
            staged: Vec::new(),
            session: codec::new_compressor(level)?
        })
    }

    /// Accepts caller bytes, compressing and draining a full block to
    /// "dest" once the threshold is reached (overflow)
    pub(crate) fn write(&mut self, dest: &mut dyn Write, data: &[u8]) -> io::Result<usize> {
        self.block.extend_from_slice(data);

        if self.block.len() >= BLOCK_SIZE {
            self.overflow(dest)?;
        }

        Ok(data.len())
    }

    /// Compresses the pending partial block and forces all buffered
    /// output out to "dest", so everything written so far is decodable
    pub(crate) fn flush(&mut self, dest: &mut dyn Write) -> io::Result<()> {
        self.overflow(dest)?;

        self.staged.clear();
        self.session.flush(&mut self.staged).map_err(corrupt)?;
        dest.write_all(&self.staged)?;
        dest.flush()
    }

    /// Compresses the pending partial block, emits the end-of-frame
    /// marker and flushes "dest". The engine must not be written to
    /// afterwards
    pub(crate) fn finish(&mut self, dest: &mut dyn Write) -> io::Result<()> {
        self.overflow(dest)?;

        self.staged.clear();
        self.session.finish(&mut self.staged).map_err(corrupt)?;
        dest.write_all(&self.staged)?;
        dest.flush()
    }

    fn overflow(&mut self, dest: &mut dyn Write) -> io::Result<()> {
        if self.block.is_empty() {
            return Ok(());
        }

        self.staged.clear();
        self.session
            .update(&self.block, &mut self.staged)
            .map_err(corrupt)?;
        self.block.clear();

        dest.write_all(&self.staged)
    }
}
