use crate::config::BoundaryMode;
use crate::error::{ProcessingError, Result};
use crate::models::Chunk;
use crate::utils::constants::{DEFAULT_CHUNK_BUFFER_SIZE, DEFAULT_LINE_TERMINATOR};
use crate::utils::progress::ProgressReporter;
use bstr::ByteSlice;
use crossbeam::channel::Sender;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, info};

/// Sequentially reads a file into fixed-size chunks and publishes them to a
/// bounded queue. Dropping the sender on return closes the queue.
pub struct ChunkReader {
    buffer_size: usize,
    boundary_mode: BoundaryMode,
    line_terminator: u8,
}

/// What the reader pushed onto the queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    pub chunks: u64,
    pub bytes: u64,
}

impl ChunkReader {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            boundary_mode: BoundaryMode::Split,
            line_terminator: DEFAULT_LINE_TERMINATOR,
        }
    }

    pub fn with_boundary_mode(mut self, boundary_mode: BoundaryMode) -> Self {
        self.boundary_mode = boundary_mode;
        self
    }

    pub fn with_line_terminator(mut self, line_terminator: u8) -> Self {
        self.line_terminator = line_terminator;
        self
    }

    pub fn open(path: &Path) -> Result<File> {
        File::open(path).map_err(|source| ProcessingError::InputOpen {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read the whole file at `path` onto `sender`
    pub fn read_file(
        &self,
        path: &Path,
        sender: Sender<Chunk>,
        progress: Option<&ProgressReporter>,
    ) -> Result<ReaderStats> {
        let file = Self::open(path)?;
        info!(
            "Reading {} in {} byte chunks ({:?} boundaries)",
            path.display(),
            self.buffer_size,
            self.boundary_mode
        );
        self.read_into(file, sender, progress)
    }

    /// Read `source` to end-of-file onto `sender`
    pub fn read_into<R: Read>(
        &self,
        mut source: R,
        sender: Sender<Chunk>,
        progress: Option<&ProgressReporter>,
    ) -> Result<ReaderStats> {
        let stats = match self.boundary_mode {
            BoundaryMode::Split => self.read_split(&mut source, &sender, progress)?,
            BoundaryMode::Stitch => self.read_stitched(&mut source, &sender, progress)?,
        };

        debug!(
            "Reader finished: {} chunks, {} bytes",
            stats.chunks, stats.bytes
        );
        Ok(stats)
    }

    fn read_split<R: Read>(
        &self,
        source: &mut R,
        sender: &Sender<Chunk>,
        progress: Option<&ProgressReporter>,
    ) -> Result<ReaderStats> {
        let mut stats = ReaderStats::default();

        loop {
            let mut data = vec![0u8; self.buffer_size];
            let filled = fill_buffer(source, &mut data, stats.bytes)?;
            if filled == 0 {
                break;
            }
            data.truncate(filled);

            let chunk = Chunk::new(stats.chunks, stats.bytes, data);
            stats.chunks += 1;
            stats.bytes += filled as u64;
            publish(sender, chunk)?;

            if let Some(p) = progress {
                p.increment(filled as u64);
            }

            if filled < self.buffer_size {
                break;
            }
        }

        Ok(stats)
    }

    fn read_stitched<R: Read>(
        &self,
        source: &mut R,
        sender: &Sender<Chunk>,
        progress: Option<&ProgressReporter>,
    ) -> Result<ReaderStats> {
        let mut stats = ReaderStats::default();
        let mut carry: Vec<u8> = Vec::new();
        let mut chunk_offset: u64 = 0;

        loop {
            let mut data = std::mem::take(&mut carry);
            let start = data.len();
            data.resize(start + self.buffer_size, 0);

            let filled = fill_buffer(source, &mut data[start..], stats.bytes)?;
            data.truncate(start + filled);
            stats.bytes += filled as u64;

            if let Some(p) = progress {
                p.increment(filled as u64);
            }

            if filled < self.buffer_size {
                if !data.is_empty() {
                    publish(sender, Chunk::new(stats.chunks, chunk_offset, data))?;
                    stats.chunks += 1;
                }
                break;
            }

            match data.rfind_byte(self.line_terminator) {
                Some(position) => {
                    carry = data.split_off(position + 1);
                    let length = data.len() as u64;
                    publish(sender, Chunk::new(stats.chunks, chunk_offset, data))?;
                    stats.chunks += 1;
                    chunk_offset += length;
                }
                // Line longer than the buffer: keep growing until it ends
                None => carry = data,
            }
        }

        Ok(stats)
    }
}

impl Default for ChunkReader {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_BUFFER_SIZE)
    }
}

/// Read until `buffer` is full or the source is exhausted
fn fill_buffer<R: Read>(source: &mut R, buffer: &mut [u8], offset: u64) -> Result<usize> {
    let mut filled = 0;

    while filled < buffer.len() {
        match source.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(ProcessingError::Read {
                    offset: offset + filled as u64,
                    source,
                })
            }
        }
    }

    Ok(filled)
}

fn publish(sender: &Sender<Chunk>, chunk: Chunk) -> Result<()> {
    sender
        .send(chunk)
        .map_err(|_| ProcessingError::ChunkQueueClosed)
}
