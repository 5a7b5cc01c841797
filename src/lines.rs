use std::fs::File;
use std::io::Read;
use std::path::Path;

use memchr::memchr_iter;

use crate::config::DEFAULT_CHUNK_SIZE;
use crate::error::Result;
use crate::source::ChunkSource;

/// Block-reading line reader.
///
/// Every call to [`next_lines`](Self::next_lines) consumes one chunk and
/// returns the lines completed by it, without their `\n` or `\r\n`
/// terminator. Empty lines are kept. A partial line at the end of a chunk is
/// held back until its terminator (or end-of-input) arrives.
pub struct LineReader<R> {
    source: ChunkSource<R>,
    carry: Vec<u8>,
    finished: bool,
}

impl LineReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<Self> {
        Ok(Self::from_source(ChunkSource::open(path, chunk_size)?))
    }
}

impl<R: Read> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE, reader)
    }

    /// A `chunk_size` of 0 is read as 1, see [`ChunkSource::new`].
    pub fn with_chunk_size(chunk_size: usize, reader: R) -> Self {
        Self::from_source(ChunkSource::new(reader, chunk_size))
    }

    fn from_source(source: ChunkSource<R>) -> Self {
        Self {
            source,
            carry: Vec::new(),
            finished: false,
        }
    }

    /// Returns the lines completed by the next chunk, or `None` at end-of-input.
    ///
    /// The returned list may be empty when a chunk holds no terminator.
    pub fn next_lines(&mut self) -> Option<Result<Vec<String>>> {
        if self.finished {
            return None;
        }

        let chunk = match self.source.next_chunk() {
            Ok(Some(chunk)) => chunk,
            Ok(None) => {
                self.finished = true;
                if self.carry.is_empty() {
                    return None;
                }
                let last = std::mem::take(&mut self.carry);
                return Some(Ok(vec![decode_line(last)]));
            }
            Err(e) => {
                self.finished = true;
                self.source.close();
                return Some(Err(e.into()));
            }
        };

        let mut lines = Vec::new();
        let mut start = 0;
        for pos in memchr_iter(b'\n', chunk) {
            self.carry.extend_from_slice(&chunk[start..pos]);
            lines.push(decode_line(std::mem::take(&mut self.carry)));
            start = pos + 1;
        }
        self.carry.extend_from_slice(&chunk[start..]);

        Some(Ok(lines))
    }

    pub fn close(&mut self) {
        self.finished = true;
        self.carry.clear();
        self.source.close();
    }
}

fn decode_line(mut line: Vec<u8>) -> String {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    match String::from_utf8(line) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
