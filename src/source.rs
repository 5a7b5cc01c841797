use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config::check_chunk_size;
use crate::error::{ReaderError, Result};

/// Fixed-size chunks pulled from a byte source.
///
/// Each chunk holds `chunk_size` bytes except the last one. The source is
/// dropped as soon as it reports end-of-input or [`close`](Self::close) is
/// called.
pub struct ChunkSource<R> {
    inner: Option<R>,
    chunk_size: usize,
    buf: Vec<u8>,
    bytes_read: u64,
}

impl ChunkSource<File> {
    pub fn open<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<Self> {
        check_chunk_size(chunk_size)?;
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReaderError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file, chunk_size))
    }
}

impl<R: Read> ChunkSource<R> {
    /// A `chunk_size` of 0 is raised to 1. Entry points that return a
    /// `Result` reject 0 with [`ReaderError::InvalidConfig`] instead.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            inner: Some(reader),
            chunk_size,
            buf: Vec::with_capacity(chunk_size.min(1 << 20)),
            bytes_read: 0,
        }
    }

    /// Returns the next chunk, or `None` once the source is exhausted or closed.
    pub fn next_chunk(&mut self) -> io::Result<Option<&[u8]>> {
        let Some(reader) = self.inner.as_mut() else {
            return Ok(None);
        };

        self.buf.clear();
        let n = reader
            .by_ref()
            .take(self.chunk_size as u64)
            .read_to_end(&mut self.buf)?;
        if n == 0 {
            self.close();
            return Ok(None);
        }
        self.bytes_read += n as u64;
        Ok(Some(&self.buf))
    }

    pub fn close(&mut self) {
        self.inner = None;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_fixed_size_chunks() {
        let mut source = ChunkSource::new(Cursor::new(&b"abcdefg"[..]), 3);

        assert_eq!(source.next_chunk().unwrap(), Some(&b"abc"[..]));
        assert_eq!(source.next_chunk().unwrap(), Some(&b"def"[..]));
        assert_eq!(source.next_chunk().unwrap(), Some(&b"g"[..]));
        assert_eq!(source.next_chunk().unwrap(), None);
        assert!(source.is_closed());
        assert_eq!(source.bytes_read(), 7);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut source = ChunkSource::new(Cursor::new(&b"abc"[..]), 2);
        source.close();
        source.close();
        assert_eq!(source.next_chunk().unwrap(), None);
    }

    #[test]
    fn test_zero_chunk_size() {
        let source = ChunkSource::new(Cursor::new(&b"ab"[..]), 0);
        assert_eq!(source.chunk_size(), 1);
        let err = ChunkSource::open("/nonexistent/seq.fa", 0).err().unwrap();
        assert!(matches!(err, ReaderError::InvalidConfig { .. }));
    }

    #[test]
    fn test_open_missing_file() {
        let err = ChunkSource::open("/nonexistent/seq.fa", 10).err().unwrap();
        assert!(matches!(err, ReaderError::Open { .. }));
    }
}
