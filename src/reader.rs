use std::fs::File;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

use memchr::memchr;
use tracing::{debug, trace, warn};

use crate::config::{ReaderConfig, check_chunk_size};
use crate::envelope::split_record;
use crate::error::{MalformedReason, MalformedRecord, Result};
use crate::fasta::{Fasta, SeqRecord};
use crate::mpa::{Mpa, MpaRecord};
use crate::source::ChunkSource;
use crate::splitter::{DelimiterCounter, RecordSplitter};

/// Turns one raw record into a structured record.
pub trait Grammar {
    type Record;

    fn parse(raw: &str, config: &ReaderConfig) -> std::result::Result<Self::Record, MalformedReason>;
}

/// Records resolved by one read step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadBatch<T> {
    pub records: Vec<T>,
    /// Records dropped in this step.
    pub malformed: Vec<MalformedRecord>,
}

impl<T> Default for ReadBatch<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            malformed: Vec::new(),
        }
    }
}

impl<T> ReadBatch<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.malformed.is_empty()
    }

    pub fn extend(&mut self, other: ReadBatch<T>) {
        self.records.extend(other.records);
        self.malformed.extend(other.malformed);
    }
}

/// Block-reading record reader.
///
/// Each call to [`next_batch`](Self::next_batch) reads one chunk of
/// `chunk_size` bytes and returns the records completed by it. A record whose
/// text is split across chunks is carried over and returned by the step that
/// sees the next delimiter, or by the final step at end-of-input.
pub struct RecordReader<R, G: Grammar> {
    source: ChunkSource<R>,
    splitter: RecordSplitter,
    config: ReaderConfig,
    finished: bool,
    raw_index: usize,
    records_emitted: usize,
    malformed_count: usize,
    _grammar: PhantomData<fn() -> G>,
}

pub type FastaReader<R> = RecordReader<R, Fasta>;
pub type MpaReader<R> = RecordReader<R, Mpa>;

impl<G: Grammar> RecordReader<File, G> {
    pub fn from_path<P: AsRef<Path>>(path: P, config: ReaderConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();
        let source = ChunkSource::open(path, config.chunk_size)?;
        debug!(path = %path.display(), chunk_size = source.chunk_size(), "opened sequence file");
        Ok(Self::from_source(source, config))
    }
}

impl<R: Read, G: Grammar> RecordReader<R, G> {
    /// Creates a reader with the default configuration.
    pub fn new(reader: R) -> Self {
        let config = ReaderConfig::default();
        Self::from_source(ChunkSource::new(reader, config.chunk_size), config)
    }

    pub fn with_config(reader: R, config: ReaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_source(ChunkSource::new(reader, config.chunk_size), config))
    }

    fn from_source(source: ChunkSource<R>, config: ReaderConfig) -> Self {
        Self {
            source,
            splitter: RecordSplitter::new(),
            config,
            finished: false,
            raw_index: 0,
            records_emitted: 0,
            malformed_count: 0,
            _grammar: PhantomData,
        }
    }

    /// Returns the records completed by the next chunk, or `None` at end-of-input.
    ///
    /// An empty batch means the chunk only extended a pending record. After an
    /// error the reader is finished.
    pub fn next_batch(&mut self) -> Option<Result<ReadBatch<G::Record>>> {
        if self.finished {
            return None;
        }

        let step = match self.source.next_chunk() {
            Ok(Some(chunk)) => {
                let raws = self.splitter.push(chunk);
                trace!(
                    chunk_len = chunk.len(),
                    raw_records = raws.len(),
                    carry_len = self.splitter.carry_len(),
                    "read step"
                );
                Some(raws)
            }
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                self.splitter = RecordSplitter::new();
                self.source.close();
                return Some(Err(e.into()));
            }
        };

        let raws = match step {
            Some(raws) => raws,
            None => {
                self.finished = true;
                match self.splitter.finish() {
                    Some(raw) => vec![raw],
                    None => {
                        self.log_end();
                        return None;
                    }
                }
            }
        };

        let batch = self.resolve(raws);
        if self.finished {
            self.log_end();
        }
        Some(Ok(batch))
    }

    /// Iterates over single records, skipping malformed ones.
    pub fn records(&mut self) -> Records<'_, R, G> {
        Records {
            reader: self,
            pending: Vec::new().into_iter(),
        }
    }

    /// Releases the source. Safe to call more than once.
    pub fn close(&mut self) {
        self.finished = true;
        self.splitter = RecordSplitter::new();
        self.source.close();
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn records_emitted(&self) -> usize {
        self.records_emitted
    }

    pub fn malformed_count(&self) -> usize {
        self.malformed_count
    }

    pub fn bytes_read(&self) -> u64 {
        self.source.bytes_read()
    }

    fn resolve(&mut self, raws: Vec<Vec<u8>>) -> ReadBatch<G::Record> {
        let mut batch = ReadBatch::default();
        for raw in raws {
            let index = self.raw_index;
            self.raw_index += 1;
            if raw.is_empty() {
                continue;
            }

            let parsed = match String::from_utf8(raw) {
                Ok(text) => G::parse(&text, &self.config)
                    .map_err(|reason| (split_record(&text).0.to_string(), reason)),
                Err(e) => Err((lossy_header(e.as_bytes()), MalformedReason::InvalidUtf8)),
            };

            match parsed {
                Ok(record) => batch.records.push(record),
                Err((header, reason)) => {
                    warn!(index, header = %header, reason = %reason, "dropping malformed record");
                    batch.malformed.push(MalformedRecord {
                        index,
                        header,
                        reason,
                    });
                }
            }
        }

        self.records_emitted += batch.records.len();
        self.malformed_count += batch.malformed.len();
        batch
    }

    fn log_end(&self) {
        if self.splitter.discarded() > 0 {
            debug!(
                bytes = self.splitter.discarded(),
                "discarded bytes before the first record"
            );
        }
        debug!(
            records = self.records_emitted,
            malformed = self.malformed_count,
            bytes = self.source.bytes_read(),
            "reached end of input"
        );
    }
}

fn lossy_header(raw: &[u8]) -> String {
    let end = memchr(b'\n', raw).unwrap_or(raw.len());
    let header = String::from_utf8_lossy(&raw[..end]);
    header
        .strip_prefix('>')
        .unwrap_or(&header)
        .trim()
        .to_string()
}

/// Record-at-a-time view over a [`RecordReader`].
pub struct Records<'a, R, G: Grammar> {
    reader: &'a mut RecordReader<R, G>,
    pending: std::vec::IntoIter<G::Record>,
}

impl<R: Read, G: Grammar> Iterator for Records<'_, R, G> {
    type Item = Result<G::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.next() {
                return Some(Ok(record));
            }
            match self.reader.next_batch()? {
                Ok(batch) => self.pending = batch.records.into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn read_all<G: Grammar, P: AsRef<Path>>(
    path: P,
    config: ReaderConfig,
) -> Result<ReadBatch<G::Record>> {
    let mut reader = RecordReader::<File, G>::from_path(path, config)?;
    let mut all = ReadBatch::default();
    while let Some(batch) = reader.next_batch() {
        all.extend(batch?);
    }
    Ok(all)
}

/// Reads every record of a FASTA file.
pub fn read_fasta<P: AsRef<Path>>(path: P, config: ReaderConfig) -> Result<ReadBatch<SeqRecord>> {
    read_all::<Fasta, _>(path, config)
}

/// Reads every record of an MPA file.
pub fn read_mpa<P: AsRef<Path>>(path: P, config: ReaderConfig) -> Result<ReadBatch<MpaRecord>> {
    read_all::<Mpa, _>(path, config)
}

/// Counts records without parsing them.
pub fn count_records<R: Read>(reader: R, chunk_size: usize) -> Result<usize> {
    check_chunk_size(chunk_size)?;
    let mut source = ChunkSource::new(reader, chunk_size);
    let mut counter = DelimiterCounter::default();
    while let Some(chunk) = source.next_chunk()? {
        counter.push(chunk);
    }
    Ok(counter.count())
}
