//! Memory-bounded block reading of FASTA and MPA sequence files.
//!
//! Input is pulled in fixed-size chunks so files far larger than memory can
//! be read in one forward pass. Records split across chunk boundaries are
//! reassembled before parsing.
//!
//! ```no_run
//! use seq_blocks::{FastaReader, ReaderConfig};
//!
//! let mut reader = FastaReader::from_path("proteins.fa", ReaderConfig::default())?;
//! while let Some(batch) = reader.next_batch() {
//!     for record in batch?.records {
//!         println!("{}\t{}", record.id, record.sequence.len());
//!     }
//! }
//! # Ok::<(), seq_blocks::ReaderError>(())
//! ```

mod config;
mod envelope;
mod error;
mod fasta;
mod lines;
mod mpa;
mod reader;
mod seqid;
mod source;
mod splitter;

pub use config::{DEFAULT_CHUNK_SIZE, ParseMode, ReaderConfig};
pub use envelope::{prepare_body, split_record};
pub use error::{MalformedReason, MalformedRecord, ReaderError, Result};
pub use fasta::{Fasta, SeqRecord, parse_fasta_record};
pub use lines::LineReader;
pub use mpa::{Mpa, MpaRecord, Segment, Token, classify_token, flatten, parse_mpa_record};
pub use reader::{
    FastaReader, Grammar, MpaReader, ReadBatch, RecordReader, Records, count_records, read_fasta,
    read_mpa,
};
pub use seqid::{IdMethod, resolve_seq_id};
pub use source::ChunkSource;
pub use splitter::{DelimiterCounter, RecordSplitter};
