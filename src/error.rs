use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReaderError>;

/// Fatal errors. The reader that returned one is finished.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Why a single record was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("gap token '{token}' does not have integer bounds")]
    InvalidGap { token: String },

    #[error("gap token '{token}' does not satisfy begin < end")]
    EmptyGap { token: String },

    #[error("record is not valid UTF-8")]
    InvalidUtf8,
}

/// Diagnostic for a record that was dropped while the stream kept going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed record #{index} ({header}): {reason}")]
pub struct MalformedRecord {
    /// Zero-based position of the raw record in the stream.
    pub index: usize,
    /// Header line, lossily decoded.
    pub header: String,
    pub reason: MalformedReason,
}
