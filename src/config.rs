use crate::error::{ReaderError, Result};
use crate::seqid::IdMethod;

/// Bytes requested from the source per read step.
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Body grammar variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Strict,
    /// Drops the span from the first `{` to the last `}` of the body
    /// before the body is read.
    Extended,
}

impl TryFrom<u8> for ParseMode {
    type Error = ReaderError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ParseMode::Strict),
            1 => Ok(ParseMode::Extended),
            other => Err(ReaderError::InvalidConfig {
                message: format!("unknown parse mode {other}, expected 0 or 1"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    pub chunk_size: usize,
    pub id_method: IdMethod,
    pub parse_mode: ParseMode,
    /// Only used when flattening MPA records.
    pub gap_char: char,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            id_method: IdMethod::default(),
            parse_mode: ParseMode::default(),
            gap_char: '-',
        }
    }
}

impl ReaderConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_id_method(mut self, id_method: IdMethod) -> Self {
        self.id_method = id_method;
        self
    }

    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = parse_mode;
        self
    }

    pub fn with_gap_char(mut self, gap_char: char) -> Self {
        self.gap_char = gap_char;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_chunk_size(self.chunk_size)
    }
}

pub(crate) fn check_chunk_size(chunk_size: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(ReaderError::InvalidConfig {
            message: "chunk_size must be at least 1".to_string(),
        });
    }
    Ok(())
}
