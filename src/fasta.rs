use crate::config::{ParseMode, ReaderConfig};
use crate::envelope::{prepare_body, split_record};
use crate::error::MalformedReason;
use crate::reader::Grammar;
use crate::seqid::{IdMethod, resolve_seq_id};

/// One FASTA record with its sequence lines joined.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeqRecord {
    pub id: String,
    /// Header text after `>`, trimmed.
    pub annotation: String,
    /// Body with all whitespace removed.
    pub sequence: String,
}

/// Plain FASTA grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fasta;

impl Grammar for Fasta {
    type Record = SeqRecord;

    fn parse(raw: &str, config: &ReaderConfig) -> Result<SeqRecord, MalformedReason> {
        Ok(parse_fasta_record(raw, config.id_method, config.parse_mode))
    }
}

/// Parses one raw record (`>` header line followed by sequence lines).
pub fn parse_fasta_record(raw: &str, id_method: IdMethod, mode: ParseMode) -> SeqRecord {
    let (annotation, body) = split_record(raw);
    let body = prepare_body(body, mode);

    SeqRecord {
        id: resolve_seq_id(annotation, id_method),
        annotation: annotation.to_string(),
        sequence: body.chars().filter(|c| !c.is_whitespace()).collect(),
    }
}
