//! MPA records: sequences stored as literal runs and gap intervals.
//!
//! ```text
//! >seq1 aligned to template
//! 10-15 ABCDE 20-22
//! ```
//!
//! A token of the form `begin-end` is a half-open gap interval, anything else
//! is literal sequence. The record above flattens to `-----ABCDE--`.

use crate::config::{ParseMode, ReaderConfig};
use crate::envelope::{prepare_body, split_record};
use crate::error::MalformedReason;
use crate::reader::Grammar;
use crate::seqid::{IdMethod, resolve_seq_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// Half-open interval, `begin < end`.
    Gap(usize, usize),
}

impl Segment {
    /// Length of the segment once flattened.
    pub fn len(&self) -> usize {
        match self {
            Segment::Literal(text) => text.chars().count(),
            Segment::Gap(begin, end) => end.saturating_sub(*begin),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Segment::Gap(..))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MpaRecord {
    pub id: String,
    pub annotation: String,
    pub segments: Vec<Segment>,
}

impl MpaRecord {
    /// Positions in `segments` holding gaps.
    pub fn gap_indices(&self) -> Vec<usize> {
        self.indices_where(Segment::is_gap)
    }

    /// Positions in `segments` holding literals.
    pub fn literal_indices(&self) -> Vec<usize> {
        self.indices_where(|s| !s.is_gap())
    }

    fn indices_where(&self, pred: impl Fn(&Segment) -> bool) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| pred(*s))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn flatten(&self, gap_char: char) -> String {
        flatten(&self.segments, gap_char)
    }

    pub fn flattened_len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}

/// MPA grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mpa;

impl Grammar for Mpa {
    type Record = MpaRecord;

    fn parse(raw: &str, config: &ReaderConfig) -> Result<MpaRecord, MalformedReason> {
        parse_mpa_record(raw, config.id_method, config.parse_mode)
    }
}

/// Classification of one whitespace-delimited body token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(&'a str),
    Gap(usize, usize),
    Malformed(MalformedReason),
}

pub fn classify_token(token: &str) -> Token<'_> {
    if !token.find('-').is_some_and(|i| i > 0) {
        return Token::Literal(token);
    }

    // Fields past the second one are ignored: `1-2-3` is the gap 1..2.
    let mut fields = token.split('-');
    let bounds = (
        fields.next().unwrap_or("").parse::<usize>(),
        fields.next().unwrap_or("").parse::<usize>(),
    );
    match bounds {
        (Ok(begin), Ok(end)) if begin < end => Token::Gap(begin, end),
        (Ok(_), Ok(_)) => Token::Malformed(MalformedReason::EmptyGap {
            token: token.to_string(),
        }),
        _ => Token::Malformed(MalformedReason::InvalidGap {
            token: token.to_string(),
        }),
    }
}

/// Parses one raw MPA record. A single bad gap token rejects the whole record.
pub fn parse_mpa_record(
    raw: &str,
    id_method: IdMethod,
    mode: ParseMode,
) -> Result<MpaRecord, MalformedReason> {
    let (annotation, body) = split_record(raw);
    let body = prepare_body(body, mode);

    let segments = body
        .split_whitespace()
        .map(|token| match classify_token(token) {
            Token::Literal(text) => Ok(Segment::Literal(text.to_string())),
            Token::Gap(begin, end) => Ok(Segment::Gap(begin, end)),
            Token::Malformed(reason) => Err(reason),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MpaRecord {
        id: resolve_seq_id(annotation, id_method),
        annotation: annotation.to_string(),
        segments,
    })
}

/// Renders gaps as runs of `gap_char` and concatenates everything in order.
pub fn flatten(segments: &[Segment], gap_char: char) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Gap(begin, end) => {
                out.extend(std::iter::repeat_n(gap_char, end.saturating_sub(*begin)))
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<MpaRecord, MalformedReason> {
        parse_mpa_record(raw, IdMethod::Smart, ParseMode::Strict)
    }

    #[test]
    fn test_segments_and_flatten() {
        let record = parse(">seq1 template\n10-15 ABCDE 20-22\n").unwrap();
        assert_eq!(record.id, "seq1");
        assert_eq!(
            record.segments,
            vec![
                Segment::Gap(10, 15),
                Segment::Literal("ABCDE".to_string()),
                Segment::Gap(20, 22),
            ]
        );
        assert_eq!(record.flatten('-'), "-----ABCDE--");
        assert_eq!(record.flattened_len(), 12);
        assert!(record.segments.iter().all(|s| !s.is_empty()));
        assert!(Segment::Literal(String::new()).is_empty());
    }

    #[test]
    fn test_index_views() {
        let record = parse(">s\nAB 0-3 CD\nEF 5-6\n").unwrap();
        assert_eq!(record.gap_indices(), vec![1, 4]);
        assert_eq!(record.literal_indices(), vec![0, 2, 3]);
    }

    #[test]
    fn test_classify_token() {
        assert_eq!(classify_token("3-7"), Token::Gap(3, 7));
        assert_eq!(classify_token("ACGT"), Token::Literal("ACGT"));
        assert_eq!(classify_token("-AC"), Token::Literal("-AC"));
        assert!(matches!(
            classify_token("AC-GT"),
            Token::Malformed(MalformedReason::InvalidGap { .. })
        ));
        assert_eq!(classify_token("1-2-3"), Token::Gap(1, 2));
        assert!(matches!(
            classify_token("3--5"),
            Token::Malformed(MalformedReason::InvalidGap { .. })
        ));
        assert!(matches!(
            classify_token("9-4"),
            Token::Malformed(MalformedReason::EmptyGap { .. })
        ));
    }

    #[test]
    fn test_bad_token_rejects_record() {
        let err = parse(">s\n0-3 ABC 4-x\n").unwrap_err();
        assert_eq!(err, MalformedReason::InvalidGap { token: "4-x".to_string() });
    }

    #[test]
    fn test_extended_mode() {
        let raw = ">s\n0-2 AC {note 1-x}\n";
        assert!(parse(raw).is_err());
        let record = parse_mpa_record(raw, IdMethod::Smart, ParseMode::Extended).unwrap();
        assert_eq!(record.flatten('.'), "..AC");
    }

    #[test]
    fn test_header_only() {
        let record = parse(">empty").unwrap();
        assert_eq!(record.annotation, "empty");
        assert!(record.segments.is_empty());
    }
}
