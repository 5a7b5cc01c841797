//! Sequence identifiers from header lines.
//!
//! Two strategies are supported. [`IdMethod::FirstWord`] takes the first
//! whitespace-delimited word verbatim. [`IdMethod::Smart`] understands the
//! usual database prefixes:
//!
//! ```text
//! >sp|P0AE31|ARTM_ECOL6 Arginine ABC transporter    -> P0AE31
//! >UniRef100_Q9XYZ1 Cluster: ...                     -> Q9XYZ1
//! >1abc_A,                                           -> 1abc_A
//! ```

use crate::error::ReaderError;

/// Database tags whose id is the second `|` field.
const DB_PREFIXES: [&str; 6] = ["sp", "lcl", "tr", "gi", "r", "p"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdMethod {
    FirstWord,
    #[default]
    Smart,
}

impl TryFrom<u8> for IdMethod {
    type Error = ReaderError;

    fn try_from(value: u8) -> Result<Self, ReaderError> {
        match value {
            0 => Ok(IdMethod::FirstWord),
            1 => Ok(IdMethod::Smart),
            other => Err(ReaderError::InvalidConfig {
                message: format!("unknown id method {other}, expected 0 or 1"),
            }),
        }
    }
}

/// Returns the id for a header, or an empty string when none can be found.
pub fn resolve_seq_id(header: &str, method: IdMethod) -> String {
    match method {
        IdMethod::FirstWord => first_word(header).to_string(),
        IdMethod::Smart => smart_id(header),
    }
}

fn first_word(s: &str) -> &str {
    s.split_whitespace().next().unwrap_or("")
}

fn smart_id(header: &str) -> String {
    let word = first_word(header.trim_start_matches('>'));
    if word.is_empty() {
        return String::new();
    }

    let id = if word.contains('|') {
        let mut fields = word.split('|');
        let first = fields.next().unwrap_or("");
        if DB_PREFIXES.contains(&first) {
            fields.next().unwrap_or("")
        } else {
            first
        }
    } else {
        word
    };
    let id = id.trim_end_matches(',');

    if id.contains("UniRef") {
        if let Some(accession) = id.split('_').nth(1) {
            return accession.to_string();
        }
    }
    id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_prefix() {
        assert_eq!(resolve_seq_id(">sp|P0AE31|ARTM_ECOL6 desc", IdMethod::Smart), "P0AE31");
        assert_eq!(resolve_seq_id("tr|A0A000|X_Y", IdMethod::Smart), "A0A000");
        assert_eq!(resolve_seq_id("gi|12345|ref|NP_1|", IdMethod::Smart), "12345");
    }

    #[test]
    fn test_unknown_prefix_keeps_first_field() {
        assert_eq!(resolve_seq_id("ABC|def|ghi", IdMethod::Smart), "ABC");
    }

    #[test]
    fn test_uniref() {
        assert_eq!(resolve_seq_id(">UniRef100_Q9XYZ1 desc", IdMethod::Smart), "Q9XYZ1");
        assert_eq!(resolve_seq_id("UniRef90", IdMethod::Smart), "UniRef90");
    }

    #[test]
    fn test_plain_and_trailing_commas() {
        assert_eq!(resolve_seq_id(">plainID desc", IdMethod::Smart), "plainID");
        assert_eq!(resolve_seq_id("1abc_A,, chain A", IdMethod::Smart), "1abc_A");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(resolve_seq_id("", IdMethod::Smart), "");
        assert_eq!(resolve_seq_id(">", IdMethod::Smart), "");
        assert_eq!(resolve_seq_id(">   ", IdMethod::Smart), "");
        assert_eq!(resolve_seq_id("", IdMethod::FirstWord), "");
    }

    #[test]
    fn test_first_word() {
        assert_eq!(resolve_seq_id("sp|P0AE31|ARTM desc", IdMethod::FirstWord), "sp|P0AE31|ARTM");
        assert_eq!(resolve_seq_id("UniRef100_Q9 x", IdMethod::FirstWord), "UniRef100_Q9");
    }

    #[test]
    fn test_numeric_method() {
        assert_eq!(IdMethod::try_from(0).unwrap(), IdMethod::FirstWord);
        assert_eq!(IdMethod::try_from(1).unwrap(), IdMethod::Smart);
        assert!(IdMethod::try_from(7).is_err());
    }
}
