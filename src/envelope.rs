//! Header/body split shared by both record grammars.

use std::borrow::Cow;

use memchr::{memchr, memrchr};

use crate::config::ParseMode;

/// Splits a raw record into its trimmed annotation and its body.
///
/// The annotation is the first line without the leading `>`. A record
/// without a line terminator has an empty body.
pub fn split_record(raw: &str) -> (&str, &str) {
    let (header, body) = match memchr(b'\n', raw.as_bytes()) {
        Some(pos) => (&raw[..pos], &raw[pos + 1..]),
        None => (raw, ""),
    };
    let header = header.strip_prefix('>').unwrap_or(header);
    (header.trim(), body)
}

/// Applies the body rule of `mode`.
///
/// In [`ParseMode::Extended`] everything from the first `{` to the last `}`
/// of the body is removed, even when that span covers several blocks.
pub fn prepare_body(body: &str, mode: ParseMode) -> Cow<'_, str> {
    if mode == ParseMode::Strict {
        return body.into();
    }
    let bytes = body.as_bytes();
    let Some(open) = memchr(b'{', bytes) else {
        return body.into();
    };
    match memrchr(b'}', bytes) {
        Some(close) if close > open => {
            let mut stripped = String::with_capacity(body.len() - (close + 1 - open));
            stripped.push_str(&body[..open]);
            stripped.push_str(&body[close + 1..]);
            stripped.into()
        }
        _ => body.into(),
    }
}
