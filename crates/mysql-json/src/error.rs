//! Error types for JSON parsing.

use thiserror::Error;

/// Errors produced while parsing JSON text into a [`Value`](crate::Value).
///
/// The unparsed tail quoted in messages is shortened to its first and last
/// 40 bytes when longer than 80 bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input was empty or contained only whitespace.
    #[error("cannot parse empty string")]
    Empty,
    /// Malformed JSON at byte `offset`.
    #[error("cannot parse JSON: {reason}; unparsed tail: {tail:?}")]
    Syntax {
        reason: String,
        offset: usize,
        tail: String,
    },
    /// A complete value was followed by something other than whitespace.
    #[error("unexpected tail: {0:?}")]
    UnexpectedTail(String),
    /// Nesting exceeded the parser's maximum depth.
    #[error("too big depth for the nested JSON; it exceeds {0}")]
    TooDeep(usize),
}

impl ParseError {
    /// Byte offset of a syntax error, if known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Shortens `s` to `first 40 ... last 40` bytes when it is longer than 80.
pub(crate) fn start_end_string(s: &[u8]) -> String {
    const MAX: usize = 80;
    if s.len() <= MAX {
        return String::from_utf8_lossy(s).into_owned();
    }
    let start = String::from_utf8_lossy(&s[..MAX / 2]);
    let end = String::from_utf8_lossy(&s[s.len() - MAX / 2..]);
    format!("{start}...{end}")
}
