//! Error types for rencode encoding and decoding.

/// Errors that can occur while encoding or decoding rencode values.
#[derive(Debug, thiserror::Error)]
pub enum RencodeError {
    #[error("unexpected end of input: need {needed} bytes but only {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("invalid type code: {0}")]
    InvalidTag(u8),

    #[error("type mismatch: expected {expected}, found {found} (type code {tag})")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
        tag: u8,
    },

    #[error("number text of {0} characters exceeds the maximum of 63")]
    NumberTooLong(usize),

    #[error("invalid big number: {0:?}")]
    InvalidBigNumber(String),

    #[error("invalid length field: {0}")]
    InvalidLength(String),

    #[error("invalid UTF-8 string: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("nesting depth exceeds limit of {0}")]
    DepthLimitExceeded(usize),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RencodeError {
    /// Builds an end-of-input error for a read of `needed` bytes.
    pub(crate) fn eof(needed: usize, remaining: usize) -> Self {
        Self::UnexpectedEof { needed, remaining }
    }

    /// Returns `true` if more input could have completed the decode.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}
