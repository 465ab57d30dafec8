//! Lexer error types.

use thiserror::Error;
use tl_diagnostic::{ErrorCode, PipelineError};
use tl_ir::Span;

/// What went wrong while scanning.
///
/// `Default` is required by logos: it is the kind reported for input that
/// matches no token rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[default]
    #[error("Invalid character")]
    InvalidCharacter,
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Unterminated block comment")]
    UnterminatedComment,
    #[error("Invalid number literal")]
    InvalidNumber,
}

impl LexErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            LexErrorKind::InvalidCharacter => ErrorCode::E0002,
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::UnterminatedComment => ErrorCode::E0004,
            LexErrorKind::InvalidNumber => ErrorCode::E0003,
        }
    }
}

/// A lexer error with the offending source text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} '{text}'")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    /// Offending text, truncated to the first line.
    pub text: String,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span, slice: &str) -> Self {
        let text = slice.lines().next().unwrap_or_default().to_string();
        LexError { kind, span, text }
    }
}

impl From<LexError> for PipelineError {
    fn from(err: LexError) -> Self {
        let message = match err.kind {
            // The text of an unterminated literal is the rest of the line; the
            // position already says where it starts.
            LexErrorKind::UnterminatedString | LexErrorKind::UnterminatedComment => {
                err.kind.to_string()
            }
            LexErrorKind::InvalidCharacter | LexErrorKind::InvalidNumber => err.to_string(),
        };
        PipelineError::new(err.kind.code(), message, err.span)
    }
}

#[cfg(test)]
mod tests;
