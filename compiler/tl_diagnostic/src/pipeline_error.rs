use thiserror::Error;
use tl_ir::Span;

use crate::span_utils::span_line_col;
use crate::{error_line, ErrorCode};

/// A stage failure that aborts the run before execution.
///
/// Each stage crate converts its own error type into this one; the driver
/// renders it with [`PipelineError::render`] once the source is at hand.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PipelineError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl PipelineError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        PipelineError {
            code,
            message: message.into(),
            span,
        }
    }

    /// Diagnostic line for this error, positioned against `source`.
    ///
    /// Errors on synthetic tokens (no span) omit the position.
    pub fn render(&self, source: &str) -> String {
        if self.span == Span::DUMMY {
            return error_line(&self.message);
        }
        let (line, column) = span_line_col(source, self.span);
        error_line(format_args!(
            "{} at line {line}, column {column}",
            self.message
        ))
    }
}
