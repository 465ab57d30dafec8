//! TechLang diagnostics.
//!
//! Two error families reach the user, and both are rendered the same way:
//! as a single output line carrying the [`ERROR_PREFIX`] marker.
//!
//! - Pipeline errors ([`PipelineError`]) come from the lexer, the block
//!   structurer and the expanders. They abort a run before anything executes.
//! - Execution errors are raised by commands and never stop the run; their
//!   type lives with the evaluator, only the line format is shared here.

mod error_code;
mod pipeline_error;
pub mod span_utils;

pub use error_code::ErrorCode;
pub use pipeline_error::PipelineError;

/// Marker that opens every diagnostic line.
pub const ERROR_PREFIX: &str = "[Error: ";

/// Format `message` as a diagnostic output line.
pub fn error_line(message: impl std::fmt::Display) -> String {
    format!("{ERROR_PREFIX}{message}]")
}

/// Strip the diagnostic marker from a line, leaving the bare message.
///
/// Lines without the marker are returned unchanged.
pub fn strip_error_marker(line: &str) -> &str {
    line.strip_prefix(ERROR_PREFIX)
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(line)
}

/// True if `line` is a diagnostic line.
pub fn is_error_line(line: &str) -> bool {
    line.starts_with(ERROR_PREFIX)
}
