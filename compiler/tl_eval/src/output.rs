//! Append-only output log.
//!
//! Every line a script produces lands here, in execution order. Error lines
//! are flagged rather than recognised by their text, so a script printing
//! something that looks like a diagnostic is never mistaken for one.
//!
//! A `try` block needs to pull the first error raised in its body back out
//! of the log; [`OutputLog::mark`] and [`OutputLog::take_error_since`] are
//! the only non-append operations.

use std::fmt;

use tl_diagnostic::{error_line, strip_error_marker};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Line {
    text: String,
    is_error: bool,
}

#[derive(Clone, Debug, Default)]
pub struct OutputLog {
    lines: Vec<Line>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an ordinary output line.
    pub fn push(&mut self, text: impl Into<String>) {
        self.lines.push(Line {
            text: text.into(),
            is_error: false,
        });
    }

    /// Append a diagnostic line for `message`.
    pub fn error(&mut self, message: impl fmt::Display) {
        tracing::debug!(%message, "execution error");
        self.lines.push(Line {
            text: error_line(message),
            is_error: true,
        });
    }

    /// Append an already formatted diagnostic line, such as a rendered
    /// pipeline error.
    pub fn push_error_line(&mut self, line: impl Into<String>) {
        self.lines.push(Line {
            text: line.into(),
            is_error: true,
        });
    }

    /// Position to pass to [`OutputLog::take_error_since`].
    #[inline]
    pub fn mark(&self) -> usize {
        self.lines.len()
    }

    /// Remove the first error line appended after `mark` and return its
    /// message with the diagnostic marker stripped.
    pub fn take_error_since(&mut self, mark: usize) -> Option<String> {
        let offset = self.lines.get(mark..)?.iter().position(|l| l.is_error)?;
        let line = self.lines.remove(mark + offset);
        Some(strip_error_marker(&line.text).to_string())
    }

    /// Append all of `other`'s lines, keeping their error flags.
    pub fn append(&mut self, other: OutputLog) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }

    pub fn error_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_error).count()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines joined with newlines.
    pub fn render(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }

    /// Take the log, leaving it empty.
    pub fn take(&mut self) -> OutputLog {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests;
