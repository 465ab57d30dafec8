use std::fmt;

/// Error codes for pipeline diagnostics.
///
/// Format: E#### where the first digit names the stage:
/// - E0xxx: Lexer errors
/// - E1xxx: Block structure errors
/// - E2xxx: Macro expansion errors
/// - E3xxx: Alias declaration errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Unterminated block comment
    E0004,

    // Block Errors (E1xxx)
    /// `end` with no open block
    E1001,
    /// Block still open at end of input
    E1002,

    // Macro Errors (E2xxx)
    /// Invocation of an undefined macro
    E2001,
    /// Wrong number of macro arguments
    E2002,
    /// Recursive macro expansion
    E2003,
    /// Malformed macro definition
    E2004,

    // Alias Errors (E3xxx)
    /// Malformed alias declaration
    E3001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E3001 => "E3001",
        }
    }

    /// Check if this is a lexer error (E0xxx).
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Check if this is a macro expansion error (E2xxx).
    pub fn is_macro_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests;
