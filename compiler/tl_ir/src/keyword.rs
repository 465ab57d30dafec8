//! Block keywords.
//!
//! Only the words listed here take part in nesting. Anything else, including
//! words that look like keywords, is an ordinary command.

/// Block terminator.
pub const END: &str = "end";

/// Optional header terminator (`def f x do ... end`).
pub const DO: &str = "do";

/// Kind of block, named after its opening keyword.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Def,
    Fn,
    If,
    Loop,
    While,
    Switch,
    Match,
    Try,
    Macro,
    StructType,
    Class,
    /// `method`, only directly inside a `class` block.
    Method,
    /// `static`, only directly inside a `class` block.
    Static,
    /// `init`, only directly inside a `class` block.
    Init,
}

impl BlockKind {
    /// Top-level opener for `word`. Class members are not included.
    pub fn opener(word: &str) -> Option<BlockKind> {
        Some(match word {
            "def" => BlockKind::Def,
            "fn" => BlockKind::Fn,
            "if" => BlockKind::If,
            "loop" => BlockKind::Loop,
            "while" => BlockKind::While,
            "switch" => BlockKind::Switch,
            "match" => BlockKind::Match,
            "try" => BlockKind::Try,
            "macro" => BlockKind::Macro,
            "struct" => BlockKind::StructType,
            "class" => BlockKind::Class,
            _ => return None,
        })
    }

    /// Opener for `word` when the innermost open block is a `class`.
    pub fn class_member(word: &str) -> Option<BlockKind> {
        Some(match word {
            "method" => BlockKind::Method,
            "static" => BlockKind::Static,
            "init" => BlockKind::Init,
            _ => return None,
        })
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            BlockKind::Def => "def",
            BlockKind::Fn => "fn",
            BlockKind::If => "if",
            BlockKind::Loop => "loop",
            BlockKind::While => "while",
            BlockKind::Switch => "switch",
            BlockKind::Match => "match",
            BlockKind::Try => "try",
            BlockKind::Macro => "macro",
            BlockKind::StructType => "struct",
            BlockKind::Class => "class",
            BlockKind::Method => "method",
            BlockKind::Static => "static",
            BlockKind::Init => "init",
        }
    }
}

/// Words that split a block body into arms (`else`, `catch`, ...).
pub fn is_separator(word: &str) -> bool {
    matches!(word, "else" | "catch" | "finally" | "case" | "default")
}

#[cfg(test)]
mod tests;
