//! Executable token programs.

use std::sync::Arc;

use tl_blocks::BlockTree;
use tl_ir::{is_separator, Token};

/// A fully expanded token stream and its block structure.
///
/// Cheap to clone; function bodies keep a clone of the program they were
/// defined in plus a token range.
#[derive(Clone, Debug)]
pub struct Program(Arc<ProgramData>);

#[derive(Debug)]
struct ProgramData {
    tokens: Vec<Token>,
    blocks: BlockTree,
}

impl Program {
    pub fn new(tokens: Vec<Token>, blocks: BlockTree) -> Self {
        Program(Arc::new(ProgramData { tokens, blocks }))
    }

    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.0.tokens
    }

    #[inline]
    pub fn blocks(&self) -> &BlockTree {
        &self.0.blocks
    }

    pub fn len(&self) -> usize {
        self.0.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.tokens.is_empty()
    }

    /// Positions of separator words (`else`, `catch`, `case`, ...) in
    /// `start..end` at the range's own nesting level.
    pub fn separators(&self, start: usize, end: usize, words: &[&str]) -> Vec<usize> {
        let mut found = Vec::new();
        let mut i = start;
        while i < end {
            if let Some(close) = self.blocks().closer(i) {
                i = close + 1;
                continue;
            }
            if let Some(word) = self.tokens()[i].as_ident() {
                if is_separator(word) && words.contains(&word) {
                    found.push(i);
                }
            }
            i += 1;
        }
        found
    }
}

/// A token range of a program: a function body, a block arm, a module.
#[derive(Clone, Debug)]
pub struct Body {
    pub program: Program,
    pub start: usize,
    pub end: usize,
}

impl Body {
    pub fn new(program: Program, start: usize, end: usize) -> Self {
        Body {
            program,
            start,
            end,
        }
    }

    /// The whole program.
    pub fn whole(program: Program) -> Self {
        let end = program.len();
        Body::new(program, 0, end)
    }
}
