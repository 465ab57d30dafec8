//! TechLang block structurer.
//!
//! Matches every block opener with its `end`, producing a tree of [`Block`]s
//! and an opener → closer index the executor uses to skip bodies.
//!
//! # Algorithm
//!
//! One left-to-right scan with a stack of open frames:
//! - an identifier from the fixed opener set pushes a frame, unless the
//!   tokens after it match a single-command exception (see [`exceptions`]);
//! - `method`, `static` and `init` open blocks only directly inside `class`;
//! - `end` pops the innermost frame, and is an error on an empty stack;
//! - the stack must be empty at end of input.
//!
//! Unknown words never open blocks.

pub mod exceptions;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;
use tl_diagnostic::{ErrorCode, PipelineError};
use tl_ir::{BlockKind, Span, Token, END};

/// A matched block: `tokens[open]` is the keyword, `tokens[close]` its `end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub open: usize,
    pub close: usize,
    pub children: Vec<Block>,
}

/// Result of structuring a token stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockTree {
    pub roots: Vec<Block>,
    closers: FxHashMap<usize, (BlockKind, usize)>,
    max_depth: usize,
}

impl BlockTree {
    /// Index of the `end` matching the opener at `open`.
    #[inline]
    pub fn closer(&self, open: usize) -> Option<usize> {
        self.closers.get(&open).map(|&(_, close)| close)
    }

    /// Kind of the block opened at `open`, if a block opens there.
    #[inline]
    pub fn kind_at(&self, open: usize) -> Option<BlockKind> {
        self.closers.get(&open).map(|&(kind, _)| kind)
    }

    pub fn block_count(&self) -> usize {
        self.closers.len()
    }

    /// Deepest nesting seen during the scan.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Nesting violation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("Unexpected 'end' with no open block")]
    UnexpectedEnd { span: Span },
    #[error("Unclosed '{}' block", kind.keyword())]
    Unclosed { kind: BlockKind, span: Span },
}

impl BlockError {
    pub fn span(&self) -> Span {
        match self {
            BlockError::UnexpectedEnd { span } | BlockError::Unclosed { span, .. } => *span,
        }
    }
}

impl From<BlockError> for PipelineError {
    fn from(err: BlockError) -> Self {
        let code = match err {
            BlockError::UnexpectedEnd { .. } => ErrorCode::E1001,
            BlockError::Unclosed { .. } => ErrorCode::E1002,
        };
        PipelineError::new(code, err.to_string(), err.span())
    }
}

struct OpenFrame {
    kind: BlockKind,
    open: usize,
    children: Vec<Block>,
}

/// Kind of block opened by `tokens[at]`, given the innermost open block.
pub fn opener_at(tokens: &[Token], at: usize, enclosing: Option<BlockKind>) -> Option<BlockKind> {
    let word = tokens.get(at)?.as_ident()?;
    if enclosing == Some(BlockKind::Class) {
        if let Some(kind) = BlockKind::class_member(word) {
            return Some(kind);
        }
    }
    let kind = BlockKind::opener(word)?;
    if exceptions::is_single_command(tokens, at) {
        return None;
    }
    Some(kind)
}

/// Structure `tokens` into blocks.
pub fn structure(tokens: &[Token]) -> Result<BlockTree, BlockError> {
    let mut stack: SmallVec<[OpenFrame; 16]> = SmallVec::new();
    let mut tree = BlockTree::default();
    let mut i = 0;

    while i < tokens.len() {
        let tok = &tokens[i];
        if tok.is_word(END) {
            let frame = stack
                .pop()
                .ok_or(BlockError::UnexpectedEnd { span: tok.span })?;
            tree.closers.insert(frame.open, (frame.kind, i));
            let block = Block {
                kind: frame.kind,
                open: frame.open,
                close: i,
                children: frame.children,
            };
            match stack.last_mut() {
                Some(parent) => parent.children.push(block),
                None => tree.roots.push(block),
            }
        } else if let Some(kind) = opener_at(tokens, i, stack.last().map(|f| f.kind)) {
            stack.push(OpenFrame {
                kind,
                open: i,
                children: Vec::new(),
            });
            tree.max_depth = tree.max_depth.max(stack.len());
        } else {
            i += exceptions::quoted_operands(tokens, i);
        }
        i += 1;
    }

    if let Some(frame) = stack.pop() {
        // Report the innermost unclosed block: it is the one missing its `end`.
        return Err(BlockError::Unclosed {
            kind: frame.kind,
            span: tokens[frame.open].span,
        });
    }

    tracing::trace!(blocks = tree.block_count(), depth = tree.max_depth, "structured");
    Ok(tree)
}

#[cfg(test)]
mod tests;
