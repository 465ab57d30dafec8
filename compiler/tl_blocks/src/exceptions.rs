//! Tokens that look like block syntax but are not.
//!
//! Two cases:
//! - single commands sharing an opener keyword, told apart by a fixed
//!   second-token allow-list (`struct new ...` is not a type declaration);
//! - declarations whose operands are quoted tokens (`alias rpt loop` must not
//!   open a loop).

use tl_ir::{Punct, Token};

/// Second tokens that turn `struct` into a single instance command.
pub const STRUCT_OPERATIONS: [&str; 4] = ["new", "set", "get", "dump"];

/// True if the opener keyword at `at` is really a single command.
pub fn is_single_command(tokens: &[Token], at: usize) -> bool {
    let Some(word) = tokens.get(at).and_then(Token::as_ident) else {
        return false;
    };
    let next = tokens.get(at + 1).and_then(Token::as_ident);
    match word {
        "struct" => next.is_some_and(|op| STRUCT_OPERATIONS.contains(&op)),
        _ => false,
    }
}

/// Number of tokens after `at` that are quoted operands and must not take
/// part in nesting.
pub fn quoted_operands(tokens: &[Token], at: usize) -> usize {
    if !tokens.get(at).is_some_and(|t| t.is_word("alias")) {
        return 0;
    }
    // alias <name> <token> | alias <name> ( <tokens...> )
    match tokens.get(at + 2) {
        Some(tok) if tok.is_punct(Punct::LParen) => tokens
            .get(at + 3..)
            .and_then(|rest| rest.iter().position(|t| t.is_punct(Punct::RParen)))
            .map_or(tokens.len().saturating_sub(at + 1), |close| close + 3),
        Some(_) => 2,
        None => tokens.len().saturating_sub(at + 1),
    }
}
