//! TechLang expanders.
//!
//! Two rewrite passes run between block structuring and execution:
//!
//! 1. [`macros`]: definitions (`macro name params... [when var] do ... end`)
//!    are collected into an immutable table, then every `inline name args...`
//!    site is replaced by the parameter-substituted body.
//! 2. [`aliases`]: declarations (`alias short token`) are collected, then
//!    every identifier naming an alias is replaced once, without recursion.
//!
//! Both passes produce a new token vector; the input is never mutated.

pub mod aliases;
pub mod macros;

pub use aliases::{collect_aliases, expand_aliases, AliasError, AliasTable};
pub use macros::{
    collect_macros, expand_macros, ConditionSource, MacroDefinition, MacroError, MacroTable,
};
