//! TechLang: a token-stream scripting language.
//!
//! # Pipeline
//!
//! Source text goes through four stages before anything runs:
//!
//! 1. [`tokenize`]: flat token vector with positions.
//! 2. [`structure`]: every block opener matched with its `end`.
//! 3. [`expand_macros`]: `macro` definitions collected, `inline` sites
//!    replaced.
//! 4. [`expand_aliases`]: `alias` declarations collected, aliased names
//!    replaced once.
//!
//! The result is executed against a [`RuntimeState`]. A failure in any stage
//! aborts the run with a single error line; failures during execution are
//! reported per command and execution continues.
//!
//! # Embedding
//!
//! [`run`] is the one-shot entry point. Hosts that keep a session open (a
//! REPL) build a state once and feed it source repeatedly:
//!
//! ```
//! use techlang::{run_source, RuntimeState};
//!
//! let mut state = RuntimeState::new();
//! run_source(&mut state, "set x 2");
//! run_source(&mut state, "mul x 21\nprint x");
//! assert_eq!(state.take_output().render(), "42");
//! ```

use std::sync::Once;

pub use tl_blocks::{structure, BlockError, BlockTree};
pub use tl_diagnostic::{ErrorCode, PipelineError};
pub use tl_eval::{
    compile, execute, run_source, CommandHandler, ExecError, Flow, OutputLog, Program,
    RunOptions, RuntimeState, UnavailableHandler, Value, MAX_CALL_DEPTH, MAX_WHILE_ITERATIONS,
};
pub use tl_expand::{
    collect_aliases, collect_macros, expand_aliases, expand_macros, AliasTable, MacroTable,
};
pub use tl_ir::{Number, Punct, Span, Token, TokenKind};
pub use tl_lexer::{tokenize, LexError};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for diagnostic output.
///
/// Safe to call more than once. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=tl_eval=debug` or `RUST_LOG=tl_expand=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Run `source` in a fresh state built from `options` and return everything
/// it printed, one line per entry joined with `\n`.
pub fn run(source: &str, options: RunOptions) -> String {
    let mut state = options.build();
    let flow = run_source(&mut state, source);
    let output = state.take_output();
    tracing::debug!(?flow, lines = output.len(), errors = output.error_count(), "run finished");
    output.render()
}
