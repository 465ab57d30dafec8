//! Source text to executable program.
//!
//! # Stages
//!
//! 1. tokenize
//! 2. structure: every opener must have its `end`
//! 3. collect macro definitions into the state, expand `inline` sites
//!    (guards read the state's variables as they are now)
//! 4. collect alias declarations into the state, expand alias uses
//! 5. structure the rewritten stream for the executor
//!
//! Any stage failing is a [`PipelineError`]; nothing executes.

use tl_diagnostic::PipelineError;
use tl_expand::{collect_aliases, collect_macros, expand_aliases, expand_macros};

use crate::exec::{execute, Flow};
use crate::program::Program;
use crate::RuntimeState;

/// Run the pipeline over `source`, registering its macros and aliases in
/// `state`.
pub fn compile(source: &str, state: &mut RuntimeState) -> Result<Program, PipelineError> {
    let tokens = tl_lexer::tokenize(source)?;
    let blocks = tl_blocks::structure(&tokens)?;

    let (macros, tokens) = collect_macros(&tokens, &blocks)?;
    for def in macros {
        state.macros.insert(def);
    }
    let tokens = expand_macros(&tokens, &state.macros, &*state)?;

    let (aliases, tokens) = collect_aliases(&tokens)?;
    for (name, replacement) in aliases {
        state.aliases.insert(name, replacement);
    }
    let tokens = expand_aliases(&tokens, &state.aliases);

    let blocks = tl_blocks::structure(&tokens)?;
    tracing::debug!(
        tokens = tokens.len(),
        blocks = blocks.block_count(),
        depth = blocks.max_depth(),
        "program compiled"
    );
    Ok(Program::new(tokens, blocks))
}

/// Compile and execute `source` against `state`.
///
/// A pipeline error becomes a single error line and nothing runs.
pub fn run_source(state: &mut RuntimeState, source: &str) -> Flow {
    match compile(source, state) {
        Ok(program) => execute(state, &program),
        Err(err) => {
            tracing::debug!(code = %err.code, "pipeline failed");
            state.output.push_error_line(err.render(source));
            Flow::Normal
        }
    }
}
