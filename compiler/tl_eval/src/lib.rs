//! TechLang runtime: state, command executor and pipeline driver.
//!
//! # Architecture
//!
//! - [`pipeline`]: source text → [`Program`] (tokenize, structure, expand
//!   macros and aliases, structure again).
//! - [`exec`]: walks a program, dispatching each command to a built-in
//!   handler or an external [`CommandHandler`].
//! - [`RuntimeState`]: everything a run mutates. Variables live in
//!   [`environment`] frames; definitions in [`registry`] types.
//!
//! Embedders keep a [`RuntimeState`] open and feed it source through
//! [`run_source`], or drive the stages themselves with [`compile`] and
//! [`execute`].

mod concurrency;
pub mod environment;
pub mod errors;
pub mod exec;
pub mod external;
mod output;
pub mod pipeline;
mod program;
pub mod registry;
mod shared;
mod stack;
mod state;
mod value;

pub use concurrency::{SharedResources, ThreadTable};
pub use errors::{ExecError, ExecResult};
pub use exec::control::MAX_WHILE_ITERATIONS;
pub use exec::functions::MAX_CALL_DEPTH;
pub use exec::{execute, Command, Flow};
pub use external::{CommandHandler, HandlerRegistry, UnavailableHandler};
pub use output::OutputLog;
pub use pipeline::{compile, run_source};
pub use program::{Body, Program};
pub use shared::Shared;
pub use state::{Debugger, RunOptions, RuntimeState};
pub use value::{ClassInstance, DictMap, StructInstance, Value};
