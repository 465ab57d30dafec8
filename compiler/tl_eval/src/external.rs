//! The uniform interface for commands implemented outside the core.
//!
//! File, network, database, graphics and GUI commands are collaborators: the
//! executor hands them the command name, the remaining tokens of the current
//! range and the runtime state, and advances by the count they return.
//! Anything user-visible goes to the state's output log.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tl_ir::Token;

use crate::errors::library_unavailable;
use crate::RuntimeState;

/// A command implemented outside the core.
pub trait CommandHandler: Send + Sync {
    /// Run `name` with the tokens that follow it; return how many of `args`
    /// were consumed.
    fn handle(&self, name: &str, args: &[Token], state: &mut RuntimeState) -> usize;
}

/// Command name → external handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: FxHashMap<String, Arc<dyn CommandHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every optional-library command reporting itself as
    /// unavailable.
    pub fn with_unavailable_libraries() -> Self {
        let mut registry = HandlerRegistry::new();
        for &(dependency, commands) in OPTIONAL_LIBRARIES {
            let handler: Arc<dyn CommandHandler> = Arc::new(UnavailableHandler { dependency });
            for command in commands {
                registry.register(*command, Arc::clone(&handler));
            }
        }
        registry
    }

    /// Register `handler` for `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("HandlerRegistry").field("commands", &names).finish()
    }
}

/// Commands backed by libraries this build does not ship.
const OPTIONAL_LIBRARIES: &[(&str, &[&str])] = &[
    (
        "database",
        &["db_create", "db_connect", "db_execute", "db_select", "db_insert", "db_close"],
    ),
    ("http", &["http_get", "http_post", "http_put", "http_delete"]),
    ("gui", &["gui_window", "gui_button", "gui_label", "gui_mainloop"]),
    ("graphics", &["graphics_init", "graphics_draw", "graphics_show"]),
];

/// Stands in for a command whose library is missing.
///
/// Reports the missing dependency once and consumes the command's operands,
/// leaving state otherwise untouched.
pub struct UnavailableHandler {
    pub dependency: &'static str,
}

impl CommandHandler for UnavailableHandler {
    fn handle(&self, name: &str, args: &[Token], state: &mut RuntimeState) -> usize {
        tracing::debug!(command = name, dependency = self.dependency, "optional library missing");
        state.report(library_unavailable(self.dependency));
        args.iter()
            .position(|tok| tok.line_start || tok.as_ident().is_some_and(|w| state.is_command_word(w)))
            .unwrap_or(args.len())
    }
}
