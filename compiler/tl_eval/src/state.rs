//! Runtime state threaded through every command.
//!
//! One [`RuntimeState`] exists per top-level run, per loaded module (a child
//! whose parent snapshot is used only for reads) and per spawned thread (a
//! deep copy, independent from then on).

use std::collections::{BTreeSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tl_expand::{AliasTable, ConditionSource, MacroTable};
use tl_ir::{is_separator, BlockKind, DO, END};

use crate::concurrency::{SharedResources, ThreadTable};
use crate::environment::{Frame, Link};
use crate::exec::Command;
use crate::external::{CommandHandler, HandlerRegistry};
use crate::output::OutputLog;
use crate::registry::{ClassDef, FunctionDef, ModuleRecord, StructType};
use crate::Value;

/// Debugger bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct Debugger {
    pub breakpoints: BTreeSet<u64>,
    pub watch: BTreeSet<String>,
    pub stepping: bool,
    pub command_count: u64,
}

/// Options for a run, or for a state an embedder keeps open.
#[derive(Clone, Default)]
pub struct RunOptions {
    inputs: Vec<String>,
    loaded_files: Vec<PathBuf>,
    base_dir: Option<PathBuf>,
    handlers: Vec<(String, Arc<dyn CommandHandler>)>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines returned, in order, by `input`.
    #[must_use]
    pub fn inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Files already imported; `import` of these is a no-op.
    #[must_use]
    pub fn loaded_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.loaded_files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Directory that `package use` and `import` paths are relative to.
    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Register an external command handler.
    #[must_use]
    pub fn handler(mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.push((name.into(), handler));
        self
    }

    /// State configured with these options.
    pub fn build(self) -> RuntimeState {
        RuntimeState::from_options(self)
    }
}

impl std::fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOptions")
            .field("inputs", &self.inputs)
            .field("loaded_files", &self.loaded_files)
            .field("base_dir", &self.base_dir)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// The mutable environment of one interpreter instance.
#[derive(Debug)]
pub struct RuntimeState {
    /// Implicit value register used by `ping`, `upload`, bare `print`, ...
    pub(crate) value: i64,
    pub(crate) stack: Vec<Value>,
    /// Never empty; `frames[0]` is the global scope.
    pub(crate) frames: Vec<Frame>,
    /// Read-only fallback for module states.
    pub(crate) parent: Option<Arc<Frame>>,
    pub(crate) functions: FxHashMap<String, Arc<FunctionDef>>,
    pub(crate) closures: FxHashMap<String, Arc<FunctionDef>>,
    pub(crate) classes: FxHashMap<String, Arc<ClassDef>>,
    pub(crate) struct_types: FxHashMap<String, Arc<StructType>>,
    pub(crate) macros: MacroTable,
    pub(crate) aliases: AliasTable,
    pub(crate) modules: FxHashMap<String, ModuleRecord>,
    pub(crate) loaded_modules: FxHashSet<PathBuf>,
    /// Names declared with `export` while this state ran as a module.
    pub(crate) exports: Vec<String>,
    pub(crate) loaded_files: FxHashSet<PathBuf>,
    pub(crate) base_dir: PathBuf,
    pub(crate) inputs: VecDeque<String>,
    pub(crate) output: OutputLog,
    pub(crate) debugger: Debugger,
    pub(crate) threads: ThreadTable,
    pub(crate) shared: Arc<SharedResources>,
    pub(crate) handlers: HandlerRegistry,
    pub(crate) call_depth: usize,
    pub(crate) loop_depth: usize,
    /// Number of enclosing `try` bodies currently executing.
    pub(crate) trap_depth: usize,
}

impl Default for RuntimeState {
    fn default() -> Self {
        RuntimeState::new()
    }
}

impl RuntimeState {
    pub fn new() -> Self {
        RuntimeState {
            value: 0,
            stack: Vec::new(),
            frames: vec![Frame::default()],
            parent: None,
            functions: FxHashMap::default(),
            closures: FxHashMap::default(),
            classes: FxHashMap::default(),
            struct_types: FxHashMap::default(),
            macros: MacroTable::new(),
            aliases: AliasTable::new(),
            modules: FxHashMap::default(),
            loaded_modules: FxHashSet::default(),
            exports: Vec::new(),
            loaded_files: FxHashSet::default(),
            base_dir: PathBuf::from("."),
            inputs: VecDeque::new(),
            output: OutputLog::new(),
            debugger: Debugger::default(),
            threads: ThreadTable::default(),
            shared: Arc::new(SharedResources::default()),
            handlers: HandlerRegistry::with_unavailable_libraries(),
            call_depth: 0,
            loop_depth: 0,
            trap_depth: 0,
        }
    }

    /// Options builder for a state an embedder keeps open.
    pub fn builder() -> RunOptions {
        RunOptions::new()
    }

    pub fn from_options(options: RunOptions) -> Self {
        let mut state = RuntimeState::new();
        state.inputs = options.inputs.into();
        if let Some(dir) = options.base_dir {
            state.base_dir = dir;
        }
        // Imports are keyed by their path under the base directory.
        state.loaded_files = options
            .loaded_files
            .into_iter()
            .map(|path| if path.is_relative() { state.base_dir.join(path) } else { path })
            .collect();
        for (name, handler) in options.handlers {
            state.handlers.register(name, handler);
        }
        state
    }

    /// Fresh state for loading a module from `base_dir`.
    ///
    /// The child reads this state's visible variables through a snapshot and
    /// shares its locks and external handlers; nothing else.
    pub(crate) fn module_child(&self, base_dir: PathBuf) -> RuntimeState {
        let mut child = RuntimeState::new();
        child.parent = Some(Arc::new(self.capture()));
        child.base_dir = base_dir;
        child.shared = Arc::clone(&self.shared);
        child.handlers = self.handlers.clone();
        child.loaded_files = self.loaded_files.clone();
        child.loaded_modules = self.loaded_modules.clone();
        child
    }

    /// Deep copy for a spawned thread: same definitions and values, no
    /// container shared with `self`, empty output.
    pub fn snapshot(&self) -> RuntimeState {
        RuntimeState {
            value: self.value,
            stack: self.stack.iter().map(Value::deep_copy).collect(),
            frames: self.frames.iter().map(Frame::deep_copy).collect(),
            parent: self.parent.as_ref().map(|p| Arc::new(p.deep_copy())),
            functions: self.functions.clone(),
            closures: self
                .closures
                .iter()
                .map(|(k, f)| (k.clone(), Arc::new(f.deep_copy())))
                .collect(),
            classes: self.classes.clone(),
            struct_types: self.struct_types.clone(),
            macros: self.macros.clone(),
            aliases: self.aliases.clone(),
            modules: self
                .modules
                .iter()
                .map(|(k, m)| (k.clone(), m.deep_copy()))
                .collect(),
            loaded_modules: self.loaded_modules.clone(),
            exports: Vec::new(),
            loaded_files: self.loaded_files.clone(),
            base_dir: self.base_dir.clone(),
            inputs: self.inputs.clone(),
            output: OutputLog::new(),
            debugger: Debugger::default(),
            threads: ThreadTable::default(),
            shared: Arc::clone(&self.shared),
            handlers: self.handlers.clone(),
            call_depth: self.call_depth,
            loop_depth: 0,
            trap_depth: 0,
        }
    }

    // Variables

    /// Resolve `name` through the frame chain, then the parent snapshot.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.get(name) {
                return Some(value.clone());
            }
            match &frame.link {
                Link::Enclosing => {}
                Link::Captured(captured) => return captured.get(name).cloned(),
                Link::Module(module) => {
                    if let Some(value) = self.modules.get(module).and_then(|m| m.globals.get(name)) {
                        return Some(value.clone());
                    }
                }
                Link::Global => {
                    if let Some(value) = self.frames.first().and_then(|g| g.get(name)) {
                        return Some(value.clone());
                    }
                    break;
                }
            }
        }
        self.parent.as_ref().and_then(|p| p.get(name).cloned())
    }

    /// Bind `name` in the innermost frame.
    pub fn assign(&mut self, name: impl Into<String>, value: Value) {
        self.top_frame_mut().define(name, value);
    }

    /// Bind `name` in the global frame.
    pub fn define_global(&mut self, name: impl Into<String>, value: Value) {
        if let Some(global) = self.frames.first_mut() {
            global.define(name, value);
        }
    }

    /// Every binding visible from the current frame, flattened, innermost
    /// first. Containers stay shared.
    pub(crate) fn capture(&self) -> Frame {
        let mut snapshot = Frame::new(Link::Enclosing);
        for frame in self.frames.iter().rev() {
            snapshot.fill_from(frame);
            match &frame.link {
                Link::Enclosing => {}
                Link::Captured(captured) => {
                    snapshot.fill_from(captured);
                    return snapshot;
                }
                Link::Module(module) => {
                    if let Some(record) = self.modules.get(module) {
                        snapshot.fill_from(&record.globals);
                    }
                }
                Link::Global => {
                    if let Some(global) = self.frames.first() {
                        snapshot.fill_from(global);
                    }
                    break;
                }
            }
        }
        if let Some(parent) = &self.parent {
            snapshot.fill_from(parent);
        }
        snapshot
    }

    pub(crate) fn top_frame_mut(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::default());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub(crate) fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub(crate) fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Module whose function is currently executing, if any.
    pub(crate) fn current_module(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(|frame| match &frame.link {
            Link::Module(name) => Some(name.as_str()),
            Link::Captured(_) | Link::Enclosing | Link::Global => None,
        })
    }

    // Output

    /// Append an execution error line.
    pub fn report(&mut self, error: impl std::fmt::Display) {
        self.output.error(error);
    }

    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    /// Take everything printed so far.
    pub fn take_output(&mut self) -> OutputLog {
        self.output.take()
    }

    // Registers and registries

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.closures.contains_key(name)
    }

    pub fn register_handler(&mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.register(name, handler);
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    /// True for words that start a command or delimit a block. Used to find
    /// where a variable-length operand list stops.
    pub fn is_command_word(&self, word: &str) -> bool {
        Command::from_name(word).is_some()
            || self.handlers.contains(word)
            || word == END
            || word == DO
            || is_separator(word)
            || BlockKind::class_member(word).is_some()
    }

    /// Stack rendered as a list, for `catch` bindings and dumps.
    pub(crate) fn stack_repr(&self) -> String {
        let items: Vec<String> = self.stack.iter().map(Value::repr).collect();
        format!("[{}]", items.join(", "))
    }
}

/// Macro guards read the expanding state's variables.
impl ConditionSource for RuntimeState {
    fn is_truthy(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|v| v.is_truthy())
    }
}
