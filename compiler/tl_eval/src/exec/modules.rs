//! Modules and file imports.
//!
//! `package use lib/util` loads `lib/util.tl` into a child state, then
//! publishes its exported functions as `util.<name>`. The child is reduced
//! to a [`ModuleRecord`]: its globals stay readable by its own functions and
//! nothing else. Loading the same path twice in one run does nothing, and
//! that includes a module loading one that is still being loaded.
//!
//! `import file` instead runs a file inline against the current state, once
//! per path.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tl_ir::Token;

use super::{execute, Flow, Outcome, Site};
use crate::environment::Link;
use crate::errors::{custom, usage, ExecError, ExecResult};
use crate::pipeline::compile;
use crate::registry::ModuleRecord;
use crate::RuntimeState;

const SOURCE_EXTENSION: &str = "tl";
const PACKAGE_USAGE: &str = "package use <module> | package name <name>";

/// Resolve a module or import path below `base`, adding `.tl` if missing.
pub(crate) fn source_path(base: &Path, requested: &str) -> ExecResult<PathBuf> {
    let relative = Path::new(requested);
    let escapes = relative
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(custom(format!(
            "Path '{requested}' must stay inside the base directory"
        )));
    }
    let mut path = base.join(relative);
    if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
        let mut name = path.clone().into_os_string();
        name.push(".");
        name.push(SOURCE_EXTENSION);
        path = PathBuf::from(name);
    }
    Ok(path)
}

fn read_source(path: &Path, module: &str) -> ExecResult<String> {
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => ExecError::ModuleNotFound {
            name: module.to_string(),
            path: path.display().to_string(),
        },
        _ => ExecError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        },
    })
}

fn path_operand(tok: Option<&Token>, command: &'static str, usage_line: &'static str) -> ExecResult<String> {
    tok.filter(|t| t.as_punct().is_none())
        .map(Token::text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| usage(command, usage_line))
}

/// `package use <module>` or `package name <name>`.
pub(crate) fn package(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    match site.arg(0).and_then(Token::as_ident) {
        Some("use") => {
            let result = path_operand(site.arg(1), "package", PACKAGE_USAGE)
                .and_then(|requested| load_module(state, &requested));
            if let Err(err) = result {
                state.report(err);
            }
            Outcome::consumed(2.min(site.rest().len()))
        }
        // Declares the module's own name; loading uses the file name.
        Some("name") if site.arg(1).is_some() => Outcome::consumed(2),
        _ => {
            state.report(usage("package", PACKAGE_USAGE));
            Outcome::consumed(0)
        }
    }
}

fn load_module(state: &mut RuntimeState, requested: &str) -> ExecResult<()> {
    let path = source_path(&state.base_dir, requested)?;
    if state.loaded_modules.contains(&path) {
        tracing::trace!(path = %path.display(), "module already loaded");
        return Ok(());
    }
    let namespace = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(requested)
        .to_string();
    let source = read_source(&path, &namespace)?;
    tracing::debug!(module = %namespace, path = %path.display(), "loading module");

    // Marked before running so modules that load each other stop here.
    state.loaded_modules.insert(path.clone());
    let module_dir = path.parent().map_or_else(|| state.base_dir.clone(), Path::to_path_buf);
    let mut child = state.module_child(module_dir);
    match compile(&source, &mut child) {
        Ok(program) => {
            execute(&mut child, &program);
        }
        Err(err) => {
            state.loaded_modules.remove(&path);
            return Err(custom(format!(
                "Module '{namespace}' failed to load: {}",
                err.message
            )));
        }
    }
    state.output.append(child.take_output());
    state.loaded_modules.extend(child.loaded_modules.drain());

    let link = Link::Module(namespace.clone());
    let functions: rustc_hash::FxHashMap<_, _> = child
        .functions
        .iter()
        .filter(|(name, _)| !name.contains('.'))
        .map(|(name, f)| (name.clone(), Arc::new(f.rescoped(link.clone()))))
        .collect();
    let mut exports = std::mem::take(&mut child.exports);
    if exports.is_empty() {
        exports = functions.keys().cloned().collect();
        exports.sort();
    }

    for export in &exports {
        let qualified = format!("{namespace}.{export}");
        if let Some(function) = functions.get(export) {
            state.functions.insert(qualified, Arc::clone(function));
        } else if let Some(replacement) = child.aliases.get(export) {
            state.aliases.insert(qualified, replacement.to_vec());
        } else {
            state.report(custom(format!(
                "Module '{namespace}' exports unknown name '{export}'"
            )));
        }
    }

    // Modules the child loaded stay reachable by the functions it exported.
    for (name, record) in child.modules.drain() {
        state.modules.entry(name).or_insert(record);
    }
    for (name, function) in &child.functions {
        if name.contains('.') {
            state.functions.entry(name.clone()).or_insert_with(|| Arc::clone(function));
        }
    }
    // Type registries are global: exported functions construct these.
    for (name, class) in child.classes.drain() {
        state.classes.entry(name).or_insert(class);
    }
    for (name, ty) in child.struct_types.drain() {
        state.struct_types.entry(name).or_insert(ty);
    }

    let globals = child.frames.first().cloned().unwrap_or_default();
    state.modules.insert(
        namespace,
        ModuleRecord {
            path,
            globals: Arc::new(globals),
            functions,
            exports,
        },
    );
    Ok(())
}

/// `export <name>`: publish a function or alias when this file is loaded
/// as a module.
pub(crate) fn export(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 1, "export", "export <name>", |state, args| {
        let name = super::operand::name(&args[0], "export", "export <name>")?;
        state.exports.push(name.to_string());
        Ok(())
    })
}

/// `import <file>`: run a file inline, once per path.
pub(crate) fn import(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let result = path_operand(site.arg(0), "import", "import <file>")
        .and_then(|requested| import_file(state, &requested));
    match result {
        Ok(Flow::Raise(message)) => Outcome::with_flow(1, Flow::Raise(message)),
        Ok(_) => Outcome::consumed(1),
        Err(err) => {
            state.report(err);
            Outcome::consumed(usize::from(site.arg(0).is_some()))
        }
    }
}

fn import_file(state: &mut RuntimeState, requested: &str) -> ExecResult<Flow> {
    let path = source_path(&state.base_dir, requested)?;
    if state.loaded_files.contains(&path) {
        return Ok(Flow::Normal);
    }
    let source = read_source(&path, requested)?;
    state.loaded_files.insert(path.clone());
    tracing::debug!(path = %path.display(), "importing file");

    let program = compile(&source, state).map_err(|err| {
        custom(format!("Import of '{requested}' failed: {}", err.message))
    })?;
    Ok(match execute(state, &program) {
        Flow::Raise(message) => Flow::Raise(message),
        _ => Flow::Normal,
    })
}
