#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::run_in;
use crate::RuntimeState;

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, source) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, source).unwrap();
    }
    dir
}

fn state_in(dir: &Path) -> RuntimeState {
    RuntimeState::builder().base_dir(dir).build()
}

const MATHLIB: &str = "set base 10\n\
                       def add_base x\nset r x\nadd r base\nreturn r\nend\n\
                       def secret\nprint \"hidden\"\nend\n\
                       export add_base\n\
                       print \"loaded\"";

#[test]
fn module_loads_once_and_exports_qualified_functions() {
    let dir = workspace(&[("mathlib.tl", MATHLIB)]);
    let mut state = state_in(dir.path());
    let out = run_in(
        &mut state,
        "package use mathlib\npackage use mathlib\ncall mathlib.add_base 5 -> v\nprint v",
    );
    assert_eq!(out, "loaded\n15");
}

#[test]
fn unexported_function_is_not_reachable() {
    let dir = workspace(&[("mathlib.tl", MATHLIB)]);
    let mut state = state_in(dir.path());
    assert_eq!(
        run_in(&mut state, "package use mathlib\ncall mathlib.secret"),
        "loaded\n[Error: Module 'mathlib' has no function 'secret']"
    );
}

#[test]
fn without_exports_every_function_is_public() {
    let dir = workspace(&[("greet.tl", "def hello\nprint \"hi\"\nend")]);
    let mut state = state_in(dir.path());
    assert_eq!(run_in(&mut state, "package use greet\ncall greet.hello"), "hi");
}

#[test]
fn module_functions_call_their_private_helpers() {
    let lib = "def helper\nprint \"helped\"\nend\ndef api\ncall helper\nend\nexport api";
    let dir = workspace(&[("svc.tl", lib)]);
    let mut state = state_in(dir.path());
    assert_eq!(run_in(&mut state, "package use svc\ncall svc.api"), "helped");
}

#[test]
fn module_sees_loader_variables_while_loading() {
    let dir = workspace(&[("m.tl", "print greeting")]);
    let mut state = state_in(dir.path());
    assert_eq!(run_in(&mut state, "str_create greeting \"hello\"\npackage use m"), "hello");
}

#[test]
fn module_variables_do_not_leak_into_loader() {
    let dir = workspace(&[("m.tl", "set inner 1")]);
    let mut state = state_in(dir.path());
    assert_eq!(
        run_in(&mut state, "package use m\nprint inner"),
        "[Error: Variable 'inner' is not defined]"
    );
}

#[test]
fn module_in_subdirectory_uses_file_stem_namespace() {
    let dir = workspace(&[("lib/util.tl", "def ping_twice\nping\nping\nend")]);
    let mut state = state_in(dir.path());
    assert_eq!(run_in(&mut state, "package use lib/util\ncall util.ping_twice\nprint"), "2");
}

#[test]
fn missing_module() {
    let dir = workspace(&[]);
    let mut state = state_in(dir.path());
    let out = run_in(&mut state, "package use nothere");
    assert!(out.starts_with("[Error: Module 'nothere' not found at '"), "{out}");
}

#[test]
fn paths_may_not_escape_the_base_directory() {
    let dir = workspace(&[]);
    let mut state = state_in(dir.path());
    assert_eq!(
        run_in(&mut state, "package use \"../x\""),
        "[Error: Path '../x' must stay inside the base directory]"
    );
}

#[test]
fn module_with_pipeline_error_fails_to_load() {
    let dir = workspace(&[("broken.tl", "if x > 1\nprint x")]);
    let mut state = state_in(dir.path());
    let out = run_in(&mut state, "package use broken");
    assert!(out.starts_with("[Error: Module 'broken' failed to load: "), "{out}");
}

#[test]
fn modules_that_load_each_other_load_once() {
    let dir = workspace(&[
        ("a.tl", "package use b\nprint \"a\""),
        ("b.tl", "package use a\nprint \"b\""),
    ]);
    let mut state = state_in(dir.path());
    assert_eq!(run_in(&mut state, "package use a\nprint \"done\""), "b\na\ndone");
}

#[test]
fn import_runs_inline_once() {
    let helpers = "def shout\nprint \"HEY\"\nend\nprint \"imported\"";
    let dir = workspace(&[("helpers.tl", helpers)]);
    let mut state = state_in(dir.path());
    assert_eq!(
        run_in(&mut state, "import helpers\nimport helpers.tl\ncall shout"),
        "imported\nHEY"
    );
}

#[test]
fn preloaded_files_are_skipped() {
    let dir = workspace(&[("helpers.tl", "print \"imported\"")]);
    let mut state = RuntimeState::builder()
        .base_dir(dir.path())
        .loaded_files(["helpers.tl"])
        .build();
    assert_eq!(run_in(&mut state, "import helpers\nprint 1"), "1");
}

#[test]
fn imported_file_shares_variables() {
    let dir = workspace(&[("cfg.tl", "set limit 3")]);
    let mut state = state_in(dir.path());
    assert_eq!(run_in(&mut state, "import cfg\nprint limit"), "3");
}
