//! End-to-end behaviour of whole scripts through [`techlang::run`].

use pretty_assertions::assert_eq;
use techlang::{run, RunOptions, MAX_WHILE_ITERATIONS};

fn run_default(source: &str) -> String {
    run(source, RunOptions::new())
}

#[test]
fn set_add_print() {
    assert_eq!(run_default("set x 10\nadd x 5\nprint x"), "15");
}

#[test]
fn runaway_while_stops_at_the_ceiling() {
    let out = run_default("set i 0\nwhile i < 1\nping\nend\nprint");
    assert_eq!(
        out,
        format!(
            "[Error: While loop exceeded maximum iterations ({MAX_WHILE_ITERATIONS})]\n{MAX_WHILE_ITERATIONS}"
        )
    );
}

#[test]
fn try_hides_the_caught_error() {
    let script = "set a 1\n\
                  try\n\
                  div a 0\n\
                  catch\n\
                  print \"recovered\"\n\
                  end\n\
                  print \"ok\"";
    assert_eq!(run_default(script), "recovered\nok");
}

#[test]
fn mutually_recursive_macros_abort_before_execution() {
    let script = "print \"before\"\n\
                  macro a do inline b end\n\
                  macro b do inline a end\n\
                  inline a\n\
                  print \"after\"";
    let out = run_default(script);
    assert_eq!(
        out,
        "[Error: Recursive macro expansion detected: a -> b -> a at line 3, column 12]"
    );
}

#[test]
fn thread_snapshots_leave_parent_state_alone() {
    let script = "set counter 0\n\
                  def bump\nadd counter 1\nend\n\
                  thread_create bump t1\n\
                  thread_create bump t2\n\
                  thread_join t1\n\
                  thread_join t2\n\
                  print counter";
    assert_eq!(run_default(script), "0");
}

#[test]
fn unmatched_block_is_rejected_before_anything_runs() {
    let out = run_default("print 1\nif x > 1\nprint x");
    assert!(out.starts_with("[Error: "), "{out}");
    assert_eq!(out.lines().count(), 1);
}

#[test]
fn execution_errors_do_not_stop_the_run() {
    assert_eq!(
        run_default("print nope\nset x 1\nprint x"),
        "[Error: Variable 'nope' is not defined]\n1"
    );
}

#[test]
fn inputs_feed_input_commands() {
    let out = run(
        "input name\nstr_create greeting \"Hello, \"\nstr_concat greeting name\nprint greeting",
        RunOptions::new().inputs(["Ada"]),
    );
    assert_eq!(out, "Hello, Ada");
}

#[test]
fn macros_with_parameters_and_guards() {
    let script = "macro twice $v do\nprint $v\nprint $v\nend\n\
                  macro loud when verbose do\nprint \"LOUD\"\nend\n\
                  inline twice 7\n\
                  inline loud";
    assert_eq!(run_default(script), "7\n7");
}

#[test]
fn aliases_rewrite_names() {
    let script = "alias p print\nalias greet ( print \"hi\" )\np 3\ngreet";
    assert_eq!(run_default(script), "3\nhi");
}

#[test]
fn comments_are_ignored() {
    let script = "# leading comment\nset x 1 # trailing\n/* block\ncomment */ print x";
    assert_eq!(run_default(script), "1");
}

#[test]
fn optional_library_commands_report_missing_dependency() {
    assert_eq!(
        run_default("http_get \"https://example.com\"\ngui_window\nprint 1"),
        "[Error: 'http' library not available]\n[Error: 'gui' library not available]\n1"
    );
}
