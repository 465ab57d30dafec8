use pretty_assertions::assert_eq;

use super::run;

#[test]
fn breakpoint_marks_the_counted_command() {
    assert_eq!(
        run("breakpoint 3\nping\nping\nping"),
        "[Breakpoint set at command #3]\n[Hit breakpoint at command #3]"
    );
}

#[test]
fn stepping_marks_every_command_until_resumed() {
    assert_eq!(
        run("step\nping\nresume\nping\nresume"),
        "[Step mode enabled]\n[Step: command #2]\n[Step: command #3]\n[Resuming execution]\n[Not stepping]"
    );
}

#[test]
fn inspect_shows_watched_variables() {
    let expected = [
        "[Watching variable 'x']",
        "[Watching variable 'y']",
        "=== Debug Inspection (Command #4) ===",
        "Stack: empty",
        "Current Value: 0",
        "Watched Variables:",
        "  x = 3",
        "  y = <not defined>",
        &"=".repeat(40),
    ]
    .join("\n");
    assert_eq!(run("watch x\nset x 3\nwatch y\ninspect"), expected);
}

#[test]
fn inspect_lists_all_variables_without_watches() {
    let expected = [
        "=== Debug Inspection (Command #4) ===",
        "Stack[1]: [1]",
        "Current Value: 1",
        "Variables[1]: {x: 3}",
        &"=".repeat(40),
    ]
    .join("\n");
    assert_eq!(run("set x 3\nping\nupload\ninspect"), expected);
}

#[test]
fn unwatch_and_clear() {
    assert_eq!(
        run("watch x\nunwatch x\nunwatch x"),
        "[Watching variable 'x']\n[Stopped watching 'x']\n[Variable 'x' was not being watched]"
    );
    assert_eq!(
        run("breakpoint 5\nbreakpoint 6\nclear_breakpoints"),
        "[Breakpoint set at command #5]\n[Breakpoint set at command #6]\n[Cleared 2 breakpoint(s)]"
    );
}
