use pretty_assertions::assert_eq;

use super::run;

#[test]
fn if_else_picks_an_arm() {
    let script = |x: i64| format!("set x {x}\nif x > 2\nprint \"big\"\nelse\nprint \"small\"\nend");
    assert_eq!(run(&script(3)), "big");
    assert_eq!(run(&script(1)), "small");
}

#[test]
fn bare_if_tests_truthiness() {
    assert_eq!(run("set f 0\nif f\nprint 1\nelse\nprint 0\nend"), "0");
    assert_eq!(run("str_create s \"x\"\nif s\nprint 1\nend"), "1");
}

#[test]
fn nested_if_else_binds_to_its_own_block() {
    let script = "set a 1\nset b 0\n\
                  if a == 1\nif b == 1\nprint \"both\"\nelse\nprint \"only a\"\nend\n\
                  else\nprint \"neither\"\nend";
    assert_eq!(run(script), "only a");
}

#[test]
fn loop_runs_count_times() {
    assert_eq!(run("set i 0\nloop 3\nadd i 1\nend\nprint i"), "3");
    assert_eq!(run("set n 2\nloop n\nprint \"x\"\nend"), "x\nx");
    assert_eq!(run("loop -1\nprint \"x\"\nend\nprint \"done\""), "done");
}

#[test]
fn while_rechecks_condition() {
    assert_eq!(run("set i 0\nwhile i < 3\nadd i 1\nend\nprint i"), "3");
}

#[test]
fn while_stops_at_iteration_ceiling() {
    assert_eq!(
        run("set i 0\nwhile i < 1\nping\nend\nprint"),
        "[Error: While loop exceeded maximum iterations (10000)]\n10000"
    );
}

#[test]
fn break_and_continue() {
    assert_eq!(
        run("set i 0\nwhile i < 10\nadd i 1\nif i == 5\nbreak\nend\nend\nprint i"),
        "5"
    );
    assert_eq!(
        run("set i 0\nset s 0\nloop 5\nadd i 1\nif i == 2\ncontinue\nend\nadd s i\nend\nprint s"),
        "13"
    );
}

#[test]
fn break_outside_loop_is_an_error() {
    assert_eq!(run("break\nprint 1"), "[Error: 'break' used outside of a loop]\n1");
}

#[test]
fn switch_runs_first_matching_case() {
    let script = |c: i64| {
        format!(
            "set c {c}\nswitch c\ncase 1\nprint \"one\"\ncase 2\nprint \"two\"\n\
             default\nprint \"other\"\nend"
        )
    };
    assert_eq!(run(&script(2)), "two");
    assert_eq!(run(&script(9)), "other");
}

#[test]
fn match_cases_take_operators() {
    let script = "set n 15\nmatch n\ncase < 10\nprint \"small\"\ncase >= 10\nprint \"large\"\nend";
    assert_eq!(run(script), "large");
}

#[test]
fn try_catches_first_error() {
    assert_eq!(
        run("try\nset x 1\ndiv x 0\nprint \"unreached\"\ncatch\nprint \"caught\"\nend\nprint \"ok\""),
        "caught\nok"
    );
}

#[test]
fn catch_binds_message_and_stack() {
    assert_eq!(
        run("try\nprint missing\ncatch err\nprint err\nend"),
        "Variable 'missing' is not defined"
    );
    assert_eq!(run("push 1\ntry\ncrashme\ncatch e s\nprint s\nend"), "[1]");
}

#[test]
fn catch_names_end_with_the_catch_line() {
    assert_eq!(
        run("try\nfoo\ncatch\nbar\nprint 1\nend"),
        "[Error: Unknown command 'bar']\n1"
    );
}

#[test]
fn catch_is_skipped_without_error() {
    assert_eq!(run("try\nprint 1\ncatch\nprint 2\nend"), "1");
}

#[test]
fn finally_always_runs() {
    assert_eq!(run("try\nprint 1\ncatch\nprint 2\nfinally\nprint 3\nend"), "1\n3");
    assert_eq!(run("try\nfoo\ncatch\nprint 2\nfinally\nprint 3\nend"), "2\n3");
}

#[test]
fn try_without_catch_reports_the_error() {
    assert_eq!(run("try\nfoo\nprint 1\nend\nprint 2"), "[Error: Unknown command 'foo']\n2");
}

#[test]
fn nested_try_catches_at_the_nearest_level() {
    let script = "try\ntry\nfoo\ncatch\nprint \"inner\"\nend\nbar\ncatch e\nprint e\nend";
    assert_eq!(run(script), "inner\nUnknown command 'bar'");
}

#[test]
fn error_in_catch_arm_is_not_caught_again() {
    assert_eq!(
        run("try\nfoo\ncatch\nbar\nend\nprint 1"),
        "[Error: Unknown command 'bar']\n1"
    );
}

#[test]
fn incomparable_values() {
    assert_eq!(
        run("str_create s \"a\"\nif s < 1\nprint 1\nend"),
        "[Error: Cannot compare string with int]"
    );
}
