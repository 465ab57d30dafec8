use pretty_assertions::assert_eq;

use super::run;

#[test]
fn call_binds_parameters() {
    assert_eq!(run("def greet name\nprint name\nend\ncall greet \"Ada\""), "Ada");
}

#[test]
fn do_keyword_separates_params_from_body() {
    assert_eq!(run("def show x do print x end\ncall show 3"), "3");
}

#[test]
fn parameters_end_with_the_header_line() {
    assert_eq!(
        run("def bad\nfoo\nend\ncall bad\nprint 1"),
        "[Error: Unknown command 'foo']\n1"
    );
    assert_eq!(run("def f a\nprint a\nend\ncall f 2"), "2");
}

#[test]
fn return_values_bind_after_arrow() {
    let script = "def plus a b\nset r a\nadd r b\nreturn r\nprint \"after\"\nend\n\
                  call plus 2 3 -> sum\nprint sum";
    assert_eq!(run(script), "5");
}

#[test]
fn multiple_return_values() {
    let script = "def pair\nreturn 1 \"two\"\nend\ncall pair -> a b\nprint a\nprint b";
    assert_eq!(run(script), "1\ntwo");
}

#[test]
fn assignments_stay_inside_the_call() {
    assert_eq!(run("set x 1\ndef f\nset x 99\nend\ncall f\nprint x"), "1");
}

#[test]
fn reads_fall_back_to_the_caller() {
    assert_eq!(run("set g 5\ndef f\nprint g\nend\ncall f"), "5");
}

#[test]
fn recursion() {
    let script = "def fact n\n\
                  if n <= 1\nreturn 1\nend\n\
                  set m n\nsub m 1\n\
                  call fact m -> r\n\
                  mul r n\n\
                  return r\n\
                  end\n\
                  call fact 5 -> out\nprint out";
    assert_eq!(run(script), "120");
}

#[test]
fn return_from_inside_a_loop() {
    let script = "def first_over limit\nset i 0\nwhile i < 100\nadd i 1\nif i > limit\nreturn i\nend\nend\nend\n\
                  call first_over 7 -> v\nprint v";
    assert_eq!(run(script), "8");
}

#[test]
fn wrong_argument_count() {
    assert_eq!(
        run("def f a\nprint a\nend\ncall f"),
        "[Error: Function 'f' expects 1 argument(s) but got 0]"
    );
    assert_eq!(
        run("def f a\nprint a\nend\ncall f 1 2"),
        "[Error: Function 'f' expects 1 argument(s) but got 2]"
    );
}

#[test]
fn undefined_function() {
    assert_eq!(
        run("call nope"),
        "[Error: Function 'nope' is not defined. Use 'def nope ... end' to define it first]"
    );
}

#[test]
fn runaway_recursion_hits_call_depth_limit() {
    assert_eq!(
        run("def forever\ncall forever\nend\ncall forever\nprint \"alive\""),
        "[Error: Maximum call depth (1000) exceeded]\nalive"
    );
}

#[test]
fn break_inside_function_does_not_escape_into_caller_loop() {
    assert_eq!(
        run("def f\nbreak\nend\nloop 2\ncall f\nprint \"x\"\nend"),
        "[Error: 'break' used outside of a loop]\nx\n[Error: 'break' used outside of a loop]\nx"
    );
}

#[test]
fn closure_captures_container_handles() {
    let script = "array_create items\n\
                  array_push items 1\n\
                  fn count_items\narray_length items\nend\n\
                  call count_items\n\
                  array_push items 2\n\
                  call count_items\n\
                  array_create items\n\
                  call count_items";
    assert_eq!(run(script), "1\n2\n2");
}

#[test]
fn closure_captures_scalars_by_value() {
    assert_eq!(run("set x 1\nfn show\nprint x\nend\nset x 2\ncall show"), "1");
}

#[test]
fn top_level_return_stops_the_program() {
    assert_eq!(run("print 1\nreturn\nprint 2"), "1");
}

#[test]
fn error_in_callee_is_caught_by_callers_try() {
    let script = "def bad\nfoo\nprint \"no\"\nend\ntry\ncall bad\ncatch e\nprint e\nend";
    assert_eq!(run(script), "Unknown command 'foo'");
}
