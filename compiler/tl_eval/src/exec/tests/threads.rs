use pretty_assertions::assert_eq;

use super::run;

#[test]
fn threads_run_against_isolated_snapshots() {
    let script = "set counter 0\n\
                  def bump\nadd counter 1\nprint counter\nend\n\
                  thread_create bump t1\n\
                  thread_create bump t2\n\
                  thread_join t1\n\
                  thread_join t2\n\
                  print counter";
    assert_eq!(run(script), "1\n1\n0");
}

#[test]
fn thread_containers_are_copies() {
    let script = "array_create items\n\
                  def grow\narray_push items 1\nend\n\
                  thread_create grow t\nthread_join t\narray_length items";
    assert_eq!(run(script), "0");
}

#[test]
fn self_referencing_containers_can_be_snapshotted() {
    let script = "array_create a\narray_push a a\n\
                  def f\narray_length a\nend\n\
                  thread_create f t\nthread_join t";
    assert_eq!(run(script), "1");
}

#[test]
fn join_into_variable_collects_output() {
    let script = "def hi\nprint \"a\"\nprint \"b\"\nend\nthread_create hi t\nthread_join t out\nprint out";
    assert_eq!(run(script), "a\nb");
}

#[test]
fn thread_id_is_printed_without_a_target() {
    assert_eq!(run("def f\nend\nthread_create f"), "1");
}

#[test]
fn status_after_join_is_finished() {
    assert_eq!(
        run("def f\nend\nthread_create f t\nthread_join t\nthread_status t\nthread_join t"),
        "finished"
    );
}

#[test]
fn thread_errors_surface_on_join() {
    assert_eq!(
        run("def f\nfoo\nend\nthread_create f t\nthread_join t"),
        "[Error: Unknown command 'foo']"
    );
}

#[test]
fn unknown_thread_and_function() {
    assert_eq!(run("thread_join 9"), "[Error: Thread 9 does not exist]");
    assert_eq!(
        run("thread_create nope"),
        "[Error: Function 'nope' is not defined. Use 'def nope ... end' to define it first]"
    );
}

#[test]
fn mutexes_must_exist() {
    assert_eq!(
        run("mutex_create m\nmutex_lock m\nmutex_unlock m\nmutex_lock nope"),
        "[Error: Mutex 'nope' does not exist]"
    );
}

#[test]
fn sleep_accepts_milliseconds() {
    assert_eq!(run("sleep 1\nthread_sleep 0\nprint 1"), "1");
}
