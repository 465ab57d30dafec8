use super::*;
use pretty_assertions::assert_eq;

#[test]
fn render_joins_lines_in_order() {
    let mut log = OutputLog::new();
    log.push("a");
    log.error("bad");
    log.push("b");
    assert_eq!(log.render(), "a\n[Error: bad]\nb");
    assert_eq!(log.error_count(), 1);
}

#[test]
fn take_error_since_removes_only_first_new_error() {
    let mut log = OutputLog::new();
    log.error("before");
    let mark = log.mark();
    log.push("kept");
    log.error("first");
    log.error("second");

    assert_eq!(log.take_error_since(mark), Some("first".to_string()));
    assert_eq!(log.render(), "[Error: before]\nkept\n[Error: second]");
}

#[test]
fn take_error_since_ignores_older_errors() {
    let mut log = OutputLog::new();
    log.error("old");
    let mark = log.mark();
    log.push("fine");
    assert_eq!(log.take_error_since(mark), None);
}

#[test]
fn printed_lookalike_is_not_an_error() {
    let mut log = OutputLog::new();
    let mark = log.mark();
    log.push("[Error: not really]");
    assert_eq!(log.take_error_since(mark), None);
    assert_eq!(log.error_count(), 0);
}

#[test]
fn append_keeps_error_flags() {
    let mut child = OutputLog::new();
    child.error("from child");
    let mut parent = OutputLog::new();
    let mark = parent.mark();
    parent.append(child);
    assert_eq!(parent.take_error_since(mark), Some("from child".to_string()));
}
