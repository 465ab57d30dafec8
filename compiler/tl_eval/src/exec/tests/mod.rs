//! Executor tests, one file per command family. Scripts run through the
//! full pipeline so expansion and block structure are exercised too.

use pretty_assertions::assert_eq;

use crate::{run_source, RuntimeState};

mod control;
mod debugger;
mod functions;
mod modules;
mod structs;
mod threads;

/// Output of `source` run against a fresh state.
fn run(source: &str) -> String {
    let mut state = RuntimeState::new();
    run_in(&mut state, source)
}

fn run_in(state: &mut RuntimeState, source: &str) -> String {
    run_source(state, source);
    state.take_output().render()
}

#[test]
fn unknown_command_is_reported_and_execution_continues() {
    assert_eq!(run("foo\nprint 1"), "[Error: Unknown command 'foo']\n1");
}

#[test]
fn stray_literal_in_command_position_is_unknown() {
    assert_eq!(run("42\nprint 1"), "[Error: Unknown command '42']\n1");
}

#[test]
fn unavailable_library_command_reports_dependency() {
    assert_eq!(
        run("db_connect \"app.db\"\nprint 1"),
        "[Error: 'database' library not available]\n1"
    );
}

#[test]
fn registered_handler_receives_operands() {
    use std::sync::Arc;
    use tl_ir::Token;

    struct Shout;
    impl crate::CommandHandler for Shout {
        fn handle(&self, _name: &str, args: &[Token], state: &mut RuntimeState) -> usize {
            let text = args.first().map(Token::text).unwrap_or_default();
            state.output.push(text.to_uppercase());
            usize::from(!args.is_empty())
        }
    }

    let mut state = RuntimeState::builder().handler("shout", Arc::new(Shout)).build();
    assert_eq!(run_in(&mut state, "shout \"hey\"\nprint 1"), "HEY\n1");
}
