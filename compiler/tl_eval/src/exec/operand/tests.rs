use super::*;
use pretty_assertions::assert_eq;
use tl_ir::Span;

fn punct(p: Punct) -> Token {
    Token::new(TokenKind::Punct(p), Span::DUMMY)
}

#[test]
fn literals_resolve_to_themselves() {
    let state = RuntimeState::new();
    assert_eq!(resolve(&state, &Token::int(4)), Ok(Value::int(4)));
    assert_eq!(resolve(&state, &Token::string("s")), Ok(Value::text("s")));
}

#[test]
fn names_resolve_through_state() {
    let mut state = RuntimeState::new();
    state.assign("x", Value::int(3));
    assert_eq!(resolve(&state, &Token::ident("x")), Ok(Value::int(3)));
    assert_eq!(
        resolve(&state, &Token::ident("y")).map_err(|e| e.to_string()),
        Err("Variable 'y' is not defined".to_string())
    );
}

#[test]
fn numeric_comparisons_mix_int_and_float() {
    assert_eq!(compare(&Value::int(2), CmpOp::Lt, &Value::Float(2.5)), Ok(true));
    assert_eq!(compare(&Value::int(3), CmpOp::Ge, &Value::int(3)), Ok(true));
    assert_eq!(compare(&Value::text("a"), CmpOp::Lt, &Value::text("b")), Ok(true));
}

#[test]
fn mismatched_types_support_only_equality() {
    assert_eq!(compare(&Value::int(1), CmpOp::Eq, &Value::text("1")), Ok(false));
    assert_eq!(compare(&Value::int(1), CmpOp::Ne, &Value::text("1")), Ok(true));
    assert!(compare(&Value::int(1), CmpOp::Lt, &Value::text("1")).is_err());
}

#[test]
fn condition_length_depends_on_operator() {
    let full = [Token::ident("x"), punct(Punct::EqEq), Token::int(1), Token::ident("ping")];
    assert_eq!(condition_len(&full), 3);
    let bare = [Token::ident("x"), Token::ident("ping")];
    assert_eq!(condition_len(&bare), 1);
    assert_eq!(condition_len(&[]), 0);
}

#[test]
fn operand_run_stops_at_commands_and_arrow() {
    let state = RuntimeState::new();
    let tokens = [
        Token::int(1),
        Token::ident("x"),
        punct(Punct::Arrow),
        Token::ident("r"),
    ];
    assert_eq!(operand_run(&state, &tokens), 2);
    let tokens = [Token::ident("a"), Token::ident("print")];
    assert_eq!(operand_run(&state, &tokens), 1);
}
