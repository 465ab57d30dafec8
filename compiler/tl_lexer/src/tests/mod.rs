use super::*;
use pretty_assertions::assert_eq;

mod properties;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn ident(s: &str) -> TokenKind {
    TokenKind::Ident(s.to_string())
}

#[test]
fn commands_and_literals() {
    assert_eq!(
        kinds("set x 10\nprint \"hello world\""),
        vec![
            ident("set"),
            ident("x"),
            TokenKind::Number(Number::Int(10)),
            ident("print"),
            TokenKind::Str("hello world".to_string()),
        ]
    );
}

#[test]
fn integer_and_float_stay_distinct() {
    assert_eq!(
        kinds("1 1.0"),
        vec![
            TokenKind::Number(Number::Int(1)),
            TokenKind::Number(Number::Float(1.0)),
        ]
    );
}

#[test]
fn comments_are_discarded() {
    let source = "ping # not a command\n/* print \"x\"\n end */ ping";
    assert_eq!(kinds(source), vec![ident("ping"), ident("ping")]);
}

#[test]
fn comment_markers_inside_strings_are_text() {
    assert_eq!(
        kinds(r##"print "# /* kept */""##),
        vec![ident("print"), TokenKind::Str("# /* kept */".to_string())]
    );
}

#[test]
fn dotted_and_sigil_identifiers() {
    assert_eq!(
        kinds("call helper.wave $arg x:int"),
        vec![ident("call"), ident("helper.wave"), ident("$arg"), ident("x:int")]
    );
}

#[test]
fn comparison_punctuation() {
    assert_eq!(
        kinds("if x >= 3"),
        vec![
            ident("if"),
            ident("x"),
            TokenKind::Punct(Punct::GtEq),
            TokenKind::Number(Number::Int(3)),
        ]
    );
}

#[test]
fn spans_point_at_source() {
    let tokens = tokenize("boot  ping").unwrap_or_default();
    assert_eq!(tokens[1].span, Span::new(6, 10));
}

#[test]
fn first_token_of_each_line_is_marked() {
    let tokens = tokenize("def f a\n  print a # note\n\n/* gap */ end").unwrap_or_default();
    let starts: Vec<bool> = tokens.iter().map(|t| t.line_start).collect();
    assert_eq!(starts, vec![true, false, false, true, false, true]);
}

#[test]
fn unterminated_string_reports_start() {
    let err = tokenize("print \"oops").err();
    assert_eq!(err.as_ref().map(|e| e.kind.clone()), Some(LexErrorKind::UnterminatedString));
    assert_eq!(err.map(|e| e.span.start), Some(6));
}

#[test]
fn unterminated_block_comment_is_an_error() {
    let err = tokenize("ping /* never closed").err();
    assert_eq!(err.map(|e| e.kind), Some(LexErrorKind::UnterminatedComment));
}

#[test]
fn stray_character_is_an_error() {
    let err = tokenize("set x 1 ; ping").err();
    assert_eq!(err.as_ref().map(|e| e.kind.clone()), Some(LexErrorKind::InvalidCharacter));
    assert_eq!(err.map(|e| e.text), Some(";".to_string()));
}

#[test]
fn oversized_integer_is_an_error() {
    let err = tokenize("set x 99999999999999999999999").err();
    assert_eq!(err.map(|e| e.kind), Some(LexErrorKind::InvalidNumber));
}
