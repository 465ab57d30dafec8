use super::*;
use pretty_assertions::assert_eq;

#[test]
fn whole_floats_keep_decimal_point() {
    assert_eq!(Number::Float(3.0).to_string(), "3.0");
    assert_eq!(Number::Float(2.5).to_string(), "2.5");
    assert_eq!(Number::Int(-7).to_string(), "-7");
}

#[test]
fn truthiness_is_non_zero() {
    assert!(Number::Int(2).is_truthy());
    assert!(!Number::Int(0).is_truthy());
    assert!(!Number::Float(0.0).is_truthy());
}

#[test]
fn string_tokens_render_escaped() {
    let tok = Token::string("say \"hi\"\n");
    assert_eq!(tok.to_string(), r#""say \"hi\"\n""#);
    assert_eq!(tok.text(), "say \"hi\"\n");
}

#[test]
fn ident_helpers() {
    let tok = Token::ident("print");
    assert!(tok.is_word("print"));
    assert!(!tok.is_word("set"));
    assert_eq!(tok.as_punct(), None);
    assert_eq!(Token::int(4).as_ident(), None);
}

#[test]
fn punct_round_trips_through_text() {
    let tok = Token::new(TokenKind::Punct(Punct::Arrow), Span::DUMMY);
    assert!(tok.is_punct(Punct::Arrow));
    assert_eq!(tok.text(), "->");
}
