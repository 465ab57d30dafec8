use super::*;
use pretty_assertions::assert_eq;

#[test]
fn invalid_character_message_names_the_text() {
    let err = LexError::new(LexErrorKind::InvalidCharacter, Span::new(4, 5), "%");
    let pipeline = PipelineError::from(err);
    assert_eq!(pipeline.code, ErrorCode::E0002);
    assert_eq!(pipeline.message, "Invalid character '%'");
}

#[test]
fn unterminated_string_message_is_bare() {
    let err = LexError::new(LexErrorKind::UnterminatedString, Span::new(0, 9), "\"abc\nxyz");
    assert_eq!(err.text, "\"abc");
    assert_eq!(PipelineError::from(err).message, "Unterminated string literal");
}
