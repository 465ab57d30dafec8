use super::*;

#[test]
fn stage_predicates_follow_prefix() {
    assert!(ErrorCode::E0001.is_lexer_error());
    assert!(!ErrorCode::E1002.is_lexer_error());
    assert!(ErrorCode::E2003.is_macro_error());
    assert!(!ErrorCode::E3001.is_macro_error());
}

#[test]
fn display_matches_as_str() {
    assert_eq!(ErrorCode::E2003.to_string(), "E2003");
}
