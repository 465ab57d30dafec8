use super::*;
use pretty_assertions::assert_eq;

#[test]
fn openers_round_trip_through_keyword() {
    for word in [
        "def", "fn", "if", "loop", "while", "switch", "match", "try", "macro", "struct", "class",
    ] {
        let kind = BlockKind::opener(word);
        assert_eq!(kind.map(BlockKind::keyword), Some(word));
    }
}

#[test]
fn class_members_are_not_top_level_openers() {
    for word in ["method", "static", "init"] {
        assert_eq!(BlockKind::opener(word), None);
        assert_eq!(BlockKind::class_member(word).map(BlockKind::keyword), Some(word));
    }
}

#[test]
fn unknown_words_are_not_openers() {
    assert_eq!(BlockKind::opener("for"), None);
    assert_eq!(BlockKind::opener("end"), None);
    assert!(is_separator("catch"));
    assert!(!is_separator("end"));
}
