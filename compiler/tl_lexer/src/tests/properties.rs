use proptest::prelude::*;

use super::*;

proptest! {
    #[test]
    fn never_panics(source in "\\PC{0,64}") {
        let _ = tokenize(&source);
    }

    #[test]
    fn words_separated_by_whitespace_survive(words in prop::collection::vec("[a-z_][a-z0-9_]{0,8}", 0..12)) {
        let source = words.join(" \n\t");
        let tokens = tokenize(&source).unwrap_or_default();
        let texts: Vec<String> = tokens.iter().map(Token::text).collect();
        prop_assert_eq!(texts, words);
    }

    #[test]
    fn integers_keep_their_value(n in any::<i64>()) {
        let tokens = tokenize(&n.to_string()).unwrap_or_default();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(&tokens[0].kind, &TokenKind::Number(Number::Int(n)));
    }
}
