use proptest::prelude::*;

use super::*;

/// Balanced streams built from opener/body/end fragments.
fn balanced() -> impl Strategy<Value = Vec<String>> {
    let leaf = prop::sample::select(vec!["ping", "print", "x", "1"])
        .prop_map(|w| vec![w.to_string()]);
    leaf.prop_recursive(4, 64, 6, |inner| {
        (
            prop::sample::select(vec!["if", "loop", "while", "def", "try", "switch"]),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(opener, body)| {
                let mut out = vec![opener.to_string()];
                out.extend(body.into_iter().flatten());
                out.push("end".to_string());
                out
            })
    })
}

proptest! {
    #[test]
    fn balanced_streams_structure(parts in prop::collection::vec(balanced(), 0..4)) {
        let tokens: Vec<Token> = parts.iter().flatten().map(Token::ident).collect();
        let openers = tokens.iter().filter(|t| t.as_ident().and_then(BlockKind::opener).is_some()).count();
        let tree = structure(&tokens);
        prop_assert!(tree.is_ok());
        prop_assert_eq!(tree.map(|t| t.block_count()).unwrap_or_default(), openers);
    }

    #[test]
    fn depth_never_negative(seq in prop::collection::vec(prop::bool::ANY, 0..32)) {
        // true = opener, false = end
        let tokens: Vec<Token> = seq.iter().map(|&open| Token::ident(if open { "if" } else { "end" })).collect();
        let mut depth: i64 = 0;
        let mut valid = true;
        for &open in &seq {
            depth += if open { 1 } else { -1 };
            if depth < 0 { valid = false; break; }
        }
        valid &= depth == 0;
        prop_assert_eq!(structure(&tokens).is_ok(), valid);
    }
}
