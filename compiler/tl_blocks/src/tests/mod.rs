use super::*;
use pretty_assertions::assert_eq;

mod properties;

fn words(source: &str) -> Vec<Token> {
    source.split_whitespace().map(Token::ident).collect()
}

#[test]
fn flat_blocks_are_roots() {
    let tokens = words("if x == 1 ping end loop 3 ping end");
    let tree = structure(&tokens).unwrap_or_default();
    assert_eq!(tree.roots.len(), 2);
    assert_eq!(tree.closer(0), Some(5));
    assert_eq!(tree.closer(6), Some(9));
    assert_eq!(tree.kind_at(6), Some(BlockKind::Loop));
}

#[test]
fn nested_blocks_become_children() {
    let tokens = words("def f loop 2 if a == b ping end end end");
    let tree = structure(&tokens).unwrap_or_default();
    assert_eq!(tree.roots.len(), 1);
    let def = &tree.roots[0];
    assert_eq!((def.kind, def.open, def.close), (BlockKind::Def, 0, 11));
    assert_eq!(def.children[0].kind, BlockKind::Loop);
    assert_eq!(def.children[0].children[0].kind, BlockKind::If);
    assert_eq!(tree.max_depth(), 3);
}

#[test]
fn struct_instance_commands_do_not_open_blocks() {
    let tokens = words("struct Point x:int y:int end struct new Point p struct set p x 1");
    let tree = structure(&tokens).unwrap_or_default();
    assert_eq!(tree.block_count(), 1);
    assert_eq!(tree.kind_at(0), Some(BlockKind::StructType));
}

#[test]
fn class_members_open_blocks_only_inside_class() {
    let tokens = words("class A method m ping end static s ping end init ping end end");
    let tree = structure(&tokens).unwrap_or_default();
    let class = &tree.roots[0];
    let kinds: Vec<BlockKind> = class.children.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BlockKind::Method, BlockKind::Static, BlockKind::Init]);

    // Outside a class `init` is an ordinary word.
    let tree = structure(&words("init ping")).unwrap_or_default();
    assert_eq!(tree.block_count(), 0);
}

#[test]
fn alias_operands_are_quoted() {
    let tokens = words("alias rpt loop ping");
    let tree = structure(&tokens);
    assert_eq!(tree.map(|t| t.block_count()), Ok(0));
}

#[test]
fn unknown_keywords_fail_open() {
    let tree = structure(&words("for x ping")).unwrap_or_default();
    assert_eq!(tree.block_count(), 0);
}

#[test]
fn stray_end_is_an_error() {
    let err = structure(&words("ping end")).err();
    assert_eq!(err.map(|e| e.to_string()), Some("Unexpected 'end' with no open block".to_string()));
}

#[test]
fn unclosed_block_names_innermost_opener() {
    let tokens = words("try if x == 1 ping end");
    let err = structure(&tokens).err();
    assert_eq!(
        err,
        Some(BlockError::Unclosed {
            kind: BlockKind::Try,
            span: Span::DUMMY
        })
    );

    let err = structure(&words("def f while a < b ping end")).err();
    assert_eq!(err.map(|e| e.to_string()), Some("Unclosed 'def' block".to_string()));
}

#[test]
fn unclosed_converts_to_block_error_code() {
    let err = structure(&words("loop 3")).err();
    let pipeline = err.map(PipelineError::from);
    assert_eq!(pipeline.map(|e| e.code), Some(ErrorCode::E1002));
}
