use super::*;
use pretty_assertions::assert_eq;

#[test]
fn try_from_range_accepts_small_offsets() {
    assert_eq!(Span::try_from_range(3..9), Ok(Span::new(3, 9)));
}

#[test]
fn try_from_range_rejects_huge_offsets() {
    let huge = usize::try_from(u64::from(u32::MAX) + 1).unwrap_or(usize::MAX);
    assert_eq!(
        Span::try_from_range(huge..huge),
        Err(SpanError::StartTooLarge(huge))
    );
}

#[test]
fn merge_covers_both_spans() {
    let merged = Span::new(10, 12).merge(Span::new(2, 5));
    assert_eq!(merged, Span::new(2, 12));
    assert_eq!(merged.len(), 10);
}

#[test]
fn dummy_span_is_empty() {
    assert!(Span::DUMMY.is_empty());
    assert_eq!(format!("{:?}", Span::new(1, 4)), "1..4");
}
