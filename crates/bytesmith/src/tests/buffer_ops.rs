use rstest::rstest;

use crate::{AllocPolicy, Buffer, Error};

// ─────────────────────────────────────────────────────────────────────
// Growth, shrink, and capacity accounting
// ─────────────────────────────────────────────────────────────────────

#[test]
fn concat_grows_and_tracks_sizes() {
    let mut buf = Buffer::from_slice(b"Hello").unwrap();
    buf.concat(b" World").unwrap();

    assert_eq!(buf, "Hello World");
    assert_eq!(buf.len(), 11);
    assert!(buf.capacity() >= buf.len());
    assert_eq!(buf.free_space(), buf.capacity() - buf.len());
}

#[test]
fn appending_single_bytes_reallocates_logarithmically() {
    let mut buf = Buffer::new();
    let mut moves = 0usize;
    let mut last = buf.as_bytes_with_nul().as_ptr();

    for _ in 0..4096 {
        buf.concat(b"x").unwrap();
        let now = buf.as_bytes_with_nul().as_ptr();
        if now != last {
            moves += 1;
            last = now;
        }
    }

    assert_eq!(buf.len(), 4096);
    // Doubling growth: well under one reallocation per two hundred appends.
    assert!(moves <= 16, "{moves} reallocations for 4096 appends");
}

#[test]
fn reserve_is_a_floor_not_a_target() {
    let mut buf = Buffer::with_capacity(100).unwrap();
    let cap = buf.capacity();
    buf.reserve(5).unwrap();
    assert_eq!(buf.capacity(), cap);

    buf.concat(b"abc").unwrap();
    buf.reserve(cap).unwrap();
    assert!(buf.free_space() >= cap);
}

#[test]
fn set_free_space_shrinks_oversized_allocations() {
    let mut buf = Buffer::with_capacity(400).unwrap();
    buf.concat(b"tiny").unwrap();

    buf.set_free_space(10).unwrap();
    assert_eq!(buf, "tiny");
    assert!(buf.free_space() >= 10);
    assert!(buf.capacity() < 400);
}

#[test]
fn grow_zero_fills_the_new_tail() {
    let mut buf = Buffer::from_slice(b"ab").unwrap();
    buf.grow(5).unwrap();

    assert_eq!(buf.len(), 5);
    assert_eq!(buf.as_bytes(), b"ab\0\0\0");
    assert_eq!(buf.as_bytes_with_nul(), b"ab\0\0\0\0");

    // Growing to a smaller or equal length changes nothing.
    buf.grow(3).unwrap();
    assert_eq!(buf.len(), 5);
}

#[test]
fn truncate_keeps_capacity() {
    let mut buf = Buffer::from_slice(b"a longer piece of text").unwrap();
    let cap = buf.capacity();

    buf.truncate(8);
    assert_eq!(buf, "a longer");
    assert_eq!(buf.capacity(), cap);

    buf.truncate(100);
    assert_eq!(buf, "a longer");

    buf.clear();
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), cap);
}

// ─────────────────────────────────────────────────────────────────────
// In-place slicing and trimming
// ─────────────────────────────────────────────────────────────────────

#[rstest]
#[case(0, 3, b"Ehy")]
#[case(4, 7, b"how")]
#[case(0, 16, b"Ehy how are you?")]
#[case(12, 16, b"you?")]
#[case(3, 1000, b" how are you?")]
#[case(100, 102, b"Ehy how are you?")]
#[case(5, 2, b"Ehy how are you?")]
#[case(4, 4, b"")]
fn slice_in_place_cases(#[case] start: usize, #[case] end: usize, #[case] expected: &[u8]) {
    let mut buf = Buffer::from_slice(b"Ehy how are you?").unwrap();
    let cap = buf.capacity();

    buf.slice_in_place(start, end);

    assert_eq!(buf.as_bytes(), expected);
    assert_eq!(buf.capacity(), cap);
    assert_eq!(buf.as_bytes_with_nul().last(), Some(&0));
}

#[rstest]
#[case(b"   padded   ", b" ", b"padded")]
#[case(b"\t\n  mixed \t\n", b" \t\n", b"mixed")]
#[case(b"no-op", b" ", b"no-op")]
#[case(b"xxxyyy", b"xy", b"")]
#[case(b"", b" ", b"")]
#[case(b"inner  gap", b" ", b"inner  gap")]
fn trim_cases(#[case] src: &[u8], #[case] cutset: &[u8], #[case] expected: &[u8]) {
    let mut buf = Buffer::from_slice(src).unwrap();
    let cap = buf.capacity();

    buf.trim(cutset);

    assert_eq!(buf.as_bytes(), expected);
    assert_eq!(buf.capacity(), cap);
}

#[test]
fn one_sided_trims() {
    let mut buf = Buffer::from_slice(b"  both  ").unwrap();
    buf.trim_start(b" ");
    assert_eq!(buf, "both  ");

    let mut buf = Buffer::from_slice(b"  both  ").unwrap();
    buf.trim_end(b" ");
    assert_eq!(buf, "  both");
}

#[test]
fn trimming_everything_leaves_a_usable_buffer() {
    let mut buf = Buffer::from_slice(b"\t\t\t").unwrap();
    buf.trim(b"\t");

    assert!(buf.is_empty());
    assert_eq!(buf.as_bytes_with_nul(), b"\0");

    buf.concat(b"still fine").unwrap();
    assert_eq!(buf, "still fine");
}

// ─────────────────────────────────────────────────────────────────────
// Search and case conversion
// ─────────────────────────────────────────────────────────────────────

#[test]
fn find_and_rfind_locate_occurrences() {
    let buf = Buffer::from_slice(b"hello world hello").unwrap();

    assert_eq!(buf.find(b"hello"), Some(0));
    assert_eq!(buf.rfind(b"hello"), Some(12));
    assert_eq!(buf.find(b"world"), Some(6));
    assert_eq!(buf.find(b"absent"), None);
    assert!(buf.contains(b"o w"));
    assert!(!buf.contains(b"O W"));
}

#[test]
fn empty_needle_never_matches() {
    let buf = Buffer::from_slice(b"abc").unwrap();
    assert_eq!(buf.find(b""), None);
    assert_eq!(buf.rfind(b""), None);

    let empty = Buffer::new();
    assert_eq!(empty.find(b""), None);
}

#[test]
fn search_handles_interior_nul() {
    let buf = Buffer::from_slice(b"a\0b\0a").unwrap();
    assert_eq!(buf.len(), 5);
    assert_eq!(buf.find(b"\0b"), Some(1));
    assert_eq!(buf.rfind(b"a"), Some(4));
}

#[test]
fn ascii_case_conversion_ignores_other_bytes() {
    let mut buf = Buffer::from_slice(b"MiXeD-42 \xc3\x9c").unwrap();
    buf.make_ascii_lowercase();
    assert_eq!(buf, b"mixed-42 \xc3\x9c");

    buf.make_ascii_uppercase();
    assert_eq!(buf, b"MIXED-42 \xc3\x9c");
}

// ─────────────────────────────────────────────────────────────────────
// Prepend and clone
// ─────────────────────────────────────────────────────────────────────

#[test]
fn prepend_shifts_existing_content() {
    let mut buf = Buffer::from_slice(b"World").unwrap();
    buf.prepend(b"Hello ").unwrap();
    assert_eq!(buf, "Hello World");
    assert_eq!(buf.as_bytes_with_nul(), b"Hello World\0");

    let mut empty = Buffer::new();
    empty.prepend(b"onto nothing").unwrap();
    assert_eq!(empty, "onto nothing");
}

#[test]
fn prepend_and_concat_compose() {
    let mut middle = Buffer::from_slice(b"are").unwrap();
    let tail = Buffer::from_slice(b" you?").unwrap();
    middle.concat_buffer(&tail).unwrap();
    middle.prepend_str("how ").unwrap();
    middle.prepend_buffer(&Buffer::from_slice(b"Ehy ").unwrap()).unwrap();

    assert_eq!(middle, "Ehy how are you?");
    assert_eq!(tail, " you?");
}

#[test]
fn clones_do_not_share_storage() {
    let mut original = Buffer::from_slice(b"shared?").unwrap();
    let copy = original.try_clone().unwrap();

    original.concat(b" no").unwrap();
    original.make_ascii_uppercase();

    assert_eq!(original, "SHARED? NO");
    assert_eq!(copy, "shared?");
    assert!(copy.capacity() >= copy.len());
}

#[test]
fn std_clone_matches_try_clone() {
    let original = Buffer::from_slice(b"same bytes").unwrap();
    #[allow(clippy::redundant_clone)]
    let copy = original.clone();
    assert_eq!(copy, original);
}

// ─────────────────────────────────────────────────────────────────────
// Allocation-failure policy
// ─────────────────────────────────────────────────────────────────────

#[test]
fn propagate_policy_reports_and_preserves() {
    let mut buf = Buffer::from_slice(b"keep me").unwrap();
    let cap = buf.capacity();

    let err = buf.reserve(usize::MAX).unwrap_err();
    assert!(matches!(err, Error::Alloc { .. }));

    assert_eq!(buf, "keep me");
    assert_eq!(buf.capacity(), cap);
    assert_eq!(buf.as_bytes_with_nul(), b"keep me\0");
}

#[test]
fn grow_failure_leaves_buffer_unchanged() {
    let mut buf = Buffer::from_slice(b"ab").unwrap();
    assert!(buf.grow(usize::MAX).is_err());
    assert_eq!(buf, "ab");
}

#[test]
#[should_panic(expected = "failed to reserve")]
fn abort_policy_panics_on_impossible_reservation() {
    let mut buf = Buffer::new().with_alloc_policy(AllocPolicy::Abort);
    let _ = buf.reserve(usize::MAX);
}

#[test]
fn policy_flows_into_derived_values() {
    let buf = Buffer::from_slice(b"a b")
        .unwrap()
        .with_alloc_policy(AllocPolicy::Abort);

    assert_eq!(buf.alloc_policy(), AllocPolicy::Abort);
    assert_eq!(buf.try_clone().unwrap().alloc_policy(), AllocPolicy::Abort);

    let tokens = buf.split(b" ").unwrap();
    assert_eq!(tokens[0].alloc_policy(), AllocPolicy::Abort);
    assert_eq!(tokens[1].alloc_policy(), AllocPolicy::Abort);
}
