use crate::input::DetectionBuffer;

#[test]
fn keeps_only_the_most_recent_characters() {
    let mut buf = DetectionBuffer::new(10);
    buf.push_str("abcdefghijklmno");
    assert_eq!(buf.len(), 10);
    assert_eq!(buf.contents(), "fghijklmno");
}

#[test]
fn counts_code_points_not_bytes() {
    let mut buf = DetectionBuffer::new(3);
    buf.push_str("שלום");
    assert_eq!(buf.len(), 3);
    assert_eq!(buf.contents(), "לום");
}

#[test]
fn threshold_check_tracks_length() {
    let mut buf = DetectionBuffer::new(10);
    buf.push('a');
    buf.push('b');
    assert!(!buf.has_at_least(3));
    buf.push(' ');
    assert!(buf.has_at_least(3));
}

#[test]
fn clear_empties_the_buffer() {
    let mut buf = DetectionBuffer::default();
    buf.push_str("hello");
    buf.clear();
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), 10);
}

#[test]
fn zero_capacity_is_clamped_to_one() {
    let mut buf = DetectionBuffer::new(0);
    buf.push_str("ab");
    assert_eq!(buf.contents(), "b");
}
