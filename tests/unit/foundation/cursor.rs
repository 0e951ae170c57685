use super::*;

fn bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

#[test]
fn reads_little_endian_words() {
    let data = bytes(&[1, 0xAAAA_BBBB, (-7i32) as u32]);
    let mut c = WordCursor::new(&data);
    assert_eq!(c.read_u32().unwrap(), 1);
    assert_eq!(c.read_u32().unwrap(), 0xAAAA_BBBB);
    assert_eq!(c.read_i32().unwrap(), -7);
    assert_eq!(c.words_consumed(), 3);
    assert_eq!(c.remaining(), 0);
}

#[test]
fn out_of_bounds_read_fails_and_keeps_position() {
    let data = bytes(&[5, 6]);
    let mut c = WordCursor::new(&data);
    c.skip_words(1).unwrap();
    let err = c.read_words(2).unwrap_err();
    assert!(matches!(err, PowerError::MalformedRecord(_)));
    assert_eq!(c.position(), 4);
    assert_eq!(c.read_u32().unwrap(), 6);
    assert!(c.read_u32().is_err());
}

#[test]
fn partial_trailing_word_is_not_readable() {
    let data = [1u8, 2, 3];
    let mut c = WordCursor::new(&data);
    assert!(c.read_u32().is_err());
}

#[test]
fn huge_word_count_is_rejected() {
    let data = bytes(&[0]);
    let mut c = WordCursor::new(&data);
    assert!(c.take_words(usize::MAX).is_err());
}

#[test]
fn words_for_bytes_rounds_up() {
    assert_eq!(words_for_bytes(0), 0);
    assert_eq!(words_for_bytes(1), 1);
    assert_eq!(words_for_bytes(4), 1);
    assert_eq!(words_for_bytes(5), 2);
    assert_eq!(words_for_bytes(8), 2);
}

#[test]
fn sub_slice_checks_bounds() {
    let data = [0u8; 16];
    assert_eq!(sub_slice(&data, 8, 8).unwrap().len(), 8);
    assert!(sub_slice(&data, 12, 8).is_err());
    assert!(sub_slice(&data, usize::MAX, 2).is_err());
}
