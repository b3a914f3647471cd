//! Tests for bounds-checked buffer access.

use super::cursor::{Cursor, CursorError, bytes_from_words, range_u8, range_u16, words_from_bytes};

#[test]
fn cursor_reads_sequentially() {
    let buf = [0x01u8, 0x34, 0x12, 0xFF];
    let mut cur = Cursor::new(&buf);

    assert_eq!(cur.read_u8().unwrap(), 0x01);
    assert_eq!(cur.read_u16().unwrap(), 0x1234);
    assert_eq!(cur.pos(), 3);
    assert_eq!(cur.read_u8().unwrap(), 0xFF);
    assert!(cur.is_at_end());
}

#[test]
fn cursor_fails_past_end() {
    let buf = [0x01u8, 0x02];
    let mut cur = Cursor::at(&buf, 1);

    // Only one byte left: u16 read fails, position reflects the partial read
    let err = cur.read_u16().unwrap_err();
    assert_eq!(err, CursorError { index: 2, len: 2 });

    let mut empty = Cursor::new(&[]);
    assert!(empty.read_u8().is_err());
    assert!(empty.is_at_end());
}

#[test]
fn cursor_error_is_descriptive() {
    let err = CursorError { index: 7, len: 4 };
    assert_eq!(err.to_string(), "index out of range: got 7, expected [0, 4)");
}

#[test]
fn cursor_reads_ranges() {
    let buf = [1u8, 2, 3, 4, 5];
    let mut cur = Cursor::at(&buf, 1);
    assert_eq!(cur.read_bytes(3).unwrap(), &[2, 3, 4]);
    assert_eq!(cur.pos(), 4);
    assert!(cur.read_bytes(2).is_err());
}

#[test]
fn range_reads_check_bounds() {
    let bytes = [1u8, 2, 3];
    assert_eq!(range_u8(&bytes, 0, 3).unwrap(), &[1, 2, 3]);
    assert_eq!(range_u8(&bytes, 2, 1).unwrap(), &[3]);
    assert!(range_u8(&bytes, 2, 2).is_err());
    assert!(range_u8(&bytes, 3, 1).is_err());
    // Zero-length read at the end is fine
    assert_eq!(range_u8(&bytes, 3, 0).unwrap(), &[] as &[u8]);

    let words = [10u16, 20, 30];
    assert_eq!(range_u16(&words, 1, 2).unwrap(), &[20, 30]);
    assert!(range_u16(&words, 1, 3).is_err());
}

#[test]
fn word_packing_round_trips() {
    assert_eq!(words_from_bytes(&[0x34, 0x12, 0x78, 0x56]), vec![0x1234, 0x5678]);
    // Odd tail is zero-padded in the high byte
    assert_eq!(words_from_bytes(&[0x34, 0x12, 0x56]), vec![0x1234, 0x0056]);
    assert_eq!(words_from_bytes(&[]), Vec::<u16>::new());

    assert_eq!(bytes_from_words(&[0x1234, 0x5678]), vec![0x34, 0x12, 0x78, 0x56]);
}
