use super::*;

#[test]
fn test_decode_ascii_chunks() {
    let mut decoder = Utf8Decoder::new();
    assert_eq!(decoder.decode(b"Hello "), "Hello ");
    assert_eq!(decoder.decode(b"world"), "world");
    assert_eq!(decoder.finish(), "");
}

#[test]
fn test_two_byte_char_split_across_chunks() {
    let bytes = "café".as_bytes();
    let (head, tail) = bytes.split_at(bytes.len() - 1);

    let mut decoder = Utf8Decoder::new();
    assert_eq!(decoder.decode(head), "caf");
    assert_eq!(decoder.decode(tail), "é");
    assert_eq!(decoder.finish(), "");
}

#[test]
fn test_four_byte_char_split_over_three_chunks() {
    let crab = "🦀".as_bytes();
    assert_eq!(crab.len(), 4);

    let mut decoder = Utf8Decoder::new();
    let mut first = b"rust ".to_vec();
    first.push(crab[0]);
    assert_eq!(decoder.decode(&first), "rust ");
    assert_eq!(decoder.decode(&crab[1..3]), "");
    let mut last = vec![crab[3]];
    last.extend_from_slice(b" is fun");
    assert_eq!(decoder.decode(&last), "🦀 is fun");
}

#[test]
fn test_every_split_point_decodes_once() {
    let text = "日本語のテキスト 👋 ok";
    let bytes = text.as_bytes();
    for split in 0..=bytes.len() {
        let mut decoder = Utf8Decoder::new();
        let mut out = decoder.decode(&bytes[..split]);
        out.push_str(&decoder.decode(&bytes[split..]));
        out.push_str(&decoder.finish());
        assert_eq!(out, text, "split at {split}");
    }
}

#[test]
fn test_invalid_bytes_are_replaced() {
    let mut decoder = Utf8Decoder::new();
    assert_eq!(decoder.decode(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    assert_eq!(decoder.finish(), "");
}

#[test]
fn test_dangling_bytes_flushed_on_finish() {
    let mut decoder = Utf8Decoder::new();
    assert_eq!(decoder.decode(&[b'x', 0xE2, 0x82]), "x");
    assert_eq!(decoder.finish(), "\u{FFFD}");
    assert_eq!(decoder.finish(), "");
}
