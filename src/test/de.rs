use crate::de::Decoder;
use crate::error::{ErrorKind, Phase, Result};
use crate::{Compound, DecodeOptions, Tag, Value};

use super::builder::Builder;

fn decoder(input: &[u8]) -> Decoder<'_> {
    Decoder::new(input, DecodeOptions::default())
}

fn compound(input: &[u8]) -> Result<Compound> {
    decoder(input).decode_compound()
}

#[test]
fn scalar_fixtures() -> Result<()> {
    assert_eq!(decoder(&[0x80]).decode_tag(1)?, Value::Byte(-128));
    assert_eq!(
        decoder(&[0xFF, 0xFF, 0xFF, 0x7F]).decode_tag(3)?,
        Value::Int(2147483647)
    );
    assert_eq!(
        decoder(&[0, 0, 0, 0, 0, 0, 0, 0x80]).decode_tag(4)?,
        Value::Long(i64::MIN)
    );
    Ok(())
}

#[test]
fn simple_string() -> Result<()> {
    let input = [0x03, 0x00, 0x41, 0x42, 0x43];
    assert_eq!(
        decoder(&input).decode_tag(Tag::String as u8)?,
        Value::String("ABC".to_owned())
    );
    Ok(())
}

#[test]
fn string_length_is_unsigned() -> Result<()> {
    let s = "x".repeat(0xFFFF);
    let input = Builder::new().string_payload(&s).build();
    assert_eq!(&input[..2], &[0xFF, 0xFF]);

    let mut de = decoder(&input);
    assert_eq!(de.decode_tag(Tag::String as u8)?, Value::String(s));
    assert!(de.cursor().is_empty());
    Ok(())
}

#[test]
fn string_longer_than_input() {
    let input = Builder::new().raw_str_len(10).raw_bytes(b"abc").build();
    let err = decoder(&input).decode_tag(Tag::String as u8).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::MalformedLength {
            len: 10,
            remaining: 3
        }
    ));
}

#[test]
fn nonunicode_string() {
    let input = Builder::new().raw_str_len(2).raw_bytes(&[0xC3, 0x28]).build();
    let err = decoder(&input).decode_tag(Tag::String as u8).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NonUnicodeString(bs) if bs == &[0xC3, 0x28]));
}

#[test]
fn unicode_string() -> Result<()> {
    let input = Builder::new().string_payload("päivää 😈").build();
    assert_eq!(
        decoder(&input).decode_tag(Tag::String as u8)?,
        Value::String("päivää 😈".to_owned())
    );
    Ok(())
}

#[test]
fn every_scalar_in_compound() -> Result<()> {
    let input = Builder::new()
        .byte("b", -1)
        .short("s", -300)
        .int("i", 70_000)
        .long("l", 1 << 40)
        .float("f", 1.25)
        .double("d", -2.5)
        .string("str", "hello")
        .end_compound()
        .build();

    let c = compound(&input)?;
    assert_eq!(c["b"], Value::Byte(-1));
    assert_eq!(c["s"], Value::Short(-300));
    assert_eq!(c["i"], Value::Int(70_000));
    assert_eq!(c["l"], Value::Long(1 << 40));
    assert_eq!(c["f"], Value::Float(1.25));
    assert_eq!(c["d"], Value::Double(-2.5));
    assert_eq!(c["str"], Value::String("hello".to_owned()));
    Ok(())
}

#[test]
fn compound_keeps_input_order() -> Result<()> {
    let input = Builder::new()
        .int("z", 1)
        .int("a", 2)
        .int("m", 3)
        .end_compound()
        .build();

    let keys: Vec<_> = compound(&input)?.keys().cloned().collect();
    assert_eq!(keys, ["z", "a", "m"]);
    Ok(())
}

#[test]
fn arrays() -> Result<()> {
    let input = Builder::new()
        .byte_array("bytes", &[1, 2, 255])
        .int_array("ints", &[1, -2, i32::MAX])
        .long_array("longs", &[i64::MIN, 0])
        .byte_array("empty", &[])
        .end_compound()
        .build();

    let c = compound(&input)?;
    assert_eq!(c["bytes"], Value::ByteArray(vec![1, 2, 255]));
    assert_eq!(c["ints"], Value::IntArray(vec![1, -2, i32::MAX]));
    assert_eq!(c["longs"], Value::LongArray(vec![i64::MIN, 0]));
    assert_eq!(c["empty"], Value::ByteArray(vec![]));
    Ok(())
}

#[test]
fn negative_array_length() {
    let input = Builder::new()
        .tag(Tag::IntArray)
        .name("ints")
        .int_payload(-5)
        .end_compound()
        .build();

    let err = compound(&input).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedLength { len: -5, .. }));
    assert_eq!(err.path_string(), "ints");
}

#[test]
fn long_array_length_beyond_input() {
    // Would need 8 GiB if the length were trusted.
    let input = Builder::new()
        .tag(Tag::LongArray)
        .name("longs")
        .int_payload(i32::MAX)
        .long_payload(1)
        .build();

    let err = compound(&input).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::MalformedLength { len, .. } if *len == i32::MAX as i64
    ));
}

#[test]
fn empty_compound() -> Result<()> {
    let mut de = decoder(&[0x00]);
    assert!(de.decode_compound()?.is_empty());
    assert!(de.cursor().is_empty());
    Ok(())
}

#[test]
fn duplicate_names_last_wins() -> Result<()> {
    let input = Builder::new()
        .int("a", 1)
        .int("b", 2)
        .string("a", "second")
        .end_compound()
        .build();

    let c = compound(&input)?;
    assert_eq!(c.len(), 2);
    assert_eq!(c["a"], Value::String("second".to_owned()));
    Ok(())
}

#[test]
fn empty_list_of_any_type_consumes_five_bytes() -> Result<()> {
    for element in [0x00, 0x01, 0x08, 0x0A, 0x0C, 0x7F, 0xFF] {
        let input = Builder::new()
            .raw_bytes(&[element])
            .int_payload(0)
            .raw_bytes(&[0xAA, 0xBB])
            .build();

        let mut de = decoder(&input);
        assert_eq!(de.decode_tag(Tag::List as u8)?, Value::List(vec![]));
        assert_eq!(de.cursor().offset(), 5);
    }
    Ok(())
}

#[test]
fn list_of_ints() -> Result<()> {
    let input = Builder::new()
        .start_list("xs", Tag::Int, 3)
        .int_payload(1)
        .int_payload(2)
        .int_payload(3)
        .end_compound()
        .build();

    let c = compound(&input)?;
    assert_eq!(
        c["xs"],
        Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
    Ok(())
}

#[test]
fn list_of_compounds() -> Result<()> {
    let input = Builder::new()
        .start_list("items", Tag::Compound, 2)
        .start_anon_compound()
        .string("Name", "minecraft:stone")
        .byte("Count", 64)
        .end_compound()
        .start_anon_compound()
        .end_compound()
        .end_compound()
        .build();

    let c = compound(&input)?;
    let items = c["items"].as_list().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].get("Name").and_then(Value::as_str), Some("minecraft:stone"));
    assert_eq!(items[0].get("Count"), Some(&Value::Byte(64)));
    assert_eq!(items[1], Value::Compound(Compound::new()));
    Ok(())
}

#[test]
fn list_of_lists() -> Result<()> {
    let input = Builder::new()
        .start_list("outer", Tag::List, 2)
        .start_anon_list(Tag::Short, 1)
        .short_payload(7)
        .start_anon_list(Tag::End, 0)
        .end_compound()
        .build();

    let c = compound(&input)?;
    assert_eq!(
        c["outer"],
        Value::List(vec![Value::List(vec![Value::Short(7)]), Value::List(vec![])])
    );
    Ok(())
}

#[test]
fn negative_list_count() {
    let input = Builder::new().start_list("xs", Tag::Byte, -1).build();
    let err = compound(&input).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedLength { len: -1, .. }));
}

#[test]
fn list_count_beyond_input() {
    // Ten longs cannot fit in the 8 bytes that follow.
    let input = Builder::new()
        .start_list("xs", Tag::Long, 10)
        .long_payload(1)
        .build();

    let err = compound(&input).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedLength { len: 10, .. }));
}

#[test]
fn non_empty_list_of_unknown_type() {
    let input = Builder::new()
        .tag(Tag::List)
        .name("xs")
        .raw_bytes(&[0x7F])
        .int_payload(1)
        .build();

    let err = compound(&input).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnsupportedTagType(0x7F)));
}

#[test]
fn non_empty_list_of_end() {
    let input = Builder::new().start_list("xs", Tag::End, 2).build();
    let err = compound(&input).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnsupportedTagType(0)));
}

#[test]
fn huge_list_of_end_is_rejected_before_allocating() {
    let input = Builder::new()
        .start_list("xs", Tag::End, i32::MAX)
        .end_compound()
        .build();

    let err = compound(&input).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnsupportedTagType(0)));
    assert_eq!(err.phase(), Phase::ListHeader);
    assert_eq!(err.path_string(), "xs");
}

#[test]
fn unknown_tag_in_compound() {
    let input = Builder::new()
        .int("ok", 1)
        .raw_bytes(&[0x7F])
        .name("bad")
        .int_payload(2)
        .end_compound()
        .build();

    let err = compound(&input).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnsupportedTagType(0x7F)));
}

#[test]
fn dispatch_rejects_end_and_unknown() {
    for tag in [0x00, 0x0D, 0x7F, 0xFF] {
        let err = decoder(&[0; 16]).decode_tag(tag).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnsupportedTagType(t) if *t == tag));
    }
}

#[test]
fn truncated_scalar_in_compound() {
    let input = Builder::new()
        .tag(Tag::Int)
        .name("x")
        .raw_bytes(&[1, 2, 3])
        .build();

    let err = compound(&input).unwrap_err();
    assert!(err.is_unexpected_end());
}

#[test]
fn nested_compound_must_be_terminated() {
    let input = Builder::new().start_compound("inner").int("a", 1).build();
    let err = compound(&input).unwrap_err();
    assert!(err.is_unexpected_end());
    assert_eq!(err.path_string(), "inner");
}

#[test]
fn root_compound_may_end_without_end_tag() -> Result<()> {
    let input = Builder::new().int("a", 1).byte("b", 2).build();
    let c = decoder(&input).decode_root_compound()?;
    assert_eq!(c.len(), 2);
    Ok(())
}

#[test]
fn root_tolerance_does_not_extend_into_nested() {
    let input = Builder::new()
        .int("a", 1)
        .start_compound("inner")
        .byte("b", 2)
        .build();

    let err = decoder(&input).decode_root_compound().unwrap_err();
    assert!(err.is_unexpected_end());
}

#[test]
fn trailing_bytes_are_left_alone() -> Result<()> {
    let input = Builder::new()
        .int("a", 1)
        .end_compound()
        .raw_bytes(&[9, 9, 9])
        .build();

    let mut de = decoder(&input);
    de.decode_root_compound()?;
    assert_eq!(de.cursor().remaining(), 3);
    Ok(())
}

fn nested_compounds(depth: usize) -> Vec<u8> {
    let mut b = Builder::new();
    for _ in 0..depth {
        b = b.start_compound("c");
    }
    for _ in 0..=depth {
        b = b.end_compound();
    }
    b.build()
}

#[test]
fn depth_limit_allows_exact_depth() -> Result<()> {
    // The outer compound plus two nested ones.
    let input = nested_compounds(2);
    let opts = DecodeOptions::new().max_depth(3);
    Decoder::new(&input, opts).decode_compound()?;
    Ok(())
}

#[test]
fn depth_limit_rejects_deeper() {
    let input = nested_compounds(3);
    let opts = DecodeOptions::new().max_depth(3);
    let err = Decoder::new(&input, opts).decode_compound().unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::DepthLimitExceeded { limit: 3 }
    ));
    assert_eq!(err.path_string(), "c.c.c");
}

#[test]
fn lists_count_towards_depth() {
    let input = Builder::new()
        .start_list("l", Tag::List, 1)
        .start_anon_list(Tag::Byte, 1)
        .byte_payload(1)
        .end_compound()
        .build();

    let opts = DecodeOptions::new().max_depth(2);
    let err = Decoder::new(&input, opts).decode_compound().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DepthLimitExceeded { .. }));
}

#[test]
fn empty_list_needs_no_depth() -> Result<()> {
    let input = Builder::new()
        .start_list("empty", Tag::Byte, 0)
        .end_compound()
        .build();

    let opts = DecodeOptions::new().max_depth(1);
    let c = Decoder::new(&input, opts).decode_compound()?;
    assert_eq!(c["empty"], Value::List(vec![]));
    Ok(())
}

#[test]
fn default_depth_stops_deep_input() {
    let input = nested_compounds(DecodeOptions::DEFAULT_MAX_DEPTH + 10);
    let err = decoder(&input).decode_compound().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DepthLimitExceeded { .. }));
}
