//! End-to-end decode scenarios, built from hand-assembled JOSSP byte
//! streams rather than exercising the parser's private helpers directly.

mod support;

use jossp::token::*;
use jossp::{Content, Decoder, Error, Primitive, Project, BASE_HANDLE};
use support::StreamBuilder;

fn decode_one(bytes: Vec<u8>) -> Content {
    Decoder::new(bytes::Bytes::from(bytes))
        .decode_one()
        .unwrap()
        .unwrap()
}

/// A short string decodes to its bytes, and the handle counter advances by
/// exactly one.
#[test]
fn decodes_short_string() {
    let bytes = StreamBuilder::new().tc_string("hi").finish();
    let mut decoder = Decoder::new(bytes::Bytes::from(bytes));
    let content = decoder.decode_one().unwrap().unwrap();
    assert_eq!(content, Content::String(b"hi".to_vec()));
    assert_eq!(decoder.next_handle(), BASE_HANDLE + 1);
}

/// A boxed `java.lang.Integer` decodes to an Object whose class-data holds
/// its `value` field as a signed-32 primitive.
#[test]
fn decodes_boxed_integer() {
    let bytes = StreamBuilder::new()
        .simple_int_object("java.lang.Integer", &[("value", 456789)])
        .finish();
    let content = decode_one(bytes);
    let obj = content.as_object().unwrap();
    assert_eq!(obj.class_name(), "java.lang.Integer");
    assert_eq!(
        obj.get("java.lang.Integer", "value").unwrap(),
        &Content::Primitive(Primitive::Int(456789))
    );
}

/// An enum constant decodes to an Enum node carrying its class descriptor
/// and constant name.
#[test]
fn decodes_enum_constant() {
    let bytes = StreamBuilder::new()
        .byte(TC_ENUM)
        .simple_classdesc("com.example.Status", sc::SERIALIZABLE | sc::ENUM)
        .tc_string("FUBAR")
        .finish();
    let content = decode_one(bytes);
    match content {
        Content::Enum(e) => {
            assert_eq!(e.class_desc.class_name, "com.example.Status");
            assert_eq!(e.constant_name, "FUBAR");
        }
        other => panic!("expected Enum, got {other:?}"),
    }
}

/// A length-4 byte array decodes to its raw signed-8 values; projecting
/// into a matching-length `[u8; 4]` succeeds, a mismatched length fails.
#[test]
fn decodes_byte_array_and_projects_into_fixed_array() {
    let bytes = StreamBuilder::new()
        .byte(TC_ARRAY)
        .simple_classdesc("[B", sc::SERIALIZABLE)
        .i32(4)
        .bytes(&[0x11, 0x22, 0x33, 0x44])
        .finish();
    let content = decode_one(bytes);
    let array = content.as_array().unwrap();
    assert_eq!(array.len(), 4);
    assert_eq!(
        array.values,
        vec![
            Content::Primitive(Primitive::Byte(0x11)),
            Content::Primitive(Primitive::Byte(0x22)),
            Content::Primitive(Primitive::Byte(0x33)),
            Content::Primitive(Primitive::Byte(0x44)),
        ]
    );

    let mut target = [0u8; 4];
    target.project(&content).unwrap();
    assert_eq!(target, [0x11, 0x22, 0x33, 0x44]);

    let mut too_short = [0u8; 2];
    let err = too_short.project(&content).unwrap_err();
    assert_eq!(
        err,
        Error::ArraySizeMismatch {
            expected: 2,
            actual: 4
        }
    );
}

/// Projecting a signed-32 field into a boolean target fails with a precise
/// coercion error.
#[test]
fn projection_type_mismatch_reports_source_and_target_kinds() {
    let bytes = StreamBuilder::new()
        .simple_int_object("com.edutko.Main$Foo", &[("i", 456789)])
        .finish();
    let content = decode_one(bytes);

    let mut target = false;
    let err = jossp::project_member(
        content.as_object().unwrap(),
        "com.edutko.Main$Foo/i",
        "",
        "",
        &mut target,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "type mismatch: cannot cast signed-32 to boolean");
}

/// A back-reference resolves to the same content the handle was registered
/// with.
#[test]
fn reference_resolves_to_registered_content() {
    let mut bytes = StreamBuilder::new().tc_string("hi").finish();
    bytes.push(TC_REFERENCE);
    bytes.extend_from_slice(&BASE_HANDLE.to_be_bytes());

    let mut decoder = Decoder::new(bytes::Bytes::from(bytes));
    let first = decoder.decode_one().unwrap().unwrap();
    let second = decoder.decode_one().unwrap().unwrap();
    assert_eq!(first, second);
}

/// An unknown handle in a `TC_REFERENCE` is reported, not panicked on.
#[test]
fn reference_to_unknown_handle_is_bad_handle() {
    let bytes = StreamBuilder::new().tc_reference(BASE_HANDLE).finish();
    let mut decoder = Decoder::new(bytes::Bytes::from(bytes));
    assert_eq!(decoder.decode_one(), Err(Error::BadHandle(BASE_HANDLE)));
}

/// A proxy class descriptor still consumes a handle even though the
/// parser refuses to descend into it.
#[test]
fn proxy_classdesc_consumes_handle_but_is_not_supported() {
    let bytes = StreamBuilder::new().byte(TC_PROXYCLASSDESC).finish();
    let mut decoder = Decoder::new(bytes::Bytes::from(bytes));
    let err = decoder.decode_one().unwrap_err();
    assert!(matches!(err, Error::NotSupported(_)));
    assert_eq!(decoder.next_handle(), BASE_HANDLE + 1);
}
