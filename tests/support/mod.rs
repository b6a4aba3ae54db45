//! Hand-rolled JOSSP byte-stream construction, for tests that exercise the
//! decoder end to end instead of going through its internal types.

use jossp::token::*;

pub struct StreamBuilder {
    bytes: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> StreamBuilder {
        StreamBuilder {
            bytes: vec![STREAM_MAGIC[0], STREAM_MAGIC[1]],
        }
        .u16(STREAM_VERSION)
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    pub fn byte(mut self, b: u8) -> StreamBuilder {
        self.bytes.push(b);
        self
    }

    pub fn bytes(mut self, b: &[u8]) -> StreamBuilder {
        self.bytes.extend_from_slice(b);
        self
    }

    pub fn u16(mut self, v: u16) -> StreamBuilder {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn i16(mut self, v: i16) -> StreamBuilder {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn i32(mut self, v: i32) -> StreamBuilder {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn u32(mut self, v: u32) -> StreamBuilder {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn i64(mut self, v: i64) -> StreamBuilder {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn f32(mut self, v: f32) -> StreamBuilder {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn f64(mut self, v: f64) -> StreamBuilder {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// A short-UTF length-prefixed run: unsigned-16 length, then the bytes.
    pub fn short_utf(self, s: &str) -> StreamBuilder {
        self.u16(s.len() as u16).bytes(s.as_bytes())
    }

    /// `TC_STRING` followed by a short-UTF body.
    pub fn tc_string(self, s: &str) -> StreamBuilder {
        self.byte(TC_STRING).short_utf(s)
    }

    pub fn tc_null(self) -> StreamBuilder {
        self.byte(TC_NULL)
    }

    pub fn tc_endblockdata(self) -> StreamBuilder {
        self.byte(TC_ENDBLOCKDATA)
    }

    pub fn tc_reference(self, handle: u32) -> StreamBuilder {
        self.byte(TC_REFERENCE).i32(handle as i32)
    }

    /// `TC_CLASSDESC` header up through its flags/field-count; caller
    /// supplies field descriptors, then must still close the annotation run
    /// (`tc_endblockdata`) and a super-class-descriptor slot (`tc_null`, a
    /// nested `classdesc_header`, or `tc_reference`).
    pub fn classdesc_header(self, name: &str, serial_version_uid: i64, flags: u8, field_count: i16) -> StreamBuilder {
        self.byte(TC_CLASSDESC)
            .short_utf(name)
            .i64(serial_version_uid)
            .byte(flags)
            .i16(field_count)
    }

    /// A primitive-typed field descriptor: one type-code byte, then its
    /// short-UTF name.
    pub fn field_desc_primitive(self, type_code: u8, name: &str) -> StreamBuilder {
        self.byte(type_code).short_utf(name)
    }

    /// An object/array-typed field descriptor: type-code byte, name, then a
    /// string content slot naming the field's class qualifier.
    pub fn field_desc_object(self, type_code: u8, name: &str, class_name: &str) -> StreamBuilder {
        self.byte(type_code).short_utf(name).tc_string(class_name)
    }

    /// A no-fields, no-annotation, no-superclass class descriptor for a
    /// leaf class such as `[B` or a boxed wrapper.
    pub fn simple_classdesc(self, name: &str, flags: u8) -> StreamBuilder {
        self.classdesc_header(name, 0, flags, 0)
            .tc_endblockdata()
            .tc_null()
    }

    /// `TC_OBJECT` wrapping a no-super, serializable class descriptor with
    /// the given primitive `i32` fields (name/value pairs), no annotation.
    pub fn simple_int_object(self, class_name: &str, fields: &[(&str, i32)]) -> StreamBuilder {
        let mut b = self
            .byte(TC_OBJECT)
            .classdesc_header(class_name, 0, sc::SERIALIZABLE, fields.len() as i16);
        for (name, _) in fields {
            b = b.field_desc_primitive(b'I', name);
        }
        b = b.tc_endblockdata().tc_null();
        for (_, value) in fields {
            b = b.i32(*value);
        }
        b
    }
}
