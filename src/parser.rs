//! The grammar parser: dispatches on token bytes, resolves handles, and
//! builds the neutral content tree.

use std::collections::HashMap;
use std::rc::Rc;

use bytes::Buf;

use crate::content::{
    element_type_from_class_name, ArrayData, ClassData, ClassDescriptor, Content, EnumData,
    FieldDesc, Handle, ObjectData, ANNOTATION_KEY,
};
use crate::error::{Error, Result};
use crate::handle::HandleTable;
use crate::reader;
use crate::token::*;

/// Walks a byte source implementing [`Buf`] and decodes JOSSP content.
///
/// A `Decoder` owns the handle table for one decode pass; the preamble is
/// consumed lazily on the first call to [`Decoder::decode_one`] or
/// [`Decoder::decode_all`], not at construction.
pub struct Decoder<B> {
    buf: B,
    handles: HandleTable,
    preamble_read: bool,
}

impl<B: Buf> Decoder<B> {
    pub fn new(buf: B) -> Decoder<B> {
        Decoder {
            buf,
            handles: HandleTable::new(),
            preamble_read: false,
        }
    }

    /// Discards handles and resets the handle counter, as if a `Reset`
    /// token had just been read.
    pub fn reset(&mut self) {
        self.handles.reset();
    }

    pub fn next_handle(&self) -> u32 {
        self.handles.next_handle()
    }

    /// Decodes exactly one top-level content element, or `None` once the
    /// source is exhausted. Tokens that carry no content of their own
    /// (`Null`, `Reset`, `EndBlockData`) are consumed but never returned.
    pub fn decode_one(&mut self) -> Result<Option<Content>> {
        self.ensure_preamble()?;
        self.next_content()
    }

    /// Decodes up to `limit` top-level content elements (`None`, or a
    /// negative limit, means "until end of stream").
    pub fn decode_all(&mut self, limit: Option<i64>) -> Result<Vec<Content>> {
        self.ensure_preamble()?;
        let mut out = Vec::new();
        loop {
            if let Some(n) = limit {
                if n >= 0 && out.len() as i64 >= n {
                    break;
                }
            }
            match self.next_content()? {
                Some(content) => out.push(content),
                None => break,
            }
        }
        Ok(out)
    }

    fn ensure_preamble(&mut self) -> Result<()> {
        if self.preamble_read {
            return Ok(());
        }
        let magic = reader::read_exact(&mut self.buf, 2)?;
        let version = reader::read_u16(&mut self.buf)?;
        if magic.as_slice() != STREAM_MAGIC || version != STREAM_VERSION {
            return Err(Error::InvalidStream);
        }
        self.preamble_read = true;
        Ok(())
    }

    /// Reads the next top-level element, skipping tokens that carry no
    /// content of their own (`Null`, `Reset`, `EndBlockData`) rather than
    /// surfacing them as `Content::Null` entries.
    fn next_content(&mut self) -> Result<Option<Content>> {
        loop {
            if !self.buf.has_remaining() {
                return Ok(None);
            }
            let content = self.read_content()?;
            if content != Content::Null {
                return Ok(Some(content));
            }
        }
    }

    fn read_content(&mut self) -> Result<Content> {
        let tc = reader::read_u8(&mut self.buf)?;
        self.read_content_with_token(tc)
    }

    fn read_content_with_token(&mut self, tc: u8) -> Result<Content> {
        match tc {
            TC_NULL => Ok(Content::Null),
            TC_REFERENCE => self.read_reference(),
            TC_CLASSDESC => self.read_new_class_desc_body().map(Content::ClassDesc),
            TC_OBJECT => self.read_new_object_body().map(Content::Object),
            TC_STRING => self.read_new_string(false).map(Content::String),
            TC_ARRAY => self.read_new_array().map(Content::Array),
            TC_CLASS => self.read_new_class().map(Content::Class),
            TC_BLOCKDATA => self.read_block_data(false).map(Content::BlockData),
            TC_ENDBLOCKDATA => Ok(Content::Null),
            TC_RESET => {
                self.handles.reset();
                Ok(Content::Null)
            }
            TC_BLOCKDATALONG => self.read_block_data(true).map(Content::BlockData),
            TC_EXCEPTION => self.read_exception(),
            TC_LONGSTRING => self.read_new_string(true).map(Content::String),
            TC_PROXYCLASSDESC => {
                self.handles.alloc();
                Err(Error::not_supported("proxy class descriptor"))
            }
            TC_ENUM => self.read_new_enum().map(Content::Enum),
            other => Err(Error::UnexpectedToken(other)),
        }
    }

    fn read_reference(&mut self) -> Result<Content> {
        let raw = reader::read_i32(&mut self.buf)?;
        let handle = Handle(raw as u32);
        Ok(self.handles.get(handle)?.clone())
    }

    /// Reads whatever a class-descriptor-typed slot accepts: a new class
    /// descriptor, a new proxy class descriptor, null, or a reference that
    /// resolves to a class descriptor.
    fn read_class_desc_slot(&mut self) -> Result<Option<Rc<ClassDescriptor>>> {
        let tc = reader::read_u8(&mut self.buf)?;
        match tc {
            TC_NULL => Ok(None),
            TC_REFERENCE => {
                let content = self.read_reference()?;
                match content {
                    Content::ClassDesc(cd) => Ok(Some(cd)),
                    Content::Class(cd) => Ok(cd),
                    _ => Err(Error::type_mismatch(
                        "reference in class-descriptor slot did not resolve to a class descriptor",
                    )),
                }
            }
            TC_CLASSDESC => self.read_new_class_desc_body().map(Some),
            TC_PROXYCLASSDESC => {
                self.handles.alloc();
                Err(Error::not_supported("proxy class descriptor"))
            }
            other => Err(Error::UnexpectedToken(other)),
        }
    }

    fn read_new_class_desc_body(&mut self) -> Result<Rc<ClassDescriptor>> {
        let name_bytes = reader::read_short_bytes(&mut self.buf)?;
        let class_name = String::from_utf8_lossy(&name_bytes).into_owned();
        let serial_version_uid = reader::read_i64(&mut self.buf)?;
        let handle = self.handles.alloc();

        let flags = reader::read_u8(&mut self.buf)?;
        let field_count = reader::read_i16(&mut self.buf)?;
        if field_count < 0 {
            return Err(Error::InvalidStream);
        }
        let mut fields = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            fields.push(self.read_field_desc()?);
        }

        let class_annotation = self.read_content_sequence_until_end_block_data()?;
        let super_desc = self.read_class_desc_slot()?;

        let desc = Rc::new(ClassDescriptor {
            class_name,
            serial_version_uid,
            flags,
            fields,
            class_annotation,
            super_desc,
        });
        self.handles.register(handle, Content::ClassDesc(desc.clone()));
        Ok(desc)
    }

    fn read_field_desc(&mut self) -> Result<FieldDesc> {
        let code_byte = reader::read_u8(&mut self.buf)?;
        let type_code =
            TypeCode::from_byte(code_byte).ok_or(Error::UnexpectedToken(code_byte))?;
        let name_bytes = reader::read_short_bytes(&mut self.buf)?;
        let name = String::from_utf8_lossy(&name_bytes).into_owned();

        let class_name = if type_code.is_object_like() {
            match self.read_content()? {
                Content::String(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
                _ => return Err(Error::InvalidStream),
            }
        } else {
            None
        };

        Ok(FieldDesc {
            type_code,
            name,
            class_name,
        })
    }

    fn read_content_sequence_until_end_block_data(&mut self) -> Result<Vec<Content>> {
        let mut out = Vec::new();
        loop {
            let tc = reader::read_u8(&mut self.buf)?;
            if tc == TC_ENDBLOCKDATA {
                break;
            }
            out.push(self.read_content_with_token(tc)?);
        }
        Ok(out)
    }

    fn read_new_class(&mut self) -> Result<Option<Rc<ClassDescriptor>>> {
        let desc = self.read_class_desc_slot()?;
        let handle = self.handles.alloc();
        self.handles.register(handle, Content::Class(desc.clone()));
        Ok(desc)
    }

    fn read_new_object_body(&mut self) -> Result<ObjectData> {
        let class_desc = self
            .read_class_desc_slot()?
            .ok_or_else(|| Error::type_mismatch("object class descriptor must not be null"))?;
        let handle = self.handles.alloc();

        let mut class_data: ClassData = HashMap::new();
        for class in class_desc.chain_root_to_concrete() {
            let mut fields = HashMap::new();
            for field in &class.fields {
                let value = self.read_value(field.type_code)?;
                fields.insert(field.name.clone(), value);
            }
            if class.carries_annotation() {
                let annotation = self.read_content_sequence_until_end_block_data()?;
                if !annotation.is_empty() {
                    fields.insert(ANNOTATION_KEY.to_string(), Content::Annotation(annotation));
                }
            }
            class_data.insert(class.class_name.clone(), fields);
        }

        let obj = ObjectData {
            class_desc,
            class_data,
        };
        self.handles.register(handle, Content::Object(obj.clone()));
        Ok(obj)
    }

    /// `TC_EXCEPTION`: reset, read one object body directly (no leading
    /// token byte for the object itself), reset.
    fn read_exception(&mut self) -> Result<Content> {
        self.handles.reset();
        let obj = self.read_new_object_body()?;
        self.handles.reset();
        Ok(Content::Object(obj))
    }

    fn read_new_string(&mut self, long: bool) -> Result<Vec<u8>> {
        let bytes = if long {
            reader::read_long_bytes(&mut self.buf)?
        } else {
            reader::read_short_bytes(&mut self.buf)?
        };
        let handle = self.handles.alloc();
        self.handles.register(handle, Content::String(bytes.clone()));
        Ok(bytes)
    }

    fn read_block_data(&mut self, long: bool) -> Result<Vec<u8>> {
        let len = if long {
            reader::read_u32(&mut self.buf)? as usize
        } else {
            reader::read_u8(&mut self.buf)? as usize
        };
        reader::read_exact(&mut self.buf, len)
    }

    fn read_new_array(&mut self) -> Result<ArrayData> {
        let class_desc = self
            .read_class_desc_slot()?
            .ok_or_else(|| Error::type_mismatch("array class descriptor must not be null"))?;
        let handle = self.handles.alloc();

        let count = reader::read_i32(&mut self.buf)?;
        if count < 0 {
            return Err(Error::InvalidStream);
        }
        let count = count as usize;

        let mut values = Vec::with_capacity(count);
        match element_type_from_class_name(&class_desc.class_name) {
            Some((type_code, _)) => {
                for _ in 0..count {
                    match self.read_value(type_code) {
                        Ok(value) => values.push(value),
                        Err(Error::NotSupported(_)) => values.push(Content::Null),
                        Err(e) => return Err(e),
                    }
                }
            }
            None => values.extend(std::iter::repeat(Content::Null).take(count)),
        }

        let array = ArrayData { class_desc, values };
        self.handles.register(handle, Content::Array(array.clone()));
        Ok(array)
    }

    fn read_new_enum(&mut self) -> Result<EnumData> {
        let class_desc = self
            .read_class_desc_slot()?
            .ok_or_else(|| Error::type_mismatch("enum class descriptor must not be null"))?;
        let handle = self.handles.alloc();

        let constant_name = match self.read_content()? {
            Content::String(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            _ => return Err(Error::type_mismatch("enum constant must be a string")),
        };

        let data = EnumData {
            class_desc,
            constant_name,
        };
        self.handles.register(handle, Content::Enum(data.clone()));
        Ok(data)
    }

    /// Reads one fixed-width value for a primitive type code, or recurses
    /// into a full content slot for object/array codes. `char` is widened
    /// to a 32-bit code point.
    fn read_value(&mut self, type_code: TypeCode) -> Result<Content> {
        use crate::content::Primitive;
        match type_code {
            TypeCode::Byte => Ok(Content::Primitive(Primitive::Byte(reader::read_i8(&mut self.buf)?))),
            TypeCode::Boolean => {
                let b = reader::read_u8(&mut self.buf)?;
                Ok(Content::Primitive(Primitive::Boolean(b != 0)))
            }
            TypeCode::Char => {
                let unit = reader::read_u16(&mut self.buf)?;
                Ok(Content::Primitive(Primitive::Char(unit as u32)))
            }
            TypeCode::Short => Ok(Content::Primitive(Primitive::Short(reader::read_i16(&mut self.buf)?))),
            TypeCode::Int => Ok(Content::Primitive(Primitive::Int(reader::read_i32(&mut self.buf)?))),
            TypeCode::Long => Ok(Content::Primitive(Primitive::Long(reader::read_i64(&mut self.buf)?))),
            TypeCode::Float => Ok(Content::Primitive(Primitive::Float(reader::read_f32(&mut self.buf)?))),
            TypeCode::Double => Ok(Content::Primitive(Primitive::Double(reader::read_f64(&mut self.buf)?))),
            TypeCode::Object | TypeCode::Array => self.read_content(),
        }
    }
}
