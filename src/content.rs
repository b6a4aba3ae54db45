//! The neutral content tree produced by a decode, and its read-only queries.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::token::{sc, TypeCode};

/// Any node the parser can produce, or the stream's null-reference marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Null,
    ClassDesc(Rc<ClassDescriptor>),
    /// A `TC_CLASS` wrapper around a class descriptor, carrying its own
    /// handle distinct from the descriptor's. May wrap a null descriptor.
    Class(Option<Rc<ClassDescriptor>>),
    Object(ObjectData),
    Array(ArrayData),
    Enum(EnumData),
    String(Vec<u8>),
    BlockData(Vec<u8>),
    Primitive(Primitive),
    /// An ordered run of content values stored as a single field/annotation
    /// entry, the Rust stand-in for the source's habit of storing a plain
    /// list as an opaque value (object annotations, class annotations).
    Annotation(Vec<Content>),
}

impl Content {
    pub fn as_object(&self) -> Option<&ObjectData> {
        match self {
            Content::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayData> {
        match self {
            Content::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Content::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_class_desc(&self) -> Option<&Rc<ClassDescriptor>> {
        match self {
            Content::ClassDesc(c) => Some(c),
            Content::Class(Some(c)) => Some(c),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Content::Null)
    }
}

/// One boxed primitive value, carried at the width the type code implies.
///
/// `Char` is widened to a full code point: a BMP code unit is stored as-is,
/// and a surrogate half is preserved as its raw unit rather than combined
/// with its pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Boolean(bool),
    Byte(i8),
    Char(u32),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

/// Stream-level metadata for a class: name, serial-version-UID, flags,
/// declared fields, optional annotation, and super-descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    pub class_name: String,
    pub serial_version_uid: i64,
    pub flags: u8,
    pub fields: Vec<FieldDesc>,
    pub class_annotation: Vec<Content>,
    pub super_desc: Option<Rc<ClassDescriptor>>,
}

impl ClassDescriptor {
    pub fn is_write_method(&self) -> bool {
        self.flags & sc::WRITE_METHOD != 0
    }

    pub fn is_serializable(&self) -> bool {
        self.flags & sc::SERIALIZABLE != 0
    }

    pub fn is_externalizable(&self) -> bool {
        self.flags & sc::EXTERNALIZABLE != 0
    }

    pub fn is_block_data(&self) -> bool {
        self.flags & sc::BLOCK_DATA != 0
    }

    pub fn is_enum(&self) -> bool {
        self.flags & sc::ENUM != 0
    }

    /// Whether a class's flags imply an annotation sequence follows its
    /// fixed-field payload in every object instance.
    pub fn carries_annotation(&self) -> bool {
        self.is_serializable() && self.is_write_method()
    }

    /// The descriptor chain from this class up through its ancestors,
    /// starting with `self`.
    pub fn chain(&self) -> Vec<&ClassDescriptor> {
        let mut out = vec![self];
        let mut cur = self.super_desc.as_deref();
        while let Some(c) = cur {
            out.push(c);
            cur = c.super_desc.as_deref();
        }
        out
    }

    /// The order class-data is read and stored in, root super-class down
    /// to the concrete class.
    pub fn chain_root_to_concrete(&self) -> Vec<&ClassDescriptor> {
        let mut chain = self.chain();
        chain.reverse();
        chain
    }
}

/// A field declared by a class descriptor. `class_name` is the qualifying
/// class name and is only present when `type_code` is object or array.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDesc {
    pub type_code: TypeCode,
    pub name: String,
    pub class_name: Option<String>,
}

/// Per-class field values for one object, keyed first by the declaring
/// class's name (one entry per class on the inheritance chain) and then by
/// field name. Annotation content, when present, sits under the sentinel
/// key `[object annotation]`.
pub const ANNOTATION_KEY: &str = "[object annotation]";

pub type ClassData = HashMap<String, HashMap<String, Content>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectData {
    pub class_desc: Rc<ClassDescriptor>,
    pub class_data: ClassData,
}

impl ObjectData {
    pub fn class_name(&self) -> &str {
        &self.class_desc.class_name
    }

    /// Looks up `"qualifying-class.field-name"`, splitting on the *last*
    /// dot so a dotted package-qualified class name still resolves.
    pub fn get_field(&self, path: &str) -> Result<&Content> {
        let (class_name, field_name) = split_field_path(path)?;
        self.get(class_name, field_name)
    }

    pub fn get(&self, class_name: &str, field_name: &str) -> Result<&Content> {
        let fields = self
            .class_data
            .get(class_name)
            .ok_or_else(|| Error::NoSuchClass(class_name.to_string()))?;
        fields
            .get(field_name)
            .ok_or_else(|| Error::NoSuchField(field_name.to_string()))
    }
}

fn split_field_path(path: &str) -> Result<(&str, &str)> {
    match path.rfind('.') {
        Some(idx) => Ok((&path[..idx], &path[idx + 1..])),
        None => Err(Error::NoSuchField(path.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayData {
    pub class_desc: Rc<ClassDescriptor>,
    pub values: Vec<Content>,
}

impl ArrayData {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Content> {
        self.values.get(index)
    }

    /// The element type code is the second byte of the class name (`[X`);
    /// for `[L` the remainder up to the trailing `;` names the element
    /// class.
    pub fn element_type(&self) -> Option<(TypeCode, Option<String>)> {
        element_type_from_class_name(&self.class_desc.class_name)
    }
}

/// Factored out of [`ArrayData::element_type`] so the parser can derive an
/// array's element type before it has an `ArrayData` to call a method on.
pub fn element_type_from_class_name(class_name: &str) -> Option<(TypeCode, Option<String>)> {
    let name = class_name.as_bytes();
    if name.len() < 2 || name[0] != b'[' {
        return None;
    }
    let code = TypeCode::from_byte(name[1])?;
    let qualifier = if code == TypeCode::Object {
        let rest = &class_name[2..];
        Some(rest.strip_suffix(';').unwrap_or(rest).to_string())
    } else {
        None
    };
    Some((code, qualifier))
}

/// A monotonically-assigned identifier used by the stream to back-reference
/// a previously-serialized class, class-descriptor, object, array, string,
/// or enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u32);

/// A `TC_ENUM` instance: the enum class and the matched constant's name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumData {
    pub class_desc: Rc<ClassDescriptor>,
    pub constant_name: String,
}

#[cfg(test)]
mod test {
    use super::*;

    fn byte_array_desc() -> Rc<ClassDescriptor> {
        Rc::new(ClassDescriptor {
            class_name: "[B".to_string(),
            serial_version_uid: 0,
            flags: sc::SERIALIZABLE,
            fields: vec![],
            class_annotation: vec![],
            super_desc: None,
        })
    }

    #[test]
    fn array_element_type_from_class_name() {
        let array = ArrayData {
            class_desc: byte_array_desc(),
            values: vec![],
        };
        assert_eq!(array.element_type(), Some((TypeCode::Byte, None)));
    }

    #[test]
    fn object_array_element_type_strips_brackets_and_semicolon() {
        let desc = Rc::new(ClassDescriptor {
            class_name: "[Lcom.example.Foo;".to_string(),
            serial_version_uid: 0,
            flags: sc::SERIALIZABLE,
            fields: vec![],
            class_annotation: vec![],
            super_desc: None,
        });
        let array = ArrayData {
            class_desc: desc,
            values: vec![],
        };
        assert_eq!(
            array.element_type(),
            Some((TypeCode::Object, Some("com.example.Foo".to_string())))
        );
    }

    #[test]
    fn field_path_splits_on_last_dot() {
        let mut class_data: ClassData = HashMap::new();
        let mut fields = HashMap::new();
        fields.insert("value".to_string(), Content::Primitive(Primitive::Int(1)));
        class_data.insert("com.example.Foo".to_string(), fields);

        let obj = ObjectData {
            class_desc: Rc::new(ClassDescriptor {
                class_name: "com.example.Foo".to_string(),
                serial_version_uid: 0,
                flags: sc::SERIALIZABLE,
                fields: vec![],
                class_annotation: vec![],
                super_desc: None,
            }),
            class_data,
        };

        assert_eq!(
            obj.get_field("com.example.Foo.value").unwrap(),
            &Content::Primitive(Primitive::Int(1))
        );
        assert!(matches!(
            obj.get_field("com.example.Bar.value"),
            Err(Error::NoSuchClass(_))
        ));
    }
}
