//! The projection engine: walks a content tree into a caller-declared
//! target shape, driven by field tags.

use std::sync::RwLock;

use crate::coerce;
use crate::content::{Content, ObjectData, Primitive};
use crate::error::{Error, Result};
use crate::tag as tagmod;

static PACKAGE_PREFIXES: RwLock<Vec<String>> = RwLock::new(Vec::new());

/// Replaces the process-wide package-prefix list used to infer untagged
/// members' qualifying class names.
pub fn set_package_prefixes(prefixes: Vec<String>) {
    *PACKAGE_PREFIXES.write().unwrap() = prefixes;
}

/// Appends one prefix to the process-wide list.
pub fn add_package_prefix(prefix: impl Into<String>) {
    PACKAGE_PREFIXES.write().unwrap().push(prefix.into());
}

fn package_prefixes_snapshot() -> Vec<String> {
    PACKAGE_PREFIXES.read().unwrap().clone()
}

/// A target shape that can be filled in from a content node.
///
/// Numeric, string, array, sequence, and pointer kinds implement this
/// directly below; `#[derive(Project)]` generates an implementation for a
/// caller's composite type, one field at a time, via [`project_member`].
pub trait Project {
    fn project(&mut self, content: &Content) -> Result<()>;
}

fn source_kind_name(content: &Content) -> &'static str {
    match content {
        Content::Null => "null",
        Content::Primitive(Primitive::Boolean(_)) => "boolean",
        Content::Primitive(Primitive::Byte(_)) => "signed-8",
        Content::Primitive(Primitive::Short(_)) => "signed-16",
        Content::Primitive(Primitive::Int(_)) => "signed-32",
        Content::Primitive(Primitive::Long(_)) => "signed-64",
        Content::Primitive(Primitive::Char(_)) => "char",
        Content::Primitive(Primitive::Float(_)) => "32-bit float",
        Content::Primitive(Primitive::Double(_)) => "64-bit float",
        Content::String(_) => "string",
        Content::Array(_) => "array",
        Content::Object(_) => "object",
        Content::Enum(_) => "enum",
        Content::BlockData(_) => "block-data",
        Content::ClassDesc(_) => "class-descriptor",
        Content::Class(_) => "class",
        Content::Annotation(_) => "annotation",
    }
}

macro_rules! impl_project_numeric {
    ($ty:ty, $target_kind:literal, $coerce:path) => {
        impl Project for $ty {
            fn project(&mut self, content: &Content) -> Result<()> {
                match $coerce(content) {
                    Some(v) => {
                        *self = v;
                        Ok(())
                    }
                    None => Err(Error::type_mismatch(format!(
                        "cannot cast {} to {}",
                        source_kind_name(content),
                        $target_kind
                    ))),
                }
            }
        }
    };
}

impl_project_numeric!(bool, "boolean", coerce::to_bool);
impl_project_numeric!(i8, "signed-8", coerce::to_i8);
impl_project_numeric!(i16, "signed-16", coerce::to_i16);
impl_project_numeric!(i32, "signed-32", coerce::to_i32);
impl_project_numeric!(i64, "signed-64", coerce::to_i64);
impl_project_numeric!(isize, "native-int", coerce::to_isize);
impl_project_numeric!(u8, "unsigned-8", coerce::to_u8);
impl_project_numeric!(u16, "unsigned-16", coerce::to_u16);
impl_project_numeric!(u32, "unsigned-32", coerce::to_u32);
impl_project_numeric!(u64, "unsigned-64", coerce::to_u64);
impl_project_numeric!(usize, "native-uint", coerce::to_usize);
impl_project_numeric!(f32, "32-bit float", coerce::to_f32);
impl_project_numeric!(f64, "64-bit float", coerce::to_f64);

impl Project for String {
    fn project(&mut self, content: &Content) -> Result<()> {
        match content {
            Content::String(bytes) => {
                *self = String::from_utf8_lossy(bytes).into_owned();
                Ok(())
            }
            _ => Err(Error::type_mismatch(format!(
                "cannot cast {} to string",
                source_kind_name(content)
            ))),
        }
    }
}

impl<T: Project + Default> Project for Vec<T> {
    fn project(&mut self, content: &Content) -> Result<()> {
        let array = content.as_array().ok_or_else(|| {
            Error::type_mismatch(format!("cannot cast {} to sequence", source_kind_name(content)))
        })?;
        self.clear();
        for value in &array.values {
            let mut element = T::default();
            element.project(value)?;
            self.push(element);
        }
        Ok(())
    }
}

impl<T: Project + Default + Copy, const N: usize> Project for [T; N] {
    fn project(&mut self, content: &Content) -> Result<()> {
        let array = content.as_array().ok_or_else(|| {
            Error::type_mismatch(format!("cannot cast {} to array", source_kind_name(content)))
        })?;
        if array.len() != N {
            return Err(Error::ArraySizeMismatch {
                expected: N,
                actual: array.len(),
            });
        }
        for (i, value) in array.values.iter().enumerate() {
            let mut element = T::default();
            element.project(value)?;
            self[i] = element;
        }
        Ok(())
    }
}

impl<T: Project> Project for Box<T> {
    fn project(&mut self, content: &Content) -> Result<()> {
        self.as_mut().project(content)
    }
}

/// Narrows `content` to the `Object` a composite's `#[derive(Project)]`
/// implementation projects its fields out of.
///
/// Generated code calls this once per struct, before any [`project_member`]
/// call, since the error construction it needs (`TypeMismatch`) is not
/// constructible outside this crate.
pub fn object_for_projection<'a>(content: &'a Content, target_kind: &str) -> Result<&'a ObjectData> {
    content.as_object().ok_or_else(|| {
        Error::type_mismatch(format!(
            "cannot cast {} to {target_kind}",
            source_kind_name(content)
        ))
    })
}

/// Projects one tagged composite member: resolves the qualifier (explicit,
/// or inferred from `package_path`/`simple_name`), looks the field up in
/// `obj`'s class-data, and recurses into `target`.
///
/// Generated by `#[derive(Project)]`, one call per non-skipped field.
pub fn project_member<T: Project>(
    obj: &ObjectData,
    tag: &str,
    package_path: &str,
    simple_name: &str,
    target: &mut T,
) -> Result<()> {
    if tag.is_empty() {
        return Err(Error::ClassNameUnresolved);
    }
    let parsed = tagmod::parse(tag);
    let value = match parsed.qualifier {
        Some(qualifier) => obj.get(qualifier, parsed.field)?,
        None => {
            let qualifier =
                tagmod::infer_qualifier(package_path, simple_name, &package_prefixes_snapshot());
            obj.get(&qualifier, parsed.field)?
        }
    };
    target.project(value)
}
