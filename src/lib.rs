#![doc = include_str!("../README.md")]

// Re-export the bytes crate for use within derived code.
pub use bytes;

mod coerce;
mod content;
mod error;
mod handle;
mod parser;
mod project;
mod reader;
mod tag;

/// Stream constants and the single-byte token/type-code vocabularies.
///
/// Exposed mainly for tests and other tooling that builds or inspects raw
/// JOSSP bytes directly; ordinary callers only need [`Decoder`].
pub mod token;

pub use crate::coerce::{
    byte_to_unsigned_coercion_enabled, disable_byte_to_unsigned_coercion,
    enable_byte_to_unsigned_coercion,
};
pub use crate::content::{
    element_type_from_class_name, ArrayData, ClassData, ClassDescriptor, Content, EnumData,
    FieldDesc, Handle, ObjectData, Primitive, ANNOTATION_KEY,
};
pub use crate::error::{Error, Result};
pub use crate::parser::Decoder;
pub use crate::project::{
    add_package_prefix, object_for_projection, project_member, set_package_prefixes, Project,
};
pub use crate::tag::{infer_qualifier, Tag};
pub use crate::token::{sc, TypeCode, BASE_HANDLE, STREAM_MAGIC, STREAM_VERSION};

// Re-export #[derive(Project)].
// Based on prost's equivalent re-export of prost-derive, enabled by default.
#[cfg(feature = "derive")]
#[allow(unused_imports)]
#[macro_use]
extern crate jossp_derive;
#[cfg(feature = "derive")]
#[doc(hidden)]
pub use jossp_derive::*;
