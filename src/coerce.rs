//! The numeric coercion matrix: total functions, one per target numeric
//! type, each either producing a value of that type or signaling
//! "inapplicable" via `None`.
//!
//! Every value this crate's parser can actually produce belongs to one of
//! seven concrete domains, `bool`, `i8`, `i16`, `i32`, `i64`, `f32`, `f64`
//! (the `char` code point is carried as `i32`-compatible data but is never a
//! source or target in this table, matching the original table, which never
//! lists a char row either). The table's `native-int`/`native-uint`/
//! `unsigned-*` *source* rows describe domains this decoder never produces
//! as a [`Content::Primitive`], so they're absent below; the corresponding
//! *target* functions (`isize`, `usize`) are still implemented, accepting
//! whichever reachable sources the table grants their column.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::content::{Content, ObjectData, Primitive};

static BYTE_TO_UNSIGNED_COERCION: AtomicBool = AtomicBool::new(true);

/// Enables unconditional signed-8 → unsigned-8 coercion (the default): the
/// two's-complement bit pattern is reinterpreted, so `-1 → 255`.
pub fn enable_byte_to_unsigned_coercion() {
    BYTE_TO_UNSIGNED_COERCION.store(true, Ordering::Relaxed);
}

/// Restricts signed-8 → unsigned-8 coercion to non-negative inputs.
pub fn disable_byte_to_unsigned_coercion() {
    BYTE_TO_UNSIGNED_COERCION.store(false, Ordering::Relaxed);
}

pub fn byte_to_unsigned_coercion_enabled() -> bool {
    BYTE_TO_UNSIGNED_COERCION.load(Ordering::Relaxed)
}

const WRAPPER_CLASSES: &[&str] = &[
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
];

/// The unwrap rule: recurses through a boxed-wrapper `Object`'s `value`
/// field until it reaches a non-wrapper content node.
fn unwrap(content: &Content) -> &Content {
    let mut cur = content;
    loop {
        match cur {
            Content::Object(obj) if is_wrapper(obj) => match obj.get(obj.class_name(), "value") {
                Ok(inner) => cur = inner,
                Err(_) => return cur,
            },
            _ => return cur,
        }
    }
}

fn is_wrapper(obj: &ObjectData) -> bool {
    WRAPPER_CLASSES.contains(&obj.class_name())
}

macro_rules! primitive {
    ($content:expr, $variant:ident) => {
        match unwrap($content) {
            Content::Primitive(Primitive::$variant(v)) => Some(*v),
            _ => None,
        }
    };
}

pub fn to_bool(content: &Content) -> Option<bool> {
    primitive!(content, Boolean)
}

pub fn to_i8(content: &Content) -> Option<i8> {
    primitive!(content, Byte)
}

pub fn to_i16(content: &Content) -> Option<i16> {
    match unwrap(content) {
        Content::Primitive(Primitive::Short(v)) => Some(*v),
        Content::Primitive(Primitive::Byte(v)) => Some(*v as i16),
        _ => None,
    }
}

pub fn to_i32(content: &Content) -> Option<i32> {
    match unwrap(content) {
        Content::Primitive(Primitive::Int(v)) => Some(*v),
        Content::Primitive(Primitive::Short(v)) => Some(*v as i32),
        Content::Primitive(Primitive::Byte(v)) => Some(*v as i32),
        _ => None,
    }
}

pub fn to_i64(content: &Content) -> Option<i64> {
    match unwrap(content) {
        Content::Primitive(Primitive::Long(v)) => Some(*v),
        Content::Primitive(Primitive::Int(v)) => Some(*v as i64),
        Content::Primitive(Primitive::Short(v)) => Some(*v as i64),
        Content::Primitive(Primitive::Byte(v)) => Some(*v as i64),
        _ => None,
    }
}

pub fn to_isize(content: &Content) -> Option<isize> {
    match unwrap(content) {
        Content::Primitive(Primitive::Int(v)) => Some(*v as isize),
        Content::Primitive(Primitive::Short(v)) => Some(*v as isize),
        Content::Primitive(Primitive::Byte(v)) => Some(*v as isize),
        _ => None,
    }
}

pub fn to_u8(content: &Content) -> Option<u8> {
    match unwrap(content) {
        Content::Primitive(Primitive::Byte(v)) => {
            if byte_to_unsigned_coercion_enabled() || *v >= 0 {
                Some(*v as u8)
            } else {
                None
            }
        }
        _ => None,
    }
}

pub fn to_u16(content: &Content) -> Option<u16> {
    match unwrap(content) {
        Content::Primitive(Primitive::Short(v)) if *v >= 0 => Some(*v as u16),
        Content::Primitive(Primitive::Byte(v)) if *v >= 0 => Some(*v as u16),
        _ => None,
    }
}

pub fn to_u32(content: &Content) -> Option<u32> {
    match unwrap(content) {
        Content::Primitive(Primitive::Int(v)) if *v >= 0 => Some(*v as u32),
        Content::Primitive(Primitive::Short(v)) if *v >= 0 => Some(*v as u32),
        Content::Primitive(Primitive::Byte(v)) if *v >= 0 => Some(*v as u32),
        _ => None,
    }
}

pub fn to_u64(content: &Content) -> Option<u64> {
    match unwrap(content) {
        Content::Primitive(Primitive::Long(v)) if *v >= 0 => Some(*v as u64),
        Content::Primitive(Primitive::Int(v)) if *v >= 0 => Some(*v as u64),
        Content::Primitive(Primitive::Short(v)) if *v >= 0 => Some(*v as u64),
        Content::Primitive(Primitive::Byte(v)) if *v >= 0 => Some(*v as u64),
        _ => None,
    }
}

pub fn to_usize(content: &Content) -> Option<usize> {
    match unwrap(content) {
        Content::Primitive(Primitive::Int(v)) if *v >= 0 => Some(*v as usize),
        Content::Primitive(Primitive::Short(v)) if *v >= 0 => Some(*v as usize),
        Content::Primitive(Primitive::Byte(v)) if *v >= 0 => Some(*v as usize),
        _ => None,
    }
}

pub fn to_f32(content: &Content) -> Option<f32> {
    primitive!(content, Float)
}

pub fn to_f64(content: &Content) -> Option<f64> {
    match unwrap(content) {
        Content::Primitive(Primitive::Double(v)) => Some(*v),
        Content::Primitive(Primitive::Float(v)) => Some(*v as f64),
        _ => None,
    }
}
