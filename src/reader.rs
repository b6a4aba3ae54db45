//! Fixed-width big-endian reads over a generic byte source.
//!
//! The source is anything implementing [`bytes::Buf`]; its `get_*` methods
//! are already big-endian by convention, but they panic on underrun, so
//! every read here checks `remaining()` first and turns a short buffer into
//! [`Error::UnexpectedEof`] before calling the getter.

use bytes::Buf;

use crate::error::{Error, Result};

fn require(buf: &impl Buf, width: usize) -> Result<()> {
    if buf.remaining() < width {
        Err(Error::UnexpectedEof)
    } else {
        Ok(())
    }
}

pub fn read_exact(buf: &mut impl Buf, len: usize) -> Result<Vec<u8>> {
    require(buf, len)?;
    let mut out = vec![0u8; len];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

pub fn read_u8(buf: &mut impl Buf) -> Result<u8> {
    require(buf, 1)?;
    Ok(buf.get_u8())
}

pub fn read_i8(buf: &mut impl Buf) -> Result<i8> {
    require(buf, 1)?;
    Ok(buf.get_i8())
}

pub fn read_u16(buf: &mut impl Buf) -> Result<u16> {
    require(buf, 2)?;
    Ok(buf.get_u16())
}

pub fn read_i16(buf: &mut impl Buf) -> Result<i16> {
    require(buf, 2)?;
    Ok(buf.get_i16())
}

pub fn read_i32(buf: &mut impl Buf) -> Result<i32> {
    require(buf, 4)?;
    Ok(buf.get_i32())
}

pub fn read_u32(buf: &mut impl Buf) -> Result<u32> {
    require(buf, 4)?;
    Ok(buf.get_u32())
}

pub fn read_i64(buf: &mut impl Buf) -> Result<i64> {
    require(buf, 8)?;
    Ok(buf.get_i64())
}

pub fn read_f32(buf: &mut impl Buf) -> Result<f32> {
    require(buf, 4)?;
    Ok(buf.get_f32())
}

pub fn read_f64(buf: &mut impl Buf) -> Result<f64> {
    require(buf, 8)?;
    Ok(buf.get_f64())
}

/// Reads a short-UTF length-prefixed byte run: unsigned-16 length then that
/// many bytes, with no character-set re-encoding.
pub fn read_short_bytes(buf: &mut impl Buf) -> Result<Vec<u8>> {
    let len = read_u16(buf)? as usize;
    read_exact(buf, len)
}

/// Reads a long-UTF length-prefixed byte run: signed-64 length then that
/// many bytes.
pub fn read_long_bytes(buf: &mut impl Buf) -> Result<Vec<u8>> {
    let len = read_i64(buf)?;
    if len < 0 {
        return Err(Error::InvalidStream);
    }
    read_exact(buf, len as usize)
}
