//! Random-access byte reader over a fixed-size, immutable byte region.
//!
//! Every typed read is bounds-checked against the region length; reads never
//! panic and never read outside `[0, len)`. This is the lowest layer of the
//! walker (spec component 1 of 6) — it knows nothing about TIFF, IFDs, or
//! tags, only about interpreting bytes at an offset under a chosen
//! endianness.

use super::rational::{IRational, URational};
use std::convert::TryInto;

/// Geometry failure: the requested read does not fit inside the region.
/// Content is never the cause of this error — only offset and width are.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutOfBounds;

pub type ReadResult<T> = Result<T, OutOfBounds>;

/// A byte region of known length, addressable by absolute offset, with a
/// single mutable "big-endian?" flag. The flag is scoped per parse but the
/// makernote dispatcher may temporarily override it for a subtree (see
/// `crate::makernote`), snapshotting and restoring it around the override.
pub struct ByteRegion<'a> {
    bytes: &'a [u8],
    big_endian: bool,
}

impl<'a> ByteRegion<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, big_endian: true }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn big_endian(&self) -> bool {
        self.big_endian
    }

    pub fn set_big_endian(&mut self, big_endian: bool) {
        self.big_endian = big_endian;
    }

    /// Offsets throughout the walker are computed with signed 32-bit
    /// arithmetic (per the TIFF spec) and can come out negative on malformed
    /// input; this checks both that and the upper bound in one place.
    fn check(&self, offset: i64, width: usize) -> ReadResult<usize> {
        if offset < 0 {
            return Err(OutOfBounds);
        }
        let offset = offset as usize;
        let end = offset.checked_add(width).ok_or(OutOfBounds)?;
        if end > self.bytes.len() {
            return Err(OutOfBounds);
        }
        Ok(offset)
    }

    fn slice(&self, offset: i64, width: usize) -> ReadResult<&'a [u8]> {
        let offset = self.check(offset, width)?;
        Ok(&self.bytes[offset..offset + width])
    }

    pub fn raw_bytes(&self, offset: i64, len: usize) -> ReadResult<&'a [u8]> {
        self.slice(offset, len)
    }

    pub fn read_u8(&self, offset: i64) -> ReadResult<u8> {
        Ok(self.slice(offset, 1)?[0])
    }

    pub fn read_i8(&self, offset: i64) -> ReadResult<i8> {
        Ok(self.slice(offset, 1)?[0] as i8)
    }

    pub fn read_u16(&self, offset: i64) -> ReadResult<u16> {
        let b: [u8; 2] = self.slice(offset, 2)?.try_into().unwrap();
        Ok(if self.big_endian { u16::from_be_bytes(b) } else { u16::from_le_bytes(b) })
    }

    pub fn read_i16(&self, offset: i64) -> ReadResult<i16> {
        let b: [u8; 2] = self.slice(offset, 2)?.try_into().unwrap();
        Ok(if self.big_endian { i16::from_be_bytes(b) } else { i16::from_le_bytes(b) })
    }

    pub fn read_u32(&self, offset: i64) -> ReadResult<u32> {
        let b: [u8; 4] = self.slice(offset, 4)?.try_into().unwrap();
        Ok(if self.big_endian { u32::from_be_bytes(b) } else { u32::from_le_bytes(b) })
    }

    pub fn read_i32(&self, offset: i64) -> ReadResult<i32> {
        let b: [u8; 4] = self.slice(offset, 4)?.try_into().unwrap();
        Ok(if self.big_endian { i32::from_be_bytes(b) } else { i32::from_le_bytes(b) })
    }

    pub fn read_f32(&self, offset: i64) -> ReadResult<f32> {
        let b: [u8; 4] = self.slice(offset, 4)?.try_into().unwrap();
        Ok(if self.big_endian { f32::from_be_bytes(b) } else { f32::from_le_bytes(b) })
    }

    pub fn read_f64(&self, offset: i64) -> ReadResult<f64> {
        let b: [u8; 8] = self.slice(offset, 8)?.try_into().unwrap();
        Ok(if self.big_endian { f64::from_be_bytes(b) } else { f64::from_le_bytes(b) })
    }

    pub fn read_urational(&self, offset: i64) -> ReadResult<URational> {
        let numerator = self.read_u32(offset)?;
        let denominator = self.read_u32(offset + 4)?;
        Ok(URational { numerator, denominator })
    }

    pub fn read_irational(&self, offset: i64) -> ReadResult<IRational> {
        let numerator = self.read_i32(offset)?;
        let denominator = self.read_i32(offset + 4)?;
        Ok(IRational { numerator, denominator })
    }

    /// Exactly `len` bytes, interpreted as ASCII/ISO-8859-1 with lossy UTF-8
    /// conversion (the spec only promises 7-bit ASCII; lossy conversion is a
    /// cheap superset for the unicode-adjacent strings some vendors emit).
    pub fn read_fixed_string(&self, offset: i64, len: usize) -> ReadResult<String> {
        let raw = self.slice(offset, len)?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    /// Up to `max_len` bytes, stopping at the first NUL byte (exclusive).
    pub fn read_nul_terminated_string(&self, offset: i64, max_len: usize) -> ReadResult<String> {
        let raw = self.slice(offset, max_len)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    fn elements<T>(&self, offset: i64, size: usize, count: usize, convert: impl Fn(&[u8]) -> T) -> ReadResult<Vec<T>> {
        let byte_len = size.checked_mul(count).ok_or(OutOfBounds)?;
        let raw = self.slice(offset, byte_len)?;
        Ok(raw.chunks_exact(size).map(convert).collect())
    }

    pub fn read_u8_array(&self, offset: i64, count: usize) -> ReadResult<Vec<u8>> {
        Ok(self.slice(offset, count)?.to_vec())
    }

    pub fn read_i8_array(&self, offset: i64, count: usize) -> ReadResult<Vec<i8>> {
        Ok(self.slice(offset, count)?.iter().map(|&b| b as i8).collect())
    }

    pub fn read_u16_array(&self, offset: i64, count: usize) -> ReadResult<Vec<u16>> {
        let be = self.big_endian;
        self.elements(offset, 2, count, move |c| {
            let b: [u8; 2] = c.try_into().unwrap();
            if be { u16::from_be_bytes(b) } else { u16::from_le_bytes(b) }
        })
    }

    pub fn read_i16_array(&self, offset: i64, count: usize) -> ReadResult<Vec<i16>> {
        let be = self.big_endian;
        self.elements(offset, 2, count, move |c| {
            let b: [u8; 2] = c.try_into().unwrap();
            if be { i16::from_be_bytes(b) } else { i16::from_le_bytes(b) }
        })
    }

    pub fn read_u32_array(&self, offset: i64, count: usize) -> ReadResult<Vec<u32>> {
        let be = self.big_endian;
        self.elements(offset, 4, count, move |c| {
            let b: [u8; 4] = c.try_into().unwrap();
            if be { u32::from_be_bytes(b) } else { u32::from_le_bytes(b) }
        })
    }

    pub fn read_i32_array(&self, offset: i64, count: usize) -> ReadResult<Vec<i32>> {
        let be = self.big_endian;
        self.elements(offset, 4, count, move |c| {
            let b: [u8; 4] = c.try_into().unwrap();
            if be { i32::from_be_bytes(b) } else { i32::from_le_bytes(b) }
        })
    }

    pub fn read_f32_array(&self, offset: i64, count: usize) -> ReadResult<Vec<f32>> {
        let be = self.big_endian;
        self.elements(offset, 4, count, move |c| {
            let b: [u8; 4] = c.try_into().unwrap();
            if be { f32::from_be_bytes(b) } else { f32::from_le_bytes(b) }
        })
    }

    /// Observed behavior (spec.md §9 Open Questions, flagged suspect): the
    /// array reader advances by 4 bytes per component, not 8, matching the
    /// original tool's `DOUBLE` array handling. Kept intentionally; do not
    /// "fix" this without also fixing the scalar/array stride mismatch it
    /// would create relative to `bytesPerFormat[12] == 8`.
    pub fn read_f64_array_quirked(&self, offset: i64, count: usize) -> ReadResult<Vec<f64>> {
        let be = self.big_endian;
        self.elements(offset, 4, count, move |c| {
            let mut b = [0u8; 8];
            b[..4].copy_from_slice(c);
            if be { f64::from_be_bytes(b) } else { f64::from_le_bytes(b) }
        })
    }

    pub fn read_urational_array(&self, offset: i64, count: usize) -> ReadResult<Vec<URational>> {
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            out.push(self.read_urational(offset + (i as i64) * 8)?);
        }
        Ok(out)
    }

    pub fn read_irational_array(&self, offset: i64, count: usize) -> ReadResult<Vec<IRational>> {
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            out.push(self.read_irational(offset + (i as i64) * 8)?);
        }
        Ok(out)
    }
}
