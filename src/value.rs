//! The tag value variant type stored in directories.
//!
//! Spec §9 calls for "a single sum type rather than overloaded setters" so
//! that a directory's storage is total and exhaustive; this is that type.
//! All integral formats (signed or unsigned, 8/16/32-bit) widen into a
//! signed 32-bit slot on the way in, per spec §4.2 — so `Int`/`IntArray`
//! cover what the spec's data model separately calls "integer" and "long".

use super::rational::{IRational, URational};

#[derive(Clone, Debug, PartialEq)]
pub enum TagValue {
    /// A single integral value (format codes 1, 3, 4, 6, 8, 9; count == 1).
    Int(i32),
    /// An array of integral values (same format codes; count > 1).
    IntArray(Vec<i32>),
    /// A single unsigned rational (format code 5, count == 1).
    URational(URational),
    /// An array of unsigned rationals (format code 5, count > 1).
    URationalArray(Vec<URational>),
    /// A single signed rational (format code 10, count == 1).
    IRational(IRational),
    /// An array of signed rationals (format code 10, count > 1).
    IRationalArray(Vec<IRational>),
    /// A single IEEE-754 single-precision float (format code 11, count == 1).
    Float(f32),
    /// An array of single-precision floats (format code 11, count > 1).
    FloatArray(Vec<f32>),
    /// A single IEEE-754 double-precision float (format code 12, count == 1).
    Double(f64),
    /// An array of double-precision floats (format code 12, count > 1).
    ///
    /// Decoded with the 4-bytes-per-component stride documented in
    /// `reader::ByteRegion::read_f64_array_quirked` — see spec.md §9.
    DoubleArray(Vec<f64>),
    /// ASCII/NUL-terminated string (format code 2).
    Str(String),
    /// Raw bytes of unspecified internal structure (format code 7, `UNDEFINED`).
    Bytes(Vec<u8>),
}

impl TagValue {
    /// Best-effort widening to `i64`, for callers that just want a number
    /// regardless of which integral variant produced it.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(i64::from(*v)),
            Self::IntArray(v) => v.first().map(|&v| i64::from(v)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}
