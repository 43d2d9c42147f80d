//! Tag value decoder (spec component 3 of 6, `processTag`).
//!
//! Given a directory, a tag id, a value offset, a component count, and a
//! format code, reads the correct number of bytes in the correct type and
//! stores a scalar or array `TagValue` into the directory. Any out-of-bounds
//! read aborts only this tag: an error string is recorded and decoding of
//! the enclosing IFD continues with the next entry.

use super::directory::Directory;
use super::reader::ByteRegion;
use super::value::TagValue;

/// Per-component byte width for format codes 1..12. Index 0 is the
/// reserved/invalid slot and is never read.
pub const BYTES_PER_FORMAT: [u32; 13] = [0, 1, 1, 2, 4, 8, 1, 1, 2, 4, 8, 4, 8];

#[must_use]
pub fn bytes_per_format(format_code: u16) -> Option<u32> {
    if (1..=12).contains(&format_code) {
        Some(BYTES_PER_FORMAT[format_code as usize])
    } else {
        None
    }
}

pub fn process_tag(
    dir: &mut Directory,
    tag_id: u16,
    value_offset: i64,
    component_count: i64,
    format_code: u16,
    reader: &ByteRegion,
) {
    let count = component_count.max(0) as usize;
    tracing::trace!(tag_id, value_offset, component_count, format_code, "decoding tag");

    macro_rules! fail {
        ($what:expr) => {{
            dir.add_error(format!("Unable to read {} for tag {tag_id:#06x}", $what));
            return;
        }};
    }

    match format_code {
        // UBYTE
        1 => {
            if count == 1 {
                match reader.read_u8(value_offset) {
                    Ok(v) => dir.set(tag_id, TagValue::Int(i32::from(v))),
                    Err(_) => fail!("UBYTE value"),
                }
            } else {
                match reader.read_u8_array(value_offset, count) {
                    Ok(v) => dir.set(tag_id, TagValue::IntArray(v.into_iter().map(i32::from).collect())),
                    Err(_) => fail!("UBYTE array"),
                }
            }
        }
        // ASCII
        2 => match reader.read_nul_terminated_string(value_offset, count) {
            Ok(s) => dir.set(tag_id, TagValue::Str(s)),
            Err(_) => fail!("ASCII string"),
        },
        // USHORT
        3 => {
            if count == 1 {
                match reader.read_u16(value_offset) {
                    Ok(v) => dir.set(tag_id, TagValue::Int(i32::from(v))),
                    Err(_) => fail!("USHORT value"),
                }
            } else {
                match reader.read_u16_array(value_offset, count) {
                    Ok(v) => dir.set(tag_id, TagValue::IntArray(v.into_iter().map(i32::from).collect())),
                    Err(_) => fail!("USHORT array"),
                }
            }
        }
        // ULONG
        4 => {
            if count == 1 {
                match reader.read_u32(value_offset) {
                    Ok(v) => dir.set(tag_id, TagValue::Int(v as i32)),
                    Err(_) => fail!("ULONG value"),
                }
            } else {
                match reader.read_u32_array(value_offset, count) {
                    Ok(v) => dir.set(tag_id, TagValue::IntArray(v.into_iter().map(|v| v as i32).collect())),
                    Err(_) => fail!("ULONG array"),
                }
            }
        }
        // URATIONAL
        5 => {
            if count == 1 {
                match reader.read_urational(value_offset) {
                    Ok(v) => dir.set(tag_id, TagValue::URational(v)),
                    Err(_) => fail!("URATIONAL value"),
                }
            } else {
                match reader.read_urational_array(value_offset, count) {
                    Ok(v) => dir.set(tag_id, TagValue::URationalArray(v)),
                    Err(_) => fail!("URATIONAL array"),
                }
            }
        }
        // SBYTE
        6 => {
            if count == 1 {
                match reader.read_i8(value_offset) {
                    Ok(v) => dir.set(tag_id, TagValue::Int(i32::from(v))),
                    Err(_) => fail!("SBYTE value"),
                }
            } else {
                match reader.read_i8_array(value_offset, count) {
                    Ok(v) => dir.set(tag_id, TagValue::IntArray(v.into_iter().map(i32::from).collect())),
                    Err(_) => fail!("SBYTE array"),
                }
            }
        }
        // UNDEFINED: raw bytes, regardless of count
        7 => match reader.raw_bytes(value_offset, count) {
            Ok(b) => dir.set(tag_id, TagValue::Bytes(b.to_vec())),
            Err(_) => fail!("UNDEFINED bytes"),
        },
        // SSHORT
        8 => {
            if count == 1 {
                match reader.read_i16(value_offset) {
                    Ok(v) => dir.set(tag_id, TagValue::Int(i32::from(v))),
                    Err(_) => fail!("SSHORT value"),
                }
            } else {
                match reader.read_i16_array(value_offset, count) {
                    Ok(v) => dir.set(tag_id, TagValue::IntArray(v.into_iter().map(i32::from).collect())),
                    Err(_) => fail!("SSHORT array"),
                }
            }
        }
        // SLONG
        9 => {
            if count == 1 {
                match reader.read_i32(value_offset) {
                    Ok(v) => dir.set(tag_id, TagValue::Int(v)),
                    Err(_) => fail!("SLONG value"),
                }
            } else {
                match reader.read_i32_array(value_offset, count) {
                    Ok(v) => dir.set(tag_id, TagValue::IntArray(v)),
                    Err(_) => fail!("SLONG array"),
                }
            }
        }
        // SRATIONAL
        10 => {
            if count == 1 {
                match reader.read_irational(value_offset) {
                    Ok(v) => dir.set(tag_id, TagValue::IRational(v)),
                    Err(_) => fail!("SRATIONAL value"),
                }
            } else {
                match reader.read_irational_array(value_offset, count) {
                    Ok(v) => dir.set(tag_id, TagValue::IRationalArray(v)),
                    Err(_) => fail!("SRATIONAL array"),
                }
            }
        }
        // SINGLE (f32)
        11 => {
            if count == 1 {
                match reader.read_f32(value_offset) {
                    Ok(v) => dir.set(tag_id, TagValue::Float(v)),
                    Err(_) => fail!("SINGLE value"),
                }
            } else {
                match reader.read_f32_array(value_offset, count) {
                    Ok(v) => dir.set(tag_id, TagValue::FloatArray(v)),
                    Err(_) => fail!("SINGLE array"),
                }
            }
        }
        // DOUBLE (f64). Array path uses the 4-byte-per-component quirk
        // documented in `reader::ByteRegion::read_f64_array_quirked`.
        12 => {
            if count == 1 {
                match reader.read_f64(value_offset) {
                    Ok(v) => dir.set(tag_id, TagValue::Double(v)),
                    Err(_) => fail!("DOUBLE value"),
                }
            } else {
                match reader.read_f64_array_quirked(value_offset, count) {
                    Ok(v) => dir.set(tag_id, TagValue::DoubleArray(v)),
                    Err(_) => fail!("DOUBLE array"),
                }
            }
        }
        other => {
            dir.add_error(format!("Unknown format code: {other}"));
        }
    }
}
