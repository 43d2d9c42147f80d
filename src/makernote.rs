//! Makernote dispatcher (spec component 5 of 6): pattern-matches a leading
//! byte signature and/or the camera `Make` tag, configures an offset base,
//! optional endianness override, and a target directory kind, then
//! re-enters the IFD walker (or, for Kodak, a fixed-offset record reader).

use super::directory::DirectoryKind;
use super::metadata::MetadataStore;
use super::reader::ByteRegion;
use super::tags;
use super::walker::{self, VisitedOffsets};

fn sig(reader: &ByteRegion, anchor: i64, len: usize) -> Option<Vec<u8>> {
    reader.raw_bytes(anchor, len).ok().map(<[u8]>::to_vec)
}

fn sig_is(reader: &ByteRegion, anchor: i64, expected: &[u8]) -> bool {
    sig(reader, anchor, expected.len()).as_deref() == Some(expected)
}

/// Entry point: `anchor` is the value offset of the `0x927C` Makernote tag.
pub fn dispatch(
    store: &mut MetadataStore,
    reader: &mut ByteRegion,
    visited: &mut VisitedOffsets,
    anchor: i64,
    tiff_header_offset: i64,
) {
    let Some(ifd0) = store.get_directory(DirectoryKind::ExifIfd0) else {
        tracing::trace!("no ExifIfd0 directory yet, skipping makernote dispatch");
        return;
    };
    let make = ifd0.get_string(tags::MAKE).map(str::to_owned);
    let make = make.as_deref().unwrap_or("");

    tracing::trace!(anchor, make, "dispatching makernote");
    let saved_endian = reader.big_endian();

    if let Some((kind, sub_offset, base, endian_override)) = resolve(reader, anchor, tiff_header_offset, make) {
        tracing::debug!(?kind, sub_offset, base, "makernote vendor matched");
        if let Some(le) = endian_override {
            reader.set_big_endian(!le);
        }
        walker::process_ifd(store, reader, visited, kind, sub_offset, base);
    } else if sig_is(reader, anchor, b"KDK") {
        let force_big_endian = sig(reader, anchor, 7).as_deref() == Some(b"KDK INF");
        tracing::debug!(force_big_endian, "makernote vendor matched: Kodak (fixed-offset record)");
        if force_big_endian {
            reader.set_big_endian(true);
        }
        kodak::decode(store, reader, anchor + 8);
    } else {
        tracing::trace!(make, "no makernote vendor matched; signature ignored");
    }

    reader.set_big_endian(saved_endian);
}

/// Resolve the (directory kind, sub-IFD offset, TIFF base, forced
/// little-endian override) for every makernote framing that is itself a
/// TIFF-style IFD. Kodak is handled separately by `dispatch` since it isn't
/// an IFD at all. Returns `None` for unrecognized vendors (silently ignored)
/// and for Kodak (handled by the caller).
#[allow(clippy::type_complexity)]
fn resolve(
    reader: &ByteRegion,
    anchor: i64,
    tiff_header_offset: i64,
    make: &str,
) -> Option<(DirectoryKind, i64, i64, Option<bool>)> {
    let starts = |prefix: &str| make.starts_with(prefix);

    if sig_is(reader, anchor, b"OLYMP") || sig_is(reader, anchor, b"EPSON") || sig_is(reader, anchor, b"AGFA") {
        tracing::trace!("makernote signature matched: Olympus/Epson/Agfa");
        return Some((DirectoryKind::Olympus, anchor + 8, tiff_header_offset, None));
    }

    if starts("NIKON") {
        if sig_is(reader, anchor, b"Nikon") {
            match reader.read_u8(anchor + 6) {
                Ok(1) => {
                    tracing::trace!("makernote signature matched: Nikon type 1");
                    return Some((DirectoryKind::NikonType1, anchor + 8, tiff_header_offset, None));
                }
                Ok(2) => {
                    tracing::trace!("makernote signature matched: Nikon type 2 (with \"Nikon\" header)");
                    return Some((DirectoryKind::NikonType2, anchor + 18, anchor + 10, None));
                }
                _ => {}
            }
        } else {
            tracing::trace!("makernote signature matched: Nikon type 2 (headerless)");
            return Some((DirectoryKind::NikonType2, anchor, tiff_header_offset, None));
        }
    }

    if sig_is(reader, anchor, b"SONY CAM") || sig_is(reader, anchor, b"SONY DSC") {
        tracing::trace!("makernote signature matched: Sony type 1");
        return Some((DirectoryKind::SonyType1, anchor + 12, tiff_header_offset, None));
    }

    if sig_is(reader, anchor, b"SEMC MS\0\0\0\0\0") {
        tracing::trace!("makernote signature matched: Sony type 6 (SEMC MS)");
        return Some((DirectoryKind::SonyType6, anchor + 20, tiff_header_offset, Some(false)));
    }

    if sig_is(reader, anchor, b"SIGMA\0\0\0") || sig_is(reader, anchor, b"FOVEON\0\0") {
        tracing::trace!("makernote signature matched: Sigma/Foveon");
        return Some((DirectoryKind::Sigma, anchor + 10, tiff_header_offset, None));
    }

    if sig_is(reader, anchor, b"KDK") {
        // Handled by `dispatch` directly (not an IFD).
        return None;
    }

    if make.eq_ignore_ascii_case("Canon") {
        tracing::trace!("makernote signature matched: Canon (via Make tag)");
        return Some((DirectoryKind::Canon, anchor, tiff_header_offset, None));
    }

    if starts("CASIO") {
        if sig_is(reader, anchor, b"QVC\0\0\0") {
            tracing::trace!("makernote signature matched: Casio type 2 (QVC)");
            return Some((DirectoryKind::CasioType2, anchor + 6, tiff_header_offset, None));
        }
        tracing::trace!("makernote signature matched: Casio type 1");
        return Some((DirectoryKind::CasioType1, anchor, tiff_header_offset, None));
    }

    if sig_is(reader, anchor, b"FUJIFILM") || make.eq_ignore_ascii_case("Fujifilm") {
        // Fujifilm makernotes are always little-endian regardless of the
        // enclosing file's byte order, including the pointer read below.
        let raw_offset = read_i32_le(reader, anchor + 8).unwrap_or(0);
        tracing::trace!(raw_offset, "makernote signature matched: Fujifilm");
        return Some((DirectoryKind::Fujifilm, anchor + i64::from(raw_offset), anchor, Some(true)));
    }

    if starts("MINOLTA") {
        tracing::trace!("makernote signature matched: Minolta (dispatched as Olympus framing)");
        return Some((DirectoryKind::Olympus, anchor, tiff_header_offset, None));
    }

    if sig_is(reader, anchor, b"KYOCERA") {
        tracing::trace!("makernote signature matched: Kyocera");
        return Some((DirectoryKind::Kyocera, anchor + 22, tiff_header_offset, None));
    }

    if sig_is(reader, anchor, b"LEICA") {
        if make == "Leica Camera AG" {
            tracing::trace!("makernote signature matched: Leica");
            return Some((DirectoryKind::Leica, anchor + 8, tiff_header_offset, Some(true)));
        }
        if make == "LEICA" {
            tracing::trace!("makernote signature matched: Leica (dispatched as Panasonic framing)");
            return Some((DirectoryKind::Panasonic, anchor + 8, tiff_header_offset, Some(true)));
        }
    }

    if sig_is(reader, anchor, b"Panasonic\0\0\0") {
        tracing::trace!("makernote signature matched: Panasonic");
        return Some((DirectoryKind::Panasonic, anchor + 12, tiff_header_offset, None));
    }

    if sig_is(reader, anchor, b"AOC\0") {
        tracing::trace!("makernote signature matched: Casio type 2 (AOC)");
        return Some((DirectoryKind::CasioType2, anchor + 6, anchor, None));
    }

    if starts("PENTAX") || starts("ASAHI") {
        tracing::trace!("makernote signature matched: Pentax/Asahi");
        return Some((DirectoryKind::Pentax, anchor, anchor, None));
    }

    None
}

/// Reads a little-endian i32 regardless of the reader's current endian
/// flag, for the one pointer (Fujifilm's internal IFD offset) that is
/// always little-endian even before the subtree's endianness is forced.
fn read_i32_le(reader: &ByteRegion, offset: i64) -> Option<i32> {
    let bytes = reader.raw_bytes(offset, 4).ok()?;
    Some(i32::from_le_bytes(bytes.try_into().ok()?))
}

mod kodak {
    use super::super::directory::DirectoryKind;
    use super::super::metadata::MetadataStore;
    use super::super::reader::ByteRegion;
    use super::super::value::TagValue;

    /// Kodak's fixed-offset record — not an IFD. Reads a compile-time-known
    /// schedule of tags at byte offsets relative to `data_offset`. Any
    /// out-of-bounds fault aborts the entire block with a single error
    /// string and leaves already-set fields intact (spec.md §4.6).
    pub fn decode(store: &mut MetadataStore, reader: &ByteRegion, data_offset: i64) {
        let dir = store.get_or_create_directory(DirectoryKind::Kodak);

        macro_rules! field {
            ($tag:expr, $read:expr, $make:expr) => {
                match $read {
                    Ok(v) => dir.set($tag, $make(v)),
                    Err(_) => {
                        tracing::warn!(tag = $tag, "Kodak makernote truncated, aborting block");
                        dir.add_error("Kodak makernote truncated");
                        return;
                    }
                }
            };
        }

        field!(0, reader.read_fixed_string(data_offset, 8), TagValue::Str);
        field!(1, reader.read_u8(data_offset + 9), |v| TagValue::Int(i32::from(v)));
        field!(2, reader.read_u8(data_offset + 10), |v| TagValue::Int(i32::from(v)));
        field!(3, reader.read_u16(data_offset + 12), |v| TagValue::Int(i32::from(v)));
        field!(4, reader.read_u16(data_offset + 14), |v| TagValue::Int(i32::from(v)));
        field!(5, reader.read_u32(data_offset + 32), |v| TagValue::Int(v as i32));
        field!(6, reader.read_i16(data_offset + 36), |v| TagValue::Int(i32::from(v)));
        field!(7, reader.read_i8(data_offset + 107), |v| TagValue::Int(i32::from(v)));
    }
}
