//! IFD walker (spec component 4 of 6, `processIFD`): recursive descent over
//! TIFF directories — header parsing, per-entry dispatch, known-offset-tag
//! subdirectory recursion with cycle detection, next-IFD chaining.

use super::decoder::{self, bytes_per_format};
use super::directory::DirectoryKind;
use super::makernote;
use super::metadata::MetadataStore;
use super::reader::ByteRegion;
use super::tags;
use std::collections::HashSet;

/// Absolute IFD offsets already entered during this parse. Keyed by offset
/// alone, not by `(offset, tiff_header_offset)` — spec.md §9 flags this as
/// possibly suppressing a legitimate re-entry of the same offset from a
/// nested makernote with a different header base, and leaves it unresolved.
/// This walker keeps the spec's stated behavior rather than changing it.
pub type VisitedOffsets = HashSet<i64>;

/// Walk one IFD (and everything it transitively points to) starting at
/// `ifd_offset`, storing decoded tags into the directory for `kind`.
/// `tiff_header_offset` is the absolute offset of the TIFF header that all
/// in-IFD pointers are relative to.
pub fn process_ifd(
    store: &mut MetadataStore,
    reader: &mut ByteRegion,
    visited: &mut VisitedOffsets,
    kind: DirectoryKind,
    ifd_offset: i64,
    tiff_header_offset: i64,
) {
    if visited.contains(&ifd_offset) {
        tracing::trace!(ifd_offset, "IFD already visited, skipping to avoid cycle");
        return;
    }
    visited.insert(ifd_offset);

    let len = reader.len() as i64;

    if ifd_offset < 0 || ifd_offset >= len {
        store
            .get_or_create_directory(kind)
            .add_error("Ignored IFD marked to start outside data segment");
        return;
    }

    let tag_count = match reader.read_u16(ifd_offset) {
        Ok(v) => i64::from(v),
        Err(_) => {
            store
                .get_or_create_directory(kind)
                .add_error("Ignored IFD marked to start outside data segment");
            return;
        }
    };

    let dir_length = 2 + 12 * tag_count + 4;
    if ifd_offset + dir_length > len {
        store.get_or_create_directory(kind).add_error("Illegally sized IFD");
        return;
    }

    tracing::debug!(?kind, ifd_offset, tag_count, "walking IFD");

    for i in 0..tag_count {
        let entry_offset = ifd_offset + 2 + 12 * i;

        let tag_type = match reader.read_u16(entry_offset) {
            Ok(v) => v,
            Err(_) => break,
        };
        let format_code = match reader.read_u16(entry_offset + 2) {
            Ok(v) => v,
            Err(_) => break,
        };

        if !(1..=12).contains(&format_code) {
            store
                .get_or_create_directory(kind)
                .add_error(format!("Invalid TIFF tag format code: {format_code}"));
            // Subsequent bytes are likely misaligned; abort the whole IFD.
            return;
        }

        let component_count = match reader.read_i32(entry_offset + 4) {
            Ok(v) => v,
            Err(_) => break,
        };
        if component_count < 0 {
            store.get_or_create_directory(kind).add_error("Negative TIFF tag component count");
            continue;
        }

        let byte_width = i64::from(bytes_per_format(format_code).expect("format code validated above"));
        let byte_count = byte_width * i64::from(component_count);

        let value_offset = if byte_count > 4 {
            let raw_offset = match reader.read_i32(entry_offset + 8) {
                Ok(v) => i64::from(v),
                Err(_) => continue,
            };
            if raw_offset + byte_count > len {
                store.get_or_create_directory(kind).add_error("Illegal TIFF tag pointer offset");
                continue;
            }
            tiff_header_offset + raw_offset
        } else {
            entry_offset + 8
        };

        if value_offset < 0 || value_offset > len {
            store.get_or_create_directory(kind).add_error("Illegal TIFF tag pointer offset");
            continue;
        }
        if byte_count < 0 || value_offset + byte_count > len {
            store
                .get_or_create_directory(kind)
                .add_error("Illegal number of bytes for TIFF tag data");
            continue;
        }

        match tag_type {
            tags::EXIF_SUB_IFD_POINTER => {
                let sub_offset = tiff_header_offset + reader.read_i32(value_offset).unwrap_or(0) as i64;
                process_ifd(store, reader, visited, DirectoryKind::ExifSubIfd, sub_offset, tiff_header_offset);
            }
            tags::INTEROP_IFD_POINTER => {
                let sub_offset = tiff_header_offset + reader.read_i32(value_offset).unwrap_or(0) as i64;
                process_ifd(store, reader, visited, DirectoryKind::ExifInterop, sub_offset, tiff_header_offset);
            }
            tags::GPS_IFD_POINTER => {
                let sub_offset = tiff_header_offset + reader.read_i32(value_offset).unwrap_or(0) as i64;
                process_ifd(store, reader, visited, DirectoryKind::Gps, sub_offset, tiff_header_offset);
            }
            tags::MAKERNOTE => {
                makernote::dispatch(store, reader, visited, value_offset, tiff_header_offset);
            }
            _ => {
                let dir = store.get_or_create_directory(kind);
                decoder::process_tag(dir, tag_type, value_offset, i64::from(component_count), format_code, reader);
            }
        }
    }

    let next_ptr_offset = ifd_offset + 2 + 12 * tag_count;
    if let Ok(next_raw) = reader.read_i32(next_ptr_offset) {
        if next_raw != 0 {
            let next_offset = tiff_header_offset + i64::from(next_raw);
            if next_offset < len && next_offset >= ifd_offset {
                process_ifd(store, reader, visited, DirectoryKind::ExifThumbnail, next_offset, tiff_header_offset);
            }
        }
    }
}

/// After the top-level walk, if an `ExifThumbnail` directory exists and
/// carries the compression tag, slice out the raw thumbnail bytes named by
/// its offset/length tags. Any bounds failure is recorded and non-fatal.
pub fn extract_thumbnail(store: &mut MetadataStore, reader: &ByteRegion, tiff_header_offset: i64) {
    let (offset, length) = {
        let Some(dir) = store.get_directory(DirectoryKind::ExifThumbnail) else {
            return;
        };
        if !dir.contains_tag(tags::THUMBNAIL_COMPRESSION) {
            return;
        }
        let (Some(offset), Some(length)) =
            (dir.get_integer(tags::THUMBNAIL_OFFSET), dir.get_integer(tags::THUMBNAIL_LENGTH))
        else {
            return;
        };
        (offset, length)
    };

    if length < 0 {
        return;
    }
    match reader.raw_bytes(tiff_header_offset + offset, length as usize) {
        Ok(bytes) => store
            .get_or_create_directory(DirectoryKind::ExifThumbnail)
            .set_thumbnail_data(bytes.to_vec()),
        Err(_) => store
            .get_or_create_directory(DirectoryKind::ExifThumbnail)
            .add_error("Thumbnail offset/length out of bounds"),
    }
}
