//! Exif entry points (spec component 6 of 6): verify the APP1 preamble,
//! locate the TIFF header, and hand off to the IFD walker; also a bare-TIFF
//! entry point with header at offset 0. Plus the JPEG APP1 segment
//! discovery collaborator named (but not implemented) by spec.md §6.

use super::directory::DirectoryKind;
use super::error::ExifError;
use super::metadata::MetadataStore;
use super::reader::ByteRegion;
use super::walker::{self, VisitedOffsets};

/// The ASCII preamble that marks a JPEG APP1 segment as carrying Exif.
pub const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";

/// The APP1 marker byte a JPEG segment reader would key its dispatch on.
pub const APP1_MARKER: u8 = 0xE1;

/// Parse a JPEG APP1 segment payload (starting with the `Exif\0\0` preamble)
/// into a metadata store. Spec.md §4.4.
pub fn extract_exif_segment(bytes: &[u8]) -> Result<MetadataStore, ExifError> {
    if bytes.len() <= 14 {
        return Err(ExifError::TiffTruncated);
    }
    if &bytes[0..6] != EXIF_HEADER {
        return Err(ExifError::PreambleMismatch(String::from_utf8_lossy(&bytes[0..6]).into_owned()));
    }
    Ok(run_tiff_walker(bytes, 6))
}

/// Parse a bare TIFF/RAW stream (header at offset 0) into a metadata store.
/// Spec.md §4.4. Unlike [`extract_exif_segment`], there is no preamble to
/// reject up front; a buffer too short to hold a TIFF header is handled by
/// `run_tiff_walker`'s own marker/magic/offset reads and comes back as a
/// recorded `"Exif data segment ended prematurely"` error on `ExifIfd0`
/// rather than a propagated `Result::Err`.
pub fn extract_tiff(bytes: &[u8]) -> Result<MetadataStore, ExifError> {
    Ok(run_tiff_walker(bytes, 0))
}

fn fail(store: &mut MetadataStore, message: &str) {
    store.get_or_create_directory(DirectoryKind::ExifIfd0).add_error(message);
}

fn run_tiff_walker(bytes: &[u8], tiff_header_offset: i64) -> MetadataStore {
    let mut store = MetadataStore::new();
    let mut reader = ByteRegion::new(bytes);

    let marker: [u8; 2] = match reader.raw_bytes(tiff_header_offset, 2).and_then(|b| b.try_into().map_err(|_| super::reader::OutOfBounds)) {
        Ok(m) => m,
        Err(_) => {
            fail(&mut store, "Exif data segment ended prematurely");
            return store;
        }
    };
    match marker {
        [b'I', b'I'] => reader.set_big_endian(false),
        [b'M', b'M'] => reader.set_big_endian(true),
        _ => {
            fail(
                &mut store,
                &format!(
                    "Unclear distinction between Motorola/Intel byte ordering: {}",
                    String::from_utf8_lossy(&marker)
                ),
            );
            return store;
        }
    }

    let magic = match reader.read_u16(tiff_header_offset + 2) {
        Ok(v) => v,
        Err(_) => {
            fail(&mut store, "Exif data segment ended prematurely");
            return store;
        }
    };
    if !matches!(magic, 0x002A | 0x4F52 | 0x0055) {
        fail(&mut store, &format!("Unexpected TIFF marker: {magic:#06x}"));
        return store;
    }

    let raw_first_ifd = match reader.read_i32(tiff_header_offset + 4) {
        Ok(v) => v,
        Err(_) => {
            fail(&mut store, "Exif data segment ended prematurely");
            return store;
        }
    };

    let len = reader.len() as i64;
    let mut first_ifd_offset = tiff_header_offset + i64::from(raw_first_ifd);
    if first_ifd_offset >= len - 1 {
        fail(&mut store, "First IFD offset out of data segment; falling back to offset 14");
        first_ifd_offset = 14;
    }

    let mut visited = VisitedOffsets::new();
    walker::process_ifd(&mut store, &mut reader, &mut visited, DirectoryKind::ExifIfd0, first_ifd_offset, tiff_header_offset);
    walker::extract_thumbnail(&mut store, &reader, tiff_header_offset);

    store
}

/// The JPEG segment reader collaborator (spec.md §6): advertises that it
/// handles segment type APP1, and knows how to recognize and unwrap an
/// Exif payload out of one.
pub struct App1ExifSegmentReader;

impl App1ExifSegmentReader {
    #[must_use]
    pub fn segment_type(&self) -> u8 {
        APP1_MARKER
    }

    /// True when `bytes` looks like it starts with the 4-letter `EXIF`
    /// sniff (case-insensitive), regardless of the exact 6-byte preamble
    /// `extract` will go on to validate.
    #[must_use]
    pub fn can_process(&self, bytes: &[u8], segment_type: u8) -> bool {
        segment_type == APP1_MARKER && bytes.len() > 3 && bytes[0..4].eq_ignore_ascii_case(b"EXIF")
    }

    pub fn extract(&self, bytes: &[u8], segment_type: u8) -> Result<MetadataStore, ExifError> {
        if !self.can_process(bytes, segment_type) {
            return Err(ExifError::JpegWithoutExif("segment does not look like Exif".into()));
        }
        extract_exif_segment(bytes)
    }
}

/// Scan JPEG markers from offset 2 looking for the APP1 segment carrying
/// the `Exif\0\0` preamble, and return its payload (excluding the preamble).
/// Grounded in the teacher's `image::find_embedded_tiff_in_jpeg`.
pub fn find_app1_exif(contents: &[u8]) -> Result<&[u8], ExifError> {
    let mut offset = 2usize;

    while offset < contents.len() {
        if contents.len() < offset + 4 {
            return Err(ExifError::JpegWithoutExif("JPEG truncated in marker header".into()));
        }

        let marker = u16::from(contents[offset]) * 256 + u16::from(contents[offset + 1]);
        if marker < 0xff00 {
            return Err(ExifError::JpegWithoutExif(format!("Invalid marker {marker:x}")));
        }
        offset += 2;

        let size = (contents[offset] as usize) * 256 + (contents[offset + 1] as usize);
        if size < 2 {
            return Err(ExifError::JpegWithoutExif(
                "JPEG marker size must be at least 2 (because of the size word)".into(),
            ));
        }
        if contents.len() < offset + size {
            return Err(ExifError::JpegWithoutExif("JPEG truncated in marker body".into()));
        }

        if marker == 0xffe1 {
            if size < 8 {
                return Err(ExifError::JpegWithoutExif("EXIF preamble truncated".into()));
            }
            if &contents[offset + 2..offset + 8] != EXIF_HEADER {
                offset += size;
                continue;
            }
            return Ok(&contents[offset + 2..offset + size]);
        }
        if marker == 0xffda {
            return Err(ExifError::JpegWithoutExif("Last marker found and no EXIF".into()));
        }
        offset += size;
    }

    Err(ExifError::JpegWithoutExif("Scan past EOF and no EXIF found".into()))
}
