//! Well-known tag ids the core must recognize structurally (spec.md §6).
//! Everything else is opaque to the walker — individual tag semantics are
//! an out-of-scope collaborator concern.

/// Pointer to the Exif SubIFD, found in IFD0.
pub const EXIF_SUB_IFD_POINTER: u16 = 0x8769;
/// Pointer to the Interoperability IFD, found in the Exif SubIFD.
pub const INTEROP_IFD_POINTER: u16 = 0xA005;
/// Pointer to the GPS IFD, found in IFD0.
pub const GPS_IFD_POINTER: u16 = 0x8825;
/// Vendor-specific Makernote blob, found in the Exif SubIFD.
pub const MAKERNOTE: u16 = 0x927C;
/// Camera/scanner manufacturer string, found in IFD0; drives makernote dispatch.
pub const MAKE: u16 = 0x010F;

/// Thumbnail IFD (IFD1) tags: compression scheme, and the offset/length
/// pair used to slice out the raw thumbnail bytes.
pub const THUMBNAIL_COMPRESSION: u16 = 0x0103;
pub const THUMBNAIL_OFFSET: u16 = 0x0201;
pub const THUMBNAIL_LENGTH: u16 = 0x0202;
