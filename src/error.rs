use std::fmt;
use std::fmt::Display;

/// Catastrophic failures that abort a parse before any directory exists to
/// record an error string on. Everything else the walker encounters — bad
/// format codes, out-of-range pointers, cycles, unrecognized makernote
/// signatures — is recoverable and is recorded as an error string on the
/// relevant `Directory` instead of being raised here.
#[derive(Debug)]
pub enum ExifError {
    /// The byte region is too short to even hold a TIFF header.
    TiffTruncated,
    /// A JPEG APP1 segment was found but its first six bytes were not `Exif\0\0`.
    PreambleMismatch(String),
    /// No APP1/Exif segment could be located while scanning JPEG markers.
    JpegWithoutExif(String),
}

impl std::error::Error for ExifError {}

impl Display for ExifError {
    #[cold]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TiffTruncated => f.write_str("TIFF truncated at start"),
            Self::PreambleMismatch(s) => write!(f, "TIFF with bad preamble: {s}"),
            Self::JpegWithoutExif(s) => write!(f, "JPEG without EXIF section: {s}"),
        }
    }
}
