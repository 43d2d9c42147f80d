//! Metadata store (spec component 2 of 6): a name-keyed collection of
//! directories, each a map from tag id to typed value plus an appended list
//! of error strings.

use super::value::TagValue;
use std::collections::HashMap;

/// The closed set of directory kinds spec.md §3 enumerates: the standard
/// Exif directories plus one kind per recognized makernote vendor/type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DirectoryKind {
    ExifIfd0,
    ExifSubIfd,
    ExifInterop,
    Gps,
    ExifThumbnail,
    Olympus,
    NikonType1,
    NikonType2,
    Canon,
    CasioType1,
    CasioType2,
    Fujifilm,
    Kodak,
    Kyocera,
    Leica,
    Panasonic,
    Pentax,
    Sigma,
    SonyType1,
    SonyType6,
}

impl DirectoryKind {
    #[must_use]
    pub fn is_makernote(self) -> bool {
        !matches!(
            self,
            Self::ExifIfd0 | Self::ExifSubIfd | Self::ExifInterop | Self::Gps | Self::ExifThumbnail
        )
    }
}

/// One directory: a tag-id-keyed map of decoded values, an ordered list of
/// recoverable-fault error strings, and (only for `ExifThumbnail`) the
/// extracted thumbnail byte slice.
#[derive(Clone, Debug, Default)]
pub struct Directory {
    values: HashMap<u16, TagValue>,
    errors: Vec<String>,
    thumbnail: Option<Vec<u8>>,
}

impl Directory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, tag_id: u16, value: TagValue) {
        self.values.insert(tag_id, value);
    }

    #[must_use]
    pub fn get(&self, tag_id: u16) -> Option<&TagValue> {
        self.values.get(&tag_id)
    }

    #[must_use]
    pub fn contains_tag(&self, tag_id: u16) -> bool {
        self.values.contains_key(&tag_id)
    }

    #[must_use]
    pub fn get_integer(&self, tag_id: u16) -> Option<i64> {
        self.values.get(&tag_id).and_then(TagValue::as_i64)
    }

    #[must_use]
    pub fn get_string(&self, tag_id: u16) -> Option<&str> {
        self.values.get(&tag_id).and_then(TagValue::as_str)
    }

    #[must_use]
    pub fn tags(&self) -> impl Iterator<Item = (&u16, &TagValue)> {
        self.values.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "recording directory parse error");
        self.errors.push(message);
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn set_thumbnail_data(&mut self, data: Vec<u8>) {
        self.thumbnail = Some(data);
    }

    #[must_use]
    pub fn thumbnail_data(&self) -> Option<&[u8]> {
        self.thumbnail.as_deref()
    }
}
