//! Capture timestamp lookup from a raw EXIF blob.
//!
//! Only `DateTimeOriginal` (tag `0x9003`) is consulted. `DateTime` and
//! `DateTimeDigitized` describe when the file was written or scanned, which
//! is not what a photo should be named after.
//!
//! | Blob state | Result |
//! |---|---|
//! | no blob, empty blob, or tag absent | `Ok(None)` |
//! | tag present and well formed | `Ok(Some("2021_05_01_10_00_00"))` |
//! | tag present but not `YYYY:MM:DD HH:MM:SS` | `Err(InvalidTimestamp)` |
//! | blob is not a TIFF structure | `Err(Exif)` |

use super::backend::DecodedImage;
use chrono::NaiveDateTime;
use exif::{In, Tag, Value};
use thiserror::Error;

/// EXIF timestamp layout, e.g. `2021:05:01 10:00:00`.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// File name layout for a capture timestamp, e.g. `2021_05_01_10_00_00`.
pub const FILE_NAME_DATETIME_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Unreadable EXIF block: {0}")]
    Exif(#[from] exif::Error),
    #[error("Capture timestamp {value:?} is not a valid date: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Capture timestamp is stored as {0}, not text")]
    NotText(String),
}

/// Capture timestamp of a decoded image, formatted for use as a file name.
pub fn capture_timestamp(image: &DecodedImage) -> Result<Option<String>, MetadataError> {
    match image.exif.as_deref() {
        Some(blob) => capture_timestamp_from_exif(blob),
        None => Ok(None),
    }
}

/// Same as [`capture_timestamp`], from the raw blob. A leading `Exif\0\0`
/// header is accepted and skipped.
pub fn capture_timestamp_from_exif(blob: &[u8]) -> Result<Option<String>, MetadataError> {
    let tiff = blob.strip_prefix(b"Exif\0\0").unwrap_or(blob);
    if tiff.is_empty() {
        return Ok(None);
    }

    let exif = exif::Reader::new().read_raw(tiff.to_vec())?;
    let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) else {
        return Ok(None);
    };

    let raw = match &field.value {
        Value::Ascii(parts) => match parts.first() {
            Some(part) => String::from_utf8_lossy(part).into_owned(),
            None => return Ok(None),
        },
        other => return Err(MetadataError::NotText(format!("{other:?}"))),
    };
    let value = raw.trim_end_matches('\0');
    if value.is_empty() {
        return Ok(None);
    }

    let parsed = NaiveDateTime::parse_from_str(value, EXIF_DATETIME_FORMAT).map_err(|source| {
        MetadataError::InvalidTimestamp {
            value: value.to_string(),
            source,
        }
    })?;
    Ok(Some(parsed.format(FILE_NAME_DATETIME_FORMAT).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::exif_blob;
    use image::DynamicImage;

    fn decoded(exif: Option<Vec<u8>>) -> DecodedImage {
        DecodedImage::new(DynamicImage::new_rgb8(1, 1), exif)
    }

    #[test]
    fn timestamp_is_reformatted() {
        let blob = exif_blob(Some("2021:05:01 10:00:00"));
        assert_eq!(
            capture_timestamp_from_exif(&blob).unwrap().as_deref(),
            Some("2021_05_01_10_00_00")
        );
    }

    #[test]
    fn exif_header_is_skipped() {
        let mut blob = b"Exif\0\0".to_vec();
        blob.extend(exif_blob(Some("1999:12:31 23:59:58")));
        assert_eq!(
            capture_timestamp_from_exif(&blob).unwrap().as_deref(),
            Some("1999_12_31_23_59_58")
        );
    }

    #[test]
    fn no_exif_is_absent() {
        assert_eq!(capture_timestamp(&decoded(None)).unwrap(), None);
        assert_eq!(capture_timestamp(&decoded(Some(Vec::new()))).unwrap(), None);
        assert_eq!(capture_timestamp_from_exif(b"Exif\0\0").unwrap(), None);
    }

    #[test]
    fn exif_without_capture_tag_is_absent() {
        let blob = exif_blob(None);
        assert_eq!(capture_timestamp(&decoded(Some(blob))).unwrap(), None);
    }

    #[test]
    fn empty_capture_tag_is_absent() {
        let blob = exif_blob(Some(""));
        assert_eq!(capture_timestamp_from_exif(&blob).unwrap(), None);
    }

    #[test]
    fn malformed_timestamp_is_an_error() {
        let blob = exif_blob(Some("0000:00:00 00:00:00"));
        assert!(matches!(
            capture_timestamp_from_exif(&blob),
            Err(MetadataError::InvalidTimestamp { .. })
        ));

        let blob = exif_blob(Some("yesterday at noon"));
        assert!(matches!(
            capture_timestamp_from_exif(&blob),
            Err(MetadataError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn garbage_blob_is_an_error() {
        assert!(matches!(
            capture_timestamp_from_exif(b"not a tiff structure at all"),
            Err(MetadataError::Exif(_))
        ));
    }
}
