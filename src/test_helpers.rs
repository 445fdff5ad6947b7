//! Shared test utilities for the photos-sorter test suite.
//!
//! Provides synthetic image fixtures (JPEGs with or without an EXIF capture
//! timestamp), a hand-built EXIF blob, and event collection helpers.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! create_dated_jpeg(&tmp.path().join("a.jpg"), 600, 400, "2021:05:01 10:00:00");
//!
//! let (sink, rx) = EventSink::channel();
//! // ... run the engine with `sink` ...
//! assert_eq!(info_kinds(&drain(rx)), vec![]);
//! ```

use std::path::Path;
use std::sync::mpsc::Receiver;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};

use crate::events::{InfoEvent, InfoKind, ProcessEvent};
use crate::imaging::insert_exif_segment;

// =========================================================================
// EXIF fixtures
// =========================================================================

const TAG_ORIENTATION: u16 = 0x0112;
const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;

const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;

fn push_entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: [u8; 4]) {
    buf.extend_from_slice(&tag.to_le_bytes());
    buf.extend_from_slice(&kind.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf.extend_from_slice(&value);
}

/// Build a little-endian TIFF blob with `Orientation = 6` in IFD0 and,
/// when given, `DateTimeOriginal` in the Exif sub-IFD.
///
/// The string is written verbatim so malformed timestamps can be tested.
pub fn exif_blob(date_time_original: Option<&str>) -> Vec<u8> {
    let ifd0_entries: u32 = if date_time_original.is_some() { 2 } else { 1 };
    let exif_ifd_offset = 8 + 2 + 12 * ifd0_entries + 4;

    let mut buf = Vec::new();
    buf.extend_from_slice(b"II");
    buf.extend_from_slice(&42u16.to_le_bytes());
    buf.extend_from_slice(&8u32.to_le_bytes());

    buf.extend_from_slice(&(ifd0_entries as u16).to_le_bytes());
    push_entry(&mut buf, TAG_ORIENTATION, TYPE_SHORT, 1, [6, 0, 0, 0]);
    if date_time_original.is_some() {
        push_entry(&mut buf, TAG_EXIF_IFD, TYPE_LONG, 1, exif_ifd_offset.to_le_bytes());
    }
    buf.extend_from_slice(&0u32.to_le_bytes());

    if let Some(value) = date_time_original {
        let mut text = value.as_bytes().to_vec();
        text.push(0);

        buf.extend_from_slice(&1u16.to_le_bytes());
        if text.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..text.len()].copy_from_slice(&text);
            push_entry(&mut buf, TAG_DATE_TIME_ORIGINAL, TYPE_ASCII, text.len() as u32, inline);
            buf.extend_from_slice(&0u32.to_le_bytes());
        } else {
            let data_offset = exif_ifd_offset + 2 + 12 + 4;
            push_entry(
                &mut buf,
                TAG_DATE_TIME_ORIGINAL,
                TYPE_ASCII,
                text.len() as u32,
                data_offset.to_le_bytes(),
            );
            buf.extend_from_slice(&0u32.to_le_bytes());
            buf.extend_from_slice(&text);
        }
    }
    buf
}

// =========================================================================
// Image fixtures
// =========================================================================

/// Write a gradient JPEG of the given size, optionally carrying `exif`.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32, exif: Option<&[u8]>) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, 90))
        .unwrap();
    if let Some(exif) = exif {
        insert_exif_segment(&mut bytes, exif).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

/// Write a JPEG whose EXIF carries `DateTimeOriginal = taken_at`.
pub fn create_dated_jpeg(path: &Path, width: u32, height: u32, taken_at: &str) {
    create_test_jpeg(path, width, height, Some(exif_blob(Some(taken_at)).as_slice()));
}

// =========================================================================
// Event collection
// =========================================================================

/// Collect every event still queued on `rx`. The sender must be dropped.
pub fn drain(rx: Receiver<ProcessEvent>) -> Vec<ProcessEvent> {
    rx.into_iter().collect()
}

/// Informational events in emission order.
pub fn infos(events: &[ProcessEvent]) -> Vec<&InfoEvent> {
    events
        .iter()
        .filter_map(|e| match e {
            ProcessEvent::Info(info) => Some(info),
            _ => None,
        })
        .collect()
}

/// Kinds of the informational events in emission order.
pub fn info_kinds(events: &[ProcessEvent]) -> Vec<InfoKind> {
    infos(events).into_iter().map(|i| i.kind).collect()
}

/// Sorted file names in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
