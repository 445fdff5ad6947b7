//! Production backend on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format detection | `ImageReader::with_guessed_format` (magic bytes) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate decoders |
//! | EXIF extraction | `ImageDecoder::exif_metadata` (raw blob, untouched) |
//! | Encode JPEG | `JpegEncoder::new_with_quality` |
//! | Encode PNG, TIFF, WebP | `DynamicImage::write_to` |
//! | EXIF re-embedding | APP1 segment spliced in after SOI/APP0 |
//!
//! Files are read fully into memory before decoding and encoded fully into
//! memory before writing, so the source can be overwritten in place and a
//! failed encode never leaves a partial file behind.

use super::backend::{BackendError, DecodeOutcome, DecodedImage, ImageBackend, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an in-memory file, classifying the three possible answers.
pub fn decode_bytes(bytes: &[u8]) -> DecodeOutcome {
    let reader = match ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(e) => return DecodeOutcome::Failed(e.to_string()),
    };
    match reader.format() {
        Some(format) if format.reading_enabled() => {}
        _ => return DecodeOutcome::UnrecognizedFormat,
    }

    let mut decoder = match reader.into_decoder() {
        Ok(decoder) => decoder,
        Err(ImageError::Unsupported(_)) => return DecodeOutcome::UnrecognizedFormat,
        Err(e) => return DecodeOutcome::Failed(e.to_string()),
    };
    let exif = match decoder.exif_metadata() {
        Ok(exif) => exif,
        Err(e) => return DecodeOutcome::Failed(e.to_string()),
    };
    match DynamicImage::from_decoder(decoder) {
        Ok(image) => DecodeOutcome::Decoded(DecodedImage::new(image, exif)),
        Err(e) => DecodeOutcome::Failed(e.to_string()),
    }
}

/// Resolve the output codec from the destination extension (`jpg` → JPEG).
fn output_format(path: &Path) -> Result<ImageFormat, BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ImageFormat::from_extension(&ext) {
        Some(format) if format.writing_enabled() => Ok(format),
        _ => Err(BackendError::UnsupportedOutput(ext)),
    }
}

/// Encode `image` into a byte buffer. Quality only applies to JPEG.
pub fn encode(
    image: &DynamicImage,
    format: ImageFormat,
    exif: Option<&[u8]>,
    quality: Quality,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let rgb;
            let source = match image {
                DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
                _ => {
                    rgb = DynamicImage::ImageRgb8(image.to_rgb8());
                    &rgb
                }
            };
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value());
            source
                .write_with_encoder(encoder)
                .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {e}")))?;
            if let Some(exif) = exif.filter(|e| !e.is_empty()) {
                insert_exif_segment(&mut buf, exif)?;
            }
        }
        other => {
            image
                .write_to(&mut Cursor::new(&mut buf), other)
                .map_err(|e| BackendError::Encode(format!("{other:?} encode failed: {e}")))?;
            if exif.is_some() {
                log::debug!("EXIF not embedded: {other:?} output");
            }
        }
    }
    Ok(buf)
}

fn with_exif_header(exif: &[u8]) -> Cow<'_, [u8]> {
    if exif.starts_with(EXIF_HEADER) {
        Cow::Borrowed(exif)
    } else {
        let mut prefixed = Vec::with_capacity(EXIF_HEADER.len() + exif.len());
        prefixed.extend_from_slice(EXIF_HEADER);
        prefixed.extend_from_slice(exif);
        Cow::Owned(prefixed)
    }
}

/// Splice an EXIF APP1 segment into a JPEG stream, after SOI and any APP0.
pub fn insert_exif_segment(jpeg: &mut Vec<u8>, exif: &[u8]) -> Result<(), BackendError> {
    if !jpeg.starts_with(&[0xFF, 0xD8]) {
        return Err(BackendError::Encode("not a JPEG stream".into()));
    }
    let payload = with_exif_header(exif);
    // Segment length counts its own two length bytes.
    let segment_len = payload.len() + 2;
    if segment_len > u16::MAX as usize {
        return Err(BackendError::Encode(format!(
            "EXIF block too large to embed ({} bytes)",
            payload.len()
        )));
    }

    let mut pos = 2;
    while pos + 4 <= jpeg.len() && jpeg[pos] == 0xFF && jpeg[pos + 1] == 0xE0 {
        let len = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
        pos += 2 + len;
    }
    let pos = pos.min(jpeg.len());

    let mut segment = Vec::with_capacity(segment_len + 2);
    segment.extend_from_slice(&[0xFF, 0xE1]);
    segment.extend_from_slice(&(segment_len as u16).to_be_bytes());
    segment.extend_from_slice(&payload);
    jpeg.splice(pos..pos, segment);
    Ok(())
}

/// Hidden sibling used to stage a write before renaming over `path`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".partial");
    path.with_file_name(name)
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> DecodeOutcome {
        match fs::read(path) {
            Ok(bytes) => decode_bytes(&bytes),
            Err(e) => DecodeOutcome::Failed(format!("{}: {e}", path.display())),
        }
    }

    fn save(
        &self,
        image: &DynamicImage,
        exif: Option<&[u8]>,
        path: &Path,
        quality: Quality,
    ) -> Result<(), BackendError> {
        let format = output_format(path)?;
        let bytes = encode(image, format, exif, quality)?;

        let staging = staging_path(path);
        let written = fs::write(&staging, &bytes).and_then(|_| fs::rename(&staging, path));
        if let Err(e) = written {
            let _ = fs::remove_file(&staging);
            return Err(BackendError::Io(e));
        }
        Ok(())
    }
}
