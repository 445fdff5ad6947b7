//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two operations that touch codecs:
//! decode a file and save an image. Everything between (metadata lookup,
//! resize planning, resampling) works on the in-memory [`DecodedImage`].
//!
//! Decoding returns a typed [`DecodeOutcome`] instead of an error, because
//! "this is not an image" is an expected answer for mixed directories and
//! must not be confused with a broken image.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::metadata::MetadataError;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// A decoded image plus the raw EXIF blob it carried, if any.
///
/// `exif` is kept verbatim (TIFF structure, optionally prefixed with
/// `Exif\0\0`) so it can be written back unchanged on save.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub exif: Option<Vec<u8>>,
}

impl DecodedImage {
    pub fn new(image: DynamicImage, exif: Option<Vec<u8>>) -> Self {
        Self { image, exif }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// Result of trying to open a file as an image.
#[derive(Debug)]
pub enum DecodeOutcome {
    Decoded(DecodedImage),
    /// Not an image format we know. Not an error.
    UnrecognizedFormat,
    /// Recognized but unreadable (truncated, corrupt, I/O failure).
    Failed(String),
}

pub trait ImageBackend {
    /// Read and decode the file at `path`.
    fn decode(&self, path: &Path) -> DecodeOutcome;

    /// Encode `image` in the format implied by `path`'s extension and write it.
    ///
    /// `exif` is embedded when the output format supports it. Nothing is
    /// left at `path` when this fails.
    fn save(
        &self,
        image: &DynamicImage,
        exif: Option<&[u8]>,
        path: &Path,
        quality: Quality,
    ) -> Result<(), BackendError>;
}
