//! Image processing on the pure Rust `image` stack.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image` decoders, format sniffed from magic bytes |
//! | **Capture timestamp** | `kamadak-exif` over the raw EXIF blob |
//! | **Resize** | Lanczos3 `resize_exact` |
//! | **Encode** | `image` encoders, JPEG quality configurable |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Metadata**: EXIF capture timestamp lookup
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + pixels

pub mod backend;
mod calculations;
pub mod metadata;
pub mod operations;
pub mod rust_backend;

pub use backend::{BackendError, DecodeOutcome, DecodedImage, ImageBackend, Quality};
pub use calculations::{PANORAMIC_RATIO, ResizePlan, aspect_ratio, plan_resize};
pub use metadata::{MetadataError, capture_timestamp};
pub use operations::{Resized, resize_image};
pub use rust_backend::{RustBackend, insert_exif_segment};
