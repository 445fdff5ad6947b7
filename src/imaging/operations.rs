//! High-level image operations.
//!
//! These functions combine calculations with pixel work: compute a
//! [`ResizePlan`] from the image size, then resample when the plan says so.

use super::calculations::{ResizePlan, plan_resize};
use image::DynamicImage;
use image::imageops::FilterType;
use std::borrow::Cow;

/// Outcome of [`resize_image`]: the image to write plus the plan that
/// produced it.
#[derive(Debug)]
pub struct Resized<'a> {
    pub image: Cow<'a, DynamicImage>,
    pub plan: ResizePlan,
}

impl Resized<'_> {
    /// Panoramas are written at full size and reported to the caller.
    pub fn is_panoramic(&self) -> bool {
        self.plan == ResizePlan::Panoramic
    }
}

/// Fit `image` so its longer side is at most `target_longer_side`.
///
/// Panoramas and images already within the target are returned borrowed
/// and unchanged. Everything else is resampled with Lanczos3.
pub fn resize_image(image: &DynamicImage, target_longer_side: u32) -> Resized<'_> {
    let plan = plan_resize(image.width(), image.height(), target_longer_side);
    let image = match plan {
        ResizePlan::Scale { width, height } => {
            Cow::Owned(image.resize_exact(width, height, FilterType::Lanczos3))
        }
        ResizePlan::Panoramic | ResizePlan::KeepOriginal => Cow::Borrowed(image),
    };
    Resized { image, plan }
}
