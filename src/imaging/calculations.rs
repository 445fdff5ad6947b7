//! Pure calculation functions for resize planning.
//!
//! All functions here are pure and testable without any I/O or images.

/// Long-to-short side ratio at or above which an image counts as a panorama.
pub const PANORAMIC_RATIO: f64 = 2.4;

/// What the resizer should do with an image of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePlan {
    /// Panoramic aspect ratio: keep full size and report it.
    Panoramic,
    /// Already within the target; never upscale.
    KeepOriginal,
    /// Scale to these exact dimensions.
    Scale { width: u32, height: u32 },
}

/// Long side divided by short side.
///
/// A degenerate image with a zero side is treated as infinitely elongated.
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    let long = width.max(height) as f64;
    let short = width.min(height) as f64;
    if short == 0.0 {
        f64::INFINITY
    } else {
        long / short
    }
}

/// Decide how to fit an image into `target_longer_side`.
///
/// Both sides are scaled by `target / max(w, h)` and truncated, never below
/// one pixel.
///
/// ```
/// # use photos_sorter::imaging::{plan_resize, ResizePlan};
/// assert_eq!(
///     plan_resize(6000, 4000, 3000),
///     ResizePlan::Scale { width: 3000, height: 2000 }
/// );
/// assert_eq!(plan_resize(800, 600, 3000), ResizePlan::KeepOriginal);
/// assert_eq!(plan_resize(8000, 2000, 4000), ResizePlan::Panoramic);
/// ```
pub fn plan_resize(width: u32, height: u32, target_longer_side: u32) -> ResizePlan {
    if aspect_ratio(width, height) >= PANORAMIC_RATIO {
        return ResizePlan::Panoramic;
    }

    let ratio = target_longer_side as f64 / width.max(height) as f64;
    if ratio > 1.0 {
        return ResizePlan::KeepOriginal;
    }

    ResizePlan::Scale {
        width: ((width as f64 * ratio) as u32).max(1),
        height: ((height as f64 * ratio) as u32).max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_scaled_to_target() {
        assert_eq!(
            plan_resize(6000, 4000, 3000),
            ResizePlan::Scale {
                width: 3000,
                height: 2000
            }
        );
    }

    #[test]
    fn portrait_scaled_on_height() {
        assert_eq!(
            plan_resize(3000, 4500, 2250),
            ResizePlan::Scale {
                width: 1500,
                height: 2250
            }
        );
    }

    #[test]
    fn dimensions_are_truncated() {
        // ratio = 0.25 → 1000 x 749.75
        assert_eq!(
            plan_resize(4000, 2999, 1000),
            ResizePlan::Scale {
                width: 1000,
                height: 749
            }
        );
    }

    #[test]
    fn smaller_image_never_upscaled() {
        assert_eq!(plan_resize(800, 600, 4000), ResizePlan::KeepOriginal);
        assert_eq!(plan_resize(3999, 3000, 4000), ResizePlan::KeepOriginal);
    }

    #[test]
    fn exact_target_is_scaled_to_same_size() {
        assert_eq!(
            plan_resize(4000, 3000, 4000),
            ResizePlan::Scale {
                width: 4000,
                height: 3000
            }
        );
    }

    #[test]
    fn panoramic_threshold_boundary() {
        // 2.39 → resized
        assert!(matches!(
            plan_resize(2390, 1000, 1000),
            ResizePlan::Scale { .. }
        ));
        // 2.40 → panorama (threshold is inclusive)
        assert_eq!(plan_resize(2400, 1000, 1000), ResizePlan::Panoramic);
        // 2.41 → panorama
        assert_eq!(plan_resize(2410, 1000, 1000), ResizePlan::Panoramic);
    }

    #[test]
    fn panoramic_applies_to_portrait_too() {
        assert_eq!(plan_resize(1000, 4000, 1000), ResizePlan::Panoramic);
    }

    #[test]
    fn panoramic_wins_over_no_upscale() {
        assert_eq!(plan_resize(500, 100, 4000), ResizePlan::Panoramic);
    }

    #[test]
    fn aspect_ratio_is_orientation_independent() {
        assert_eq!(aspect_ratio(4000, 2000), 2.0);
        assert_eq!(aspect_ratio(2000, 4000), 2.0);
        assert_eq!(aspect_ratio(0, 10), f64::INFINITY);
    }
}
