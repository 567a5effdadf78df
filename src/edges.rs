//! Edge detection: grayscale raster → binary edge mask.
//!
//! Two paths produce the mask. The accelerated one smooths the image and
//! runs Canny with hysteresis; the fallback convolves with 3x3 Sobel
//! kernels and takes the gradient magnitude. Which one runs is decided once
//! per process, see [`acceleration_available`].

use std::sync::OnceLock;

use image::{GrayImage, Luma};
use imageproc::contrast::{self, ThresholdType};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::sobel_gradients;
use imageproc::map::map_colors;

/// Environment variable that disables the accelerated path.
pub const NO_ACCEL_ENV: &str = "IMG2PLOT_NO_ACCEL";

/// Samples strictly above this become edge pixels.
const EDGE_THRESHOLD: u8 = 128;

/// Canny hysteresis thresholds, on the 0-255 scale of the source.
const CANNY_LOW: f32 = 100.0;
const CANNY_HIGH: f32 = 200.0;

/// Sigma of the pre-Canny blur (what a 3x3 Gaussian kernel implies).
const BLUR_SIGMA: f32 = 0.8;

/// Process-wide capability flag, set once and read-only afterwards.
static ACCELERATION: OnceLock<bool> = OnceLock::new();

/// Whether the accelerated (Canny) path is in use for this process.
///
/// Resolved on first call: enabled unless [`NO_ACCEL_ENV`] is set.
pub fn acceleration_available() -> bool {
    *ACCELERATION.get_or_init(|| {
        let enabled = std::env::var_os(NO_ACCEL_ENV).is_none();
        log::debug!("edge acceleration resolved from environment: {}", enabled);
        enabled
    })
}

/// Decide the capability explicitly at startup.
///
/// The first initialization wins; returns the value actually in effect,
/// which differs from `enabled` if the flag was already resolved.
pub fn init_acceleration(enabled: bool) -> bool {
    let effective = *ACCELERATION.get_or_init(|| enabled);
    if effective != enabled {
        log::warn!(
            "edge acceleration already resolved to {}, ignoring request for {}",
            effective,
            enabled
        );
    }
    effective
}

/// Produce a binary edge mask (0 or 255) with the same dimensions as `gray`.
///
/// A featureless image yields an all-zero mask.
pub fn detect(gray: &GrayImage, accelerated: bool) -> GrayImage {
    if gray.width() == 0 || gray.height() == 0 {
        return gray.clone();
    }
    if accelerated {
        let smoothed = gaussian_blur_f32(gray, BLUR_SIGMA);
        threshold(&canny(&smoothed, CANNY_LOW, CANNY_HIGH))
    } else {
        sobel_mask(gray)
    }
}

fn sobel_mask(gray: &GrayImage) -> GrayImage {
    // Saturating at 255 keeps every magnitude above the midpoint an edge.
    let magnitude = map_colors(&sobel_gradients(gray), |p| Luma([p.0[0].min(255) as u8]));
    threshold(&magnitude)
}

/// Binarize: any sample above the midpoint becomes 255, everything else 0.
pub fn threshold(gray: &GrayImage) -> GrayImage {
    contrast::threshold(gray, EDGE_THRESHOLD, ThresholdType::Binary)
}

/// Count of edge pixels in a mask.
pub fn edge_count(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p.0[0] > 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half black, right half white.
    fn step_image(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, _| if x < w / 2 { Luma([0]) } else { Luma([255]) })
    }

    #[test]
    fn featureless_image_has_no_edges() {
        let flat = GrayImage::from_pixel(32, 24, Luma([180]));
        assert_eq!(edge_count(&detect(&flat, false)), 0);
        assert_eq!(edge_count(&detect(&flat, true)), 0);
    }

    #[test]
    fn mask_keeps_dimensions() {
        let img = step_image(17, 9);
        assert_eq!(detect(&img, false).dimensions(), (17, 9));
        assert_eq!(detect(&img, true).dimensions(), (17, 9));
    }

    #[test]
    fn sobel_finds_vertical_step() {
        let mask = detect(&step_image(20, 10), false);
        // Edge pixels straddle the step at x = 9/10 and nowhere else.
        for y in 0..10 {
            assert_eq!(mask.get_pixel(10, y).0[0], 255);
            assert_eq!(mask.get_pixel(2, y).0[0], 0);
            assert_eq!(mask.get_pixel(17, y).0[0], 0);
        }
    }

    #[test]
    fn canny_finds_vertical_step() {
        let mask = detect(&step_image(20, 10), true);
        assert!(edge_count(&mask) > 0);
        assert!(mask.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn thresholding_binary_mask_is_noop() {
        let mask = detect(&step_image(20, 10), false);
        assert_eq!(threshold(&mask), mask);
        let once = threshold(&GrayImage::from_fn(16, 16, |x, y| Luma([(x * 16 + y) as u8])));
        assert_eq!(threshold(&once), once);
    }

    #[test]
    fn strong_gradients_saturate_to_edges() {
        // A black/white step has Sobel magnitude 1020, far beyond u8 range.
        let mask = detect(&step_image(8, 4), false);
        assert_eq!(mask.get_pixel(3, 1).0[0], 255);
        assert_eq!(mask.get_pixel(4, 1).0[0], 255);
        assert_eq!(edge_count(&mask), 8);
    }

    #[test]
    fn threshold_covers_every_level() {
        let ramp = GrayImage::from_fn(256, 1, |x, _| Luma([x as u8]));
        let out = threshold(&ramp);
        for x in 0..256 {
            let expected = if x > 128 { 255 } else { 0 };
            assert_eq!(out.get_pixel(x, 0).0[0], expected, "level {}", x);
        }
    }

    #[test]
    fn threshold_midpoint_is_exclusive() {
        let img = GrayImage::from_fn(2, 1, |x, _| Luma([128 + x as u8]));
        let out = threshold(&img);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 255);
    }
}
