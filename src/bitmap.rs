use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use imageproc::contrast::stretch_contrast;
use imageproc::stats::histogram;

/// Percentage of the histogram clipped from each end by [`autocontrast`].
const AUTOCONTRAST_CUTOFF: f64 = 10.0;

/// Convert a decoded image to the 8-bit grayscale the pipeline works on.
///
/// Transparent regions are composited over white first, so a logo on a
/// transparent background traces like the same logo on paper. The result
/// is auto-contrasted.
pub fn prepare(image: &DynamicImage) -> GrayImage {
    let gray = if image.color().has_alpha() {
        let flat = flatten_on_white(&image.to_rgba8());
        DynamicImage::ImageRgba8(flat).into_luma8()
    } else {
        image.to_luma8()
    };
    autocontrast(&gray, AUTOCONTRAST_CUTOFF)
}

fn flatten_on_white(rgba: &RgbaImage) -> RgbaImage {
    let mut page = RgbaImage::from_pixel(rgba.width(), rgba.height(), Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut page, rgba, 0, 0);
    page
}

/// Stretch the histogram so the darkest `cutoff`% of pixels become 0 and
/// the lightest `cutoff`% become 255. Flat images are returned unchanged.
pub fn autocontrast(gray: &GrayImage, cutoff: f64) -> GrayImage {
    let bins = histogram(gray).channels[0];
    let total: u64 = bins.iter().map(|&count| u64::from(count)).sum();
    if total == 0 {
        return gray.clone();
    }
    let cut = (total as f64 * cutoff / 100.0) as u64;

    let low = clipped_bound(bins.iter().enumerate(), cut);
    let high = clipped_bound(bins.iter().enumerate().rev(), cut);
    let (Some(low), Some(high)) = (low, high) else {
        return gray.clone();
    };
    if high <= low {
        return gray.clone();
    }
    stretch_contrast(gray, low, high, 0, 255)
}

/// Walk the histogram from one end, dropping `cut` pixels, and return the
/// first level that still has pixels left.
fn clipped_bound<'a>(bins: impl Iterator<Item = (usize, &'a u32)>, cut: u64) -> Option<u8> {
    let mut remaining = cut;
    for (level, &count) in bins {
        let count = u64::from(count);
        if count > remaining {
            return u8::try_from(level).ok();
        }
        remaining -= count;
    }
    None
}

/// Resize so the longest edge is `resolution / factor` pixels (at least 1),
/// keeping the aspect ratio.
pub fn downsample(gray: &GrayImage, resolution: u32, factor: f64) -> GrayImage {
    let (w, h) = gray.dimensions();
    let (new_w, new_h) = target_size(w, h, resolution, factor);
    if (new_w, new_h) == (w, h) {
        return gray.clone();
    }
    imageops::resize(gray, new_w, new_h, FilterType::CatmullRom)
}

fn target_size(w: u32, h: u32, resolution: u32, factor: f64) -> (u32, u32) {
    let longest = (resolution as f64 / factor).max(1.0);
    let (w, h) = (w.max(1) as f64, h.max(1) as f64);
    let (new_w, new_h) = if w >= h {
        (longest, longest * h / w)
    } else {
        (longest * w / h, longest)
    };
    ((new_w as u32).max(1), (new_h as u32).max(1))
}
