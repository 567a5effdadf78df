//! img2plot: raster photograph → plotter-ready line drawing.
//!
//! Traces edge contours and synthesizes cross-hatch shading from an image,
//! orders the strokes to keep pen-up travel short, and maps them onto a
//! physical canvas as an SVG document for a G-code compiler.
//!
//! # Example
//!
//! ```no_run
//! use img2plot::{convert, PlotConfig};
//!
//! let image = image::open("portrait.png").expect("decodable image");
//! let result = convert(&image, &PlotConfig::default())?;
//! std::fs::write("portrait.svg", result.drawing.to_svg())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod bitmap;
mod config;
mod geom;

pub mod edges;
pub mod error;
pub mod hatch;
pub mod job;
pub mod merge;
pub mod order;
pub mod render;
pub mod svg;
pub mod tracer;

// Re-export kurbo so downstream users get the same version
// used by `Line::points` and `Drawing::paths`.
pub use kurbo;

pub use config::{Canvas, PlotConfig};
pub use error::PlotError;
pub use geom::{pen_down_distance, travel_distance, Line, LineKind};
pub use svg::Drawing;

use std::time::Instant;

use image::{DynamicImage, GrayImage};

use tracer::Orientation;

/// Lines produced by [`vectorize`], before mapping onto the canvas.
#[derive(Debug, Clone)]
pub struct Vectorized {
    /// Ordered lines, repetitions included.
    pub lines: Vec<Line>,
    /// Distinct contour lines in one repetition.
    pub contours: usize,
    /// Distinct hatch lines in one repetition.
    pub hatches: usize,
}

/// The result of a full conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    pub drawing: Drawing,
    pub contours: usize,
    pub hatches: usize,
    /// Pen-up distance between consecutive lines, in source units.
    pub travel: f64,
    /// Distance drawn with the pen down, in source units.
    pub pen_down: f64,
}

/// Full pipeline: decoded image → drawing document.
pub fn convert(image: &DynamicImage, config: &PlotConfig) -> Result<ConvertResult, PlotError> {
    let vectorized = vectorize(image, config)?;
    let drawing = Drawing::from_lines(&vectorized.lines, &config.canvas)?;
    Ok(ConvertResult {
        travel: travel_distance(&vectorized.lines),
        pen_down: pen_down_distance(&vectorized.lines),
        drawing,
        contours: vectorized.contours,
        hatches: vectorized.hatches,
    })
}

/// Trace and hatch `image` into ordered lines in source units.
///
/// Contours (if requested) come first, then hatching, each pass repeated
/// as configured. Fails with [`PlotError::EmptyGeometry`] when the
/// requested passes produce nothing.
pub fn vectorize(image: &DynamicImage, config: &PlotConfig) -> Result<Vectorized, PlotError> {
    config.validate()?;
    let t_start = Instant::now();

    // ── Prepare ───────────────────────────────────────────
    let gray = bitmap::prepare(image);
    log::debug!("prepared {}x{} grayscale", gray.width(), gray.height());

    let mut lines = Vec::new();

    // ── Contours ──────────────────────────────────────────
    let mut contours = 0;
    if config.contours_enabled() {
        let small = bitmap::downsample(&gray, config.resolution, config.draw_contours);
        let traced = order::sequence(trace_contours(
            &small,
            config.draw_contours,
            edges::acceleration_available(),
        ));
        contours = traced.len();
        for _ in 0..config.repeat_contours {
            lines.extend(traced.iter().cloned());
        }
    }

    // ── Hatching ──────────────────────────────────────────
    let mut hatches = 0;
    if config.hatch_enabled() {
        let small = bitmap::downsample(&gray, config.resolution, config.draw_hatch);
        let strokes = order::sequence(hatch::hatch(&small, config.draw_hatch));
        log::debug!(
            "hatch: {}x{} cells of {} units -> {} strokes",
            small.width(),
            small.height(),
            config.draw_hatch,
            strokes.len()
        );
        hatches = strokes.len();
        for _ in 0..config.repeat_hatch {
            lines.extend(strokes.iter().cloned());
        }
    }

    log::info!(
        "vectorized {} contours + {} hatch strokes -> {} lines ({}ms)",
        contours,
        hatches,
        lines.len(),
        t_start.elapsed().as_millis()
    );

    if lines.is_empty() {
        return Err(PlotError::EmptyGeometry);
    }
    Ok(Vectorized {
        lines,
        contours,
        hatches,
    })
}

/// Edge-detect, trace in both orientations, then stitch, decimate and scale.
///
/// `gray` is the already downsampled contour-pass image; `scale` maps its
/// pixels back to source units.
pub fn trace_contours(gray: &GrayImage, scale: f64, accelerated: bool) -> Vec<Line> {
    let mask = edges::detect(gray, accelerated);
    let edge_pixels = edges::edge_count(&mask);

    let mut fragments = tracer::trace(&mask, Orientation::Native);
    let native = fragments.len();
    fragments.extend(tracer::trace(&mask, Orientation::Transposed));
    let transposed = fragments.len() - native;

    let contours = merge::merge(fragments, scale);
    log::debug!(
        "contours: {} edge px ({}), {} native + {} transposed fragments -> {} contours",
        edge_pixels,
        if accelerated { "canny" } else { "sobel" },
        native,
        transposed,
        contours.len()
    );
    contours
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// White page with a black filled square in the middle.
    fn square(size: u32) -> DynamicImage {
        let lo = size / 4;
        let hi = size - size / 4;
        DynamicImage::ImageLuma8(GrayImage::from_fn(size, size, |x, y| {
            if (lo..hi).contains(&x) && (lo..hi).contains(&y) {
                Luma([0])
            } else {
                Luma([255])
            }
        }))
    }

    fn contour_config() -> PlotConfig {
        PlotConfig {
            resolution: 128,
            draw_contours: 1.0,
            repeat_contours: 1,
            ..PlotConfig::default()
        }
    }

    #[test]
    fn featureless_image_is_empty_geometry() {
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 64, Luma([200])));
        let err = convert(&blank, &contour_config()).unwrap_err();
        assert!(matches!(err, PlotError::EmptyGeometry));
    }

    #[test]
    fn white_image_has_no_hatching() {
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 64, Luma([255])));
        let config = PlotConfig {
            draw_contours: 0.0,
            draw_hatch: 8.0,
            repeat_hatch: 1,
            ..contour_config()
        };
        assert!(matches!(vectorize(&blank, &config), Err(PlotError::EmptyGeometry)));
    }

    #[test]
    fn square_traces_to_contours() {
        let gray = square(128).into_luma8();
        for accelerated in [false, true] {
            let contours = trace_contours(&gray, 1.0, accelerated);
            assert!(!contours.is_empty());
            assert!(contours.iter().all(|l| l.points.len() >= 2));
            for p in contours.iter().flat_map(|l| l.points.iter()) {
                assert!(p.x >= 24.0 && p.x <= 104.0, "x = {}", p.x);
                assert!(p.y >= 24.0 && p.y <= 104.0, "y = {}", p.y);
            }
        }
    }

    #[test]
    fn repeats_multiply_lines() {
        let image = square(128);
        let once = vectorize(&image, &contour_config()).unwrap();
        let thrice = vectorize(
            &image,
            &PlotConfig {
                repeat_contours: 3,
                ..contour_config()
            },
        )
        .unwrap();
        assert_eq!(once.lines.len(), once.contours);
        assert_eq!(thrice.lines.len(), 3 * once.lines.len());
        let (ink_once, ink_thrice) = (pen_down_distance(&once.lines), pen_down_distance(&thrice.lines));
        assert!(ink_once > 0.0);
        assert!((ink_thrice - 3.0 * ink_once).abs() < 1e-6);
    }

    #[test]
    fn hatch_follows_contours() {
        let config = PlotConfig {
            draw_hatch: 8.0,
            repeat_hatch: 2,
            ..contour_config()
        };
        let result = vectorize(&square(128), &config).unwrap();
        assert!(result.hatches > 0);
        let tail = &result.lines[result.lines.len() - result.hatches..];
        assert!(tail.iter().all(|l| l.kind == LineKind::Hatch));
        assert_eq!(result.lines.len(), result.contours + 2 * result.hatches);
        assert_eq!(result.lines[0].kind, LineKind::Contour);
    }

    #[test]
    fn drawing_fits_canvas() {
        let result = convert(&square(128), &contour_config()).unwrap();
        let canvas = Canvas::default();
        assert_eq!(result.drawing.width_mm, canvas.extent_x());
        assert_eq!(result.drawing.paths.len(), result.contours);
        assert!(result.pen_down > 0.0);
        assert!(result.travel >= 0.0);
        for path in &result.drawing.paths {
            let bbox = kurbo::Shape::bounding_box(path);
            assert!(bbox.x0 >= canvas.offset_x_mm && bbox.x1 <= canvas.extent_x());
            assert!(bbox.y0 >= canvas.offset_y_mm && bbox.y1 <= canvas.extent_y());
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_work() {
        let config = PlotConfig {
            resolution: 0,
            ..PlotConfig::default()
        };
        assert!(matches!(vectorize(&square(16), &config), Err(PlotError::InvalidConfig(_))));
    }
}
