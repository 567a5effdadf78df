//! Raster preview of a drawing.
//!
//! Strokes every path of a [`Drawing`] with tiny-skia on a white page the
//! size of the document, so an operator can see what the plotter will draw
//! before committing to it.

use std::path::Path;

use kurbo::{BezPath, PathEl};

use crate::error::PlotError;
use crate::svg::Drawing;

/// Stroke width of the preview pen, in millimeters.
const PEN_WIDTH_MM: f32 = 0.3;

/// Convert a kurbo `BezPath` to a `tiny_skia::Path`.
fn kurbo_to_tinyskia(bezpath: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in bezpath.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Rasterize `drawing` at `px_per_mm` pixels per millimeter.
pub fn rasterize(drawing: &Drawing, px_per_mm: f32) -> Result<tiny_skia::Pixmap, PlotError> {
    let width = (drawing.width_mm as f32 * px_per_mm).ceil().max(1.0) as u32;
    let height = (drawing.height_mm as f32 * px_per_mm).ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        PlotError::InvalidConfig(format!("preview size {}x{} px is not drawable", width, height))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let mut paint = tiny_skia::Paint::default();
    paint.set_color(tiny_skia::Color::BLACK);
    paint.anti_alias = true;
    let stroke = tiny_skia::Stroke {
        width: PEN_WIDTH_MM,
        ..tiny_skia::Stroke::default()
    };
    let transform = tiny_skia::Transform::from_scale(px_per_mm, px_per_mm);

    for path in &drawing.paths {
        if let Some(sk_path) = kurbo_to_tinyskia(path) {
            pixmap.stroke_path(&sk_path, &paint, &stroke, transform, None);
        }
    }
    Ok(pixmap)
}

/// Encode a pixmap to PNG bytes.
fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixmap.data())?;
    drop(writer);
    Ok(buf)
}

/// Render `drawing` and write it as a PNG to `output_path`.
pub fn write_preview(drawing: &Drawing, px_per_mm: f32, output_path: &Path) -> Result<(), PlotError> {
    let pixmap = rasterize(drawing, px_per_mm)?;
    let bytes = encode_png(&pixmap).map_err(|e| PlotError::Io(std::io::Error::other(e)))?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}
