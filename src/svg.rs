//! Mapping traced lines onto the physical canvas and writing SVG.
//!
//! Coordinates are in millimeters, rounded to 0.1 mm, with no `viewBox`:
//! user units in the document are the plotter's units.

use std::fmt::Write;

use kurbo::{BezPath, PathEl, Point};

use crate::config::Canvas;
use crate::error::PlotError;
use crate::geom::{max_extent, Line};

/// A finished plot: paths in canvas millimeters, in drawing order.
#[derive(Debug, Clone)]
pub struct Drawing {
    /// Document width (canvas offset + width).
    pub width_mm: f64,
    /// Document height (canvas offset + height).
    pub height_mm: f64,
    /// One `MoveTo` followed by `LineTo`s per path.
    pub paths: Vec<BezPath>,
}

/// Linear remap of `v` from `[in_min, in_max]` to `[out_min, out_max]`.
pub fn remap(v: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    out_min + (v - in_min) * (out_max - out_min) / (in_max - in_min)
}

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl Drawing {
    /// Fit `lines` onto `canvas`.
    ///
    /// The geometry frame runs from the origin to the largest x and y over
    /// all points; it is stretched onto the canvas rectangle.
    pub fn from_lines(lines: &[Line], canvas: &Canvas) -> Result<Self, PlotError> {
        let (width, height) = max_extent(lines).ok_or(PlotError::EmptyGeometry)?;
        if width <= 0.0 || height <= 0.0 {
            return Err(PlotError::DegenerateCanvas { width, height });
        }

        let map = |p: Point| {
            Point::new(
                round_tenth(remap(p.x, 0.0, width, canvas.offset_x_mm, canvas.extent_x())),
                round_tenth(remap(p.y, 0.0, height, canvas.offset_y_mm, canvas.extent_y())),
            )
        };

        let mut paths = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let [first, rest @ ..] = line.points.as_slice() else {
                return Err(PlotError::InternalInvariantViolation(format!(
                    "line {} has no points",
                    i
                )));
            };
            if rest.is_empty() {
                return Err(PlotError::InternalInvariantViolation(format!(
                    "line {} has a single point",
                    i
                )));
            }
            let mut path = BezPath::new();
            path.move_to(map(*first));
            for p in rest {
                path.line_to(map(*p));
            }
            paths.push(path);
        }

        Ok(Self {
            width_mm: canvas.extent_x(),
            height_mm: canvas.extent_y(),
            paths,
        })
    }

    /// Serialize as an SVG document with one stroked path per line.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" height="{:.1}mm" width="{:.1}mm" version="1.1">"#,
            self.height_mm, self.width_mm
        );
        for path in &self.paths {
            let _ = writeln!(
                out,
                r#"<path d="{}" stroke="black" stroke-width="1" fill="none" />"#,
                path_data(path)
            );
        }
        out.push_str("</svg>");
        out
    }

    /// Total number of vertices over all paths.
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(|p| p.elements().len()).sum()
    }
}

/// `M x y L x y ...` with one decimal.
fn path_data(path: &BezPath) -> String {
    let mut parts = Vec::with_capacity(path.elements().len());
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => parts.push(format!("M{:.1} {:.1}", p.x, p.y)),
            PathEl::LineTo(p) => parts.push(format!("L{:.1} {:.1}", p.x, p.y)),
            _ => {}
        }
    }
    parts.join(" ")
}
