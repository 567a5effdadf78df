//! Fragment cleanup: stitch nearby ends, thin out points, scale up.

use kurbo::Point;

use crate::geom::{Line, LineKind};
use crate::tracer::Fragment;

/// End-to-start gaps shorter than this are bridged.
const STITCH_DISTANCE: f64 = 8.0;

/// Keep every n-th point.
const DECIMATION_STEP: usize = 8;

/// Turn raw tracer fragments into contour lines.
///
/// `scale` undoes the downsampling applied before tracing.
pub fn merge(fragments: Vec<Fragment>, scale: f64) -> Vec<Line> {
    let mut polylines: Vec<Vec<(u32, u32)>> = fragments.into_iter().map(|f| f.points).collect();
    stitch(&mut polylines);

    polylines
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| decimate(p))
        .filter(|p| p.len() >= 2)
        .map(|p| {
            let points = p
                .into_iter()
                .map(|(x, y)| Point::new(x as f64 * scale, y as f64 * scale))
                .collect();
            Line::new(LineKind::Contour, points)
        })
        .collect()
}

/// Single ordered pass over all pairs: when `a` ends within reach of where
/// `b` starts, `b` is appended to `a` and left empty.
///
/// The result depends on fragment order and a second pass could join more.
pub fn stitch(polylines: &mut [Vec<(u32, u32)>]) {
    for i in 0..polylines.len() {
        for j in 0..polylines.len() {
            if i == j {
                continue;
            }
            let (Some(&end), Some(&start)) = (polylines[i].last(), polylines[j].first()) else {
                continue;
            };
            if distance(end, start) < STITCH_DISTANCE {
                let tail = std::mem::take(&mut polylines[j]);
                polylines[i].extend(tail);
            }
        }
    }
}

/// Indices 0, 8, 16, ... of `points`.
pub fn decimate<T: Copy>(points: &[T]) -> Vec<T> {
    points.iter().step_by(DECIMATION_STEP).copied().collect()
}

fn distance(a: (u32, u32), b: (u32, u32)) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    dx.hypot(dy)
}
