//! Shared geometry types.

use kurbo::Point;

/// Where a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Traced from the edge mask.
    Contour,
    /// Synthesized shading stroke.
    Hatch,
}

/// An open polyline the plotter draws in one pen-down stroke.
///
/// Built by the pipeline with at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub kind: LineKind,
    pub points: Vec<Point>,
}

impl Line {
    pub fn new(kind: LineKind, points: Vec<Point>) -> Self {
        Self { kind, points }
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Flip drawing direction.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Pen-down length.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

/// Total pen-down distance over `lines`.
pub fn pen_down_distance(lines: &[Line]) -> f64 {
    lines.iter().map(Line::length).sum()
}

/// Pen-up distance when drawing `lines` in order.
pub fn travel_distance(lines: &[Line]) -> f64 {
    lines
        .windows(2)
        .filter_map(|w| Some(w[0].last()?.distance(w[1].first()?)))
        .sum()
}

/// Largest x and y over all points, or `None` if there are no points.
pub fn max_extent(lines: &[Line]) -> Option<(f64, f64)> {
    let mut points = lines.iter().flat_map(|l| l.points.iter());
    let first = points.next()?;
    Some(points.fold((first.x, first.y), |(mx, my), p| (mx.max(p.x), my.max(p.y))))
}
