//! Hatch shading: each pixel of a coarse grayscale image becomes a cell of
//! up to three strokes, darker pixels getting more of them.
//!
//! Strokes come in two families: horizontal strokes at a quarter (and for
//! the darkest cells also three quarters) of the cell height, and diagonals
//! from the top-right to the bottom-left corner. Neighboring strokes of a
//! family that meet end-to-start are fused into one long straight line.

use image::GrayImage;
use kurbo::Point;

use crate::geom::{Line, LineKind};

/// Pixels this bright or brighter get no strokes.
const LIGHT: u8 = 144;
/// Pixels brighter than this (and not light) get one horizontal stroke.
const MID: u8 = 64;
/// Pixels brighter than this (and not mid) also get a diagonal.
/// Anything at or below gets a second horizontal stroke as well.
const DARK: u8 = 16;

/// Generate hatch lines for `gray`, one cell of `cell` units per pixel.
///
/// Horizontal strokes come first, then diagonals.
pub fn hatch(gray: &GrayImage, cell: f64) -> Vec<Line> {
    let mut horizontal: Vec<Vec<Point>> = Vec::new();
    let mut diagonal: Vec<Vec<Point>> = Vec::new();
    let at = |i: u32| i as f64 * cell;

    for x0 in 0..gray.width() {
        for y0 in 0..gray.height() {
            let value = gray.get_pixel(x0, y0).0[0];
            if value >= LIGHT {
                continue;
            }
            let (left, right) = (at(x0), at(x0 + 1));
            let (top, bottom) = (at(y0), at(y0 + 1));
            let quarter = top + cell / 4.0;

            horizontal.push(vec![Point::new(left, quarter), Point::new(right, quarter)]);
            if value > MID {
                continue;
            }
            if value <= DARK {
                let three_quarters = top + cell / 2.0 + cell / 4.0;
                horizontal.push(vec![
                    Point::new(left, three_quarters),
                    Point::new(right, three_quarters),
                ]);
            }
            diagonal.push(vec![Point::new(right, top), Point::new(left, bottom)]);
        }
    }

    [horizontal, diagonal]
        .into_iter()
        .flat_map(|mut family| {
            chain(&mut family);
            family
                .into_iter()
                .filter_map(|p| Some(vec![*p.first()?, *p.last()?]))
                .map(|points| Line::new(LineKind::Hatch, points))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Fuse polylines meeting end-to-start, in one ordered pass. Absorbed
/// polylines are left empty.
fn chain(family: &mut [Vec<Point>]) {
    for i in 0..family.len() {
        for j in 0..family.len() {
            if i == j {
                continue;
            }
            let (Some(&end), Some(&start)) = (family[i].last(), family[j].first()) else {
                continue;
            };
            if end == start {
                let absorbed = std::mem::take(&mut family[j]);
                family[i].extend_from_slice(&absorbed[1..]);
            }
        }
    }
    let before = family.len();
    let fused = family.iter().filter(|p| !p.is_empty()).count();
    log::trace!("hatch: fused {} strokes into {}", before, fused);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn single(value: u8) -> Vec<Line> {
        hatch(&GrayImage::from_pixel(1, 1, Luma([value])), 16.0)
    }

    #[test]
    fn light_bucket_is_blank() {
        assert!(single(144).is_empty());
        assert!(single(145).is_empty());
        assert!(single(255).is_empty());
    }

    #[test]
    fn light_boundary_starts_at_144() {
        let img = GrayImage::from_fn(2, 1, |x, _| Luma([143 + x as u8]));
        let lines = hatch(&img, 16.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].points, vec![Point::new(0.0, 4.0), Point::new(16.0, 4.0)]);
    }

    #[test]
    fn first_shade_is_one_horizontal() {
        let lines = single(143);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].points, vec![Point::new(0.0, 4.0), Point::new(16.0, 4.0)]);
        assert_eq!(single(65).len(), 1);
    }

    #[test]
    fn mid_shade_adds_diagonal() {
        let lines = single(64);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].points, vec![Point::new(16.0, 0.0), Point::new(0.0, 16.0)]);
        assert_eq!(single(17).len(), 2);
    }

    #[test]
    fn darkest_bucket_is_full_set() {
        let lines = single(16);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].points, vec![Point::new(0.0, 4.0), Point::new(16.0, 4.0)]);
        assert_eq!(lines[1].points, vec![Point::new(0.0, 12.0), Point::new(16.0, 12.0)]);
        assert_eq!(lines[2].points, vec![Point::new(16.0, 0.0), Point::new(0.0, 16.0)]);
        assert!(lines.iter().all(|l| l.kind == LineKind::Hatch));
        assert_eq!(single(0).len(), 3);
    }

    #[test]
    fn row_of_shade_fuses_into_one_line() {
        let lines = hatch(&GrayImage::from_pixel(5, 1, Luma([100])), 10.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].points, vec![Point::new(0.0, 2.5), Point::new(50.0, 2.5)]);
    }

    #[test]
    fn diagonals_fuse_across_cells() {
        // Cell (1,0) ends at (10,10), where cell (0,1) starts.
        let img = GrayImage::from_fn(2, 2, |x, y| if x + y == 1 { Luma([40]) } else { Luma([255]) });
        let lines = hatch(&img, 10.0);
        let diagonals: Vec<&Line> = lines
            .iter()
            .filter(|l| l.points[0].x > l.points[1].x)
            .collect();
        assert_eq!(diagonals.len(), 1);
        assert_eq!(diagonals[0].points, vec![Point::new(20.0, 0.0), Point::new(0.0, 20.0)]);
    }

    #[test]
    fn white_image_has_no_hatching() {
        assert!(hatch(&GrayImage::from_pixel(8, 8, Luma([250])), 4.0).is_empty());
    }
}
