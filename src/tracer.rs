//! Contour tracing: binary edge mask → open polyline fragments.
//!
//! Each row of the mask is reduced to runs of edge pixels. A run is joined
//! to the nearest run start in the previous row when that is at most
//! [`JOIN_DISTANCE`] columns away, so a fragment follows an edge downwards
//! with one point per row. Edges that run mostly horizontally are caught by
//! tracing a second time on the transposed mask.

use std::collections::HashMap;

use image::GrayImage;

/// Maximum column distance between run starts in consecutive rows
/// for them to belong to the same fragment.
const JOIN_DISTANCE: u32 = 3;

/// Run starts this far apart or more are never considered neighbors.
const SEARCH_LIMIT: u32 = 100;

/// Fragments that stop growing with fewer points than this are noise.
const MIN_FRAGMENT_POINTS: usize = 4;

/// Which way the mask is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Rows of the mask as given.
    Native,
    /// Mask rotated 90° clockwise and mirrored (a transpose); points are
    /// mapped back into the native frame.
    Transposed,
}

/// A maximal horizontal span of edge pixels in one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: u32,
    pub len: u32,
}

/// A contour under construction: one point per row, growing at the tail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub points: Vec<(u32, u32)>,
}

impl Fragment {
    fn start(x: u32, y: u32) -> Self {
        Self { points: vec![(x, y)] }
    }

    fn tail_row(&self) -> u32 {
        self.points.last().map_or(0, |p| p.1)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Trace one pass over `mask` in the given orientation.
pub fn trace(mask: &GrayImage, orientation: Orientation) -> Vec<Fragment> {
    match orientation {
        Orientation::Native => connect(&extract_runs(mask)),
        Orientation::Transposed => {
            let turned = image::imageops::flip_horizontal(&image::imageops::rotate90(mask));
            let mut fragments = connect(&extract_runs(&turned));
            for fragment in &mut fragments {
                for p in &mut fragment.points {
                    *p = (p.1, p.0);
                }
            }
            fragments
        }
    }
}

/// Reduce every row but the last to its runs of edge pixels (non-zero samples).
pub fn extract_runs(mask: &GrayImage) -> Vec<Vec<Run>> {
    let (w, h) = mask.dimensions();
    let mut rows = Vec::with_capacity(h.saturating_sub(1) as usize);
    for y in 0..h.saturating_sub(1) {
        let mut row: Vec<Run> = Vec::new();
        for x in 0..w {
            if mask.get_pixel(x, y).0[0] == 0 {
                continue;
            }
            match row.last_mut() {
                Some(run) if run.start + run.len == x => run.len += 1,
                _ => row.push(Run { start: x, len: 1 }),
            }
        }
        rows.push(row);
    }
    rows
}

/// Join runs row by row into fragments.
pub fn connect(rows: &[Vec<Run>]) -> Vec<Fragment> {
    let mut active: Vec<Fragment> = Vec::new();
    let mut finished: Vec<Fragment> = Vec::new();
    let mut misses = 0usize;

    for (y, row) in rows.iter().enumerate() {
        let y = y as u32;
        if y == 0 {
            active.extend(row.iter().map(|run| Fragment::start(run.start, 0)));
            continue;
        }

        // Tail x → index into `active`, for fragments that reached row y-1.
        let tails: HashMap<u32, usize> = active
            .iter()
            .enumerate()
            .filter(|(_, f)| f.tail_row() == y - 1)
            .filter_map(|(i, f)| f.points.last().map(|p| (p.0, i)))
            .collect();
        let previous = &rows[y as usize - 1];

        for run in row {
            let x = run.start;
            let Some(x0) = nearest_start(previous, x) else {
                active.push(Fragment::start(x, y));
                continue;
            };
            if x0.abs_diff(x) > JOIN_DISTANCE {
                active.push(Fragment::start(x, y));
                continue;
            }
            match tails.get(&x0) {
                Some(&i) if active[i].tail_row() == y - 1 => active[i].points.push((x, y)),
                _ => {
                    // The predecessor was already extended by a nearer run
                    // in this row (or pruned).
                    misses += 1;
                    active.push(Fragment::start(x, y));
                }
            }
        }

        prune(&mut active, &mut finished, y);
    }

    if misses > 0 {
        log::debug!("tracer: {} tail lookups missed, started new fragments", misses);
    }
    finished.append(&mut active);
    finished
}

/// Run start in `previous` closest to `x`, if any is within the search limit.
/// Ties keep the leftmost candidate.
fn nearest_start(previous: &[Run], x: u32) -> Option<u32> {
    let mut best: Option<(u32, u32)> = None;
    for run in previous {
        let d = run.start.abs_diff(x);
        if d < best.map_or(SEARCH_LIMIT, |b| b.1) {
            best = Some((run.start, d));
        }
    }
    best.map(|b| b.0)
}

/// Retire fragments more than one row behind `y`: long ones are kept,
/// short ones are dropped as noise.
fn prune(active: &mut Vec<Fragment>, finished: &mut Vec<Fragment>, y: u32) {
    let mut i = 0;
    while i < active.len() {
        if active[i].tail_row() + 1 < y {
            let fragment = active.remove(i);
            if fragment.len() >= MIN_FRAGMENT_POINTS {
                finished.push(fragment);
            }
        } else {
            i += 1;
        }
    }
}
