//! Greedy nearest-neighbor ordering to cut pen-up travel.

use crate::geom::Line;

/// Order `lines` so each one starts as close as possible to where the
/// previous one ended.
///
/// The first line stays first. Every following pick is the remaining line
/// with the nearest start or end point; lines picked by their end are
/// reversed. Ties go to the earlier line, and a start beats an end at the
/// same distance. O(n²), not a shortest-route solver.
pub fn sequence(lines: Vec<Line>) -> Vec<Line> {
    let mut remaining = lines;
    if remaining.is_empty() {
        return remaining;
    }
    let mut ordered = Vec::with_capacity(remaining.len());
    ordered.push(remaining.remove(0));

    while !remaining.is_empty() {
        let Some(cursor) = ordered.last().and_then(Line::last) else {
            break;
        };
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        let mut reverse = false;

        for (i, line) in remaining.iter().enumerate() {
            let (Some(start), Some(end)) = (line.first(), line.last()) else {
                continue;
            };
            let d = start.distance(cursor);
            if d < best_distance {
                (best, best_distance, reverse) = (i, d, false);
            }
            let d = end.distance(cursor);
            if d < best_distance {
                (best, best_distance, reverse) = (i, d, true);
            }
        }

        let mut next = remaining.remove(best);
        if reverse {
            next.reverse();
        }
        ordered.push(next);
    }

    // Lines without points (never produced by the pipeline) keep their
    // relative order at the end.
    ordered.append(&mut remaining);
    ordered
}
