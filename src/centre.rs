//! Centre computer (C4, §4.4): the pole of inaccessibility of a segment —
//! the cluster point whose distance to the beautified boundary is maximal,
//! i.e. the centre of the largest disc inscribed in the segment that still
//! touches a cluster point.

use crate::geometry::{point_to_polyline_distance, Point2};

/// Picks the cluster point farthest from `boundary`. Ties are broken by
/// lexicographic `(x, y)` order (§3 "Centre").
pub fn compute_centre(cluster: &[Point2], boundary: &[Point2]) -> Point2 {
    assert!(!cluster.is_empty(), "compute_centre requires a non-empty cluster");

    let mut best: Option<(Point2, f64)> = None;
    for &p in cluster {
        let d = point_to_polyline_distance(p, boundary);
        best = Some(match best {
            None => (p, d),
            Some((bp, bd)) => {
                if d > bd || (d == bd && (p.x, p.y) < (bp.x, bp.y)) {
                    (p, d)
                } else {
                    (bp, bd)
                }
            }
        });
    }
    best.expect("non-empty cluster checked above").0
}
