//! Border extractor (C2): recovers the ordered outer boundary of a segment
//! cluster via a Moore-neighbourhood walk (§4.2, the reference algorithm
//! fixed by this spec since the original `groupsBorderObtain` does not
//! expose its implementation).

use std::collections::{HashMap, HashSet};

use crate::error::DegenerateSegmentError;
use crate::geometry::{grid_cell_size, Point2};

type GridCoord = (i64, i64);

/// 8-connected neighbour offsets, in a fixed cyclic (counter-clockwise)
/// order. The walk only relies on the order being a consistent rotation,
/// not on the compass labels.
const OFFSETS: [(i64, i64); 8] = [
    (1, 0),   // E
    (1, 1),   // NE
    (0, 1),   // N
    (-1, 1),  // NW
    (-1, 0),  // W
    (-1, -1), // SW
    (0, -1),  // S
    (1, -1),  // SE
];

const FOUR_NEIGHBOURS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

fn quantize(p: Point2, step: f64) -> GridCoord {
    ((p.x / step).round() as i64, (p.y / step).round() as i64)
}

/// Extracts the ordered closed boundary polyline of `cluster` (a segment's
/// interior point cloud). `segment` is only used to label errors.
pub fn extract_boundary(
    cluster: &[Point2],
    segment: usize,
) -> Result<Vec<Point2>, DegenerateSegmentError> {
    if cluster.is_empty() {
        return Err(DegenerateSegmentError::EmptyCluster { segment });
    }

    let step = grid_cell_size(cluster);

    // Map grid coordinate -> a representative physical point (first wins).
    let mut by_coord: HashMap<GridCoord, Point2> = HashMap::with_capacity(cluster.len());
    for &p in cluster {
        by_coord.entry(quantize(p, step)).or_insert(p);
    }
    let occupied: HashSet<GridCoord> = by_coord.keys().copied().collect();

    // Step 2: mark boundary cells (4-neighbour test).
    let boundary: HashSet<GridCoord> = occupied
        .iter()
        .copied()
        .filter(|&(gx, gy)| {
            FOUR_NEIGHBOURS
                .iter()
                .any(|(dx, dy)| !occupied.contains(&(gx + dx, gy + dy)))
        })
        .collect();

    if boundary.len() < 3 {
        return Err(DegenerateSegmentError::TooFewBoundaryPoints {
            segment,
            found: boundary.len(),
        });
    }

    // Step 3: trace, starting from the lexicographically smallest boundary
    // point, via a Moore-neighbourhood walk.
    let start = *boundary
        .iter()
        .min_by_key(|&&(gx, gy)| (gx, gy))
        .expect("non-empty boundary checked above");

    let mut path = vec![start];
    let mut cur = start;
    // Initial backtrack direction: pretend we arrived from the "W" slot so
    // the first scan starts immediately clockwise of it.
    let mut backtrack_idx = OFFSETS
        .iter()
        .position(|&o| o == (-1, 0))
        .expect("W present in OFFSETS");

    let max_steps = boundary.len() * 2 + 2;
    let mut closed = false;

    for _ in 0..max_steps {
        let mut found = None;
        for step_i in 1..=8 {
            let dir_idx = (backtrack_idx + step_i) % 8;
            let (dx, dy) = OFFSETS[dir_idx];
            let candidate = (cur.0 + dx, cur.1 + dy);
            if boundary.contains(&candidate) {
                found = Some((dir_idx, candidate));
                break;
            }
        }

        let (dir_idx, next) = match found {
            Some(v) => v,
            None => break,
        };

        if next == start {
            closed = true;
            break;
        }

        path.push(next);
        backtrack_idx = (dir_idx + 4) % 8;
        cur = next;
    }

    if !closed || path.len() < 3 {
        return Err(DegenerateSegmentError::TraversalDidNotClose { segment });
    }

    Ok(path
        .into_iter()
        .map(|coord| by_coord[&coord])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc_cluster(radius_cells: i64, step: f64) -> Vec<Point2> {
        let mut pts = Vec::new();
        for gx in -radius_cells..=radius_cells {
            for gy in -radius_cells..=radius_cells {
                let x = gx as f64 * step;
                let y = gy as f64 * step;
                if (x * x + y * y).sqrt() <= radius_cells as f64 * step {
                    pts.push(Point2::new(x, y));
                }
            }
        }
        pts
    }

    #[test]
    fn extracts_closed_boundary_from_disc() {
        let cluster = disc_cluster(10, 0.1);
        let boundary = extract_boundary(&cluster, 0).expect("should extract");
        assert!(boundary.len() >= 3);
        // Every boundary point must belong to the original cluster.
        for p in &boundary {
            assert!(cluster.iter().any(|c| c.distance_to(*p) < 1e-9));
        }
    }

    #[test]
    fn square_cluster_boundary_is_its_perimeter() {
        let mut pts = Vec::new();
        for gx in 0..6 {
            for gy in 0..6 {
                pts.push(Point2::new(gx as f64, gy as f64));
            }
        }
        let boundary = extract_boundary(&pts, 0).expect("square should trace");
        // The 6x6 grid's boundary ring has 6*4 - 4 = 20 cells.
        assert_eq!(boundary.len(), 20);
    }

    #[test]
    fn too_few_points_is_degenerate() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let err = extract_boundary(&pts, 3).unwrap_err();
        assert!(matches!(
            err,
            DegenerateSegmentError::TooFewBoundaryPoints { segment: 3, .. }
        ));
    }

    #[test]
    fn empty_cluster_is_degenerate() {
        let err = extract_boundary(&[], 2).unwrap_err();
        assert_eq!(err, DegenerateSegmentError::EmptyCluster { segment: 2 });
    }
}
