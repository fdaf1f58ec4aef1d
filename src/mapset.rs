//! MapSet: the ordered collection of per-segment Matryoshkas a track is
//! built from (§3 "MapSet", §9 "Curvature orientation invariant").
//!
//! Segment order is fixed at construction time and forced counter-clockwise
//! by the signed area of the seed centreline, rather than trusting whatever
//! order the external selector/segmentator happened to hand in.

use crate::beautify::{beautify_border, DEFAULT_BORDER_POINTS};
use crate::border::extract_boundary;
use crate::centre::compute_centre;
use crate::error::PlannerError;
use crate::geometry::Point2;
use crate::matryoshka::Matryoshka;

/// Ordered sequence of Matryoshkas, one per segment, in canonical
/// (counter-clockwise) segment order.
#[derive(Debug, Clone)]
pub struct MapSet {
    matryoshkas: Vec<Matryoshka>,
}

impl MapSet {
    /// Builds a MapSet from `G` segment clusters and their seed centres
    /// (C2 -> C3 -> C4 -> C5 per segment), reordering segments to be
    /// counter-clockwise if the seed centreline is found clockwise.
    pub fn build(
        clusters: &[Vec<Point2>],
        seeds: &[Point2],
        layers: usize,
        border_points: usize,
    ) -> Result<MapSet, PlannerError> {
        assert_eq!(
            clusters.len(),
            seeds.len(),
            "one seed centre is required per segment cluster"
        );

        let order = canonical_order(seeds);
        let mut matryoshkas = Vec::with_capacity(clusters.len());
        for &idx in &order {
            let boundary = extract_boundary(&clusters[idx], idx)?;
            let beautified = beautify_border(&boundary, seeds[idx], border_points);
            let centre = compute_centre(&clusters[idx], &beautified);
            matryoshkas.push(Matryoshka::build(&beautified, centre, layers));
        }
        Ok(MapSet { matryoshkas })
    }

    /// Convenience wrapper over [`MapSet::build`] using the default
    /// beautified-boundary length (§4.3).
    pub fn build_default(
        clusters: &[Vec<Point2>],
        seeds: &[Point2],
        layers: usize,
    ) -> Result<MapSet, PlannerError> {
        MapSet::build(clusters, seeds, layers, DEFAULT_BORDER_POINTS)
    }

    pub fn len(&self) -> usize {
        self.matryoshkas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matryoshkas.is_empty()
    }

    pub fn segment(&self, i: usize) -> &Matryoshka {
        &self.matryoshkas[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Matryoshka> {
        self.matryoshkas.iter()
    }

    /// Maps a full candidate `u` (one `(alpha, beta)` pair per segment,
    /// same canonical order as this MapSet) to physical points.
    pub fn map_all(&self, u: &[(f64, f64)]) -> Vec<Point2> {
        assert_eq!(u.len(), self.matryoshkas.len());
        self.matryoshkas
            .iter()
            .zip(u)
            .map(|(m, &(alpha, beta))| m.map(alpha, beta))
            .collect()
    }
}

/// Signed area (shoelace formula) of a closed polygon; positive for
/// counter-clockwise vertex order, negative for clockwise.
fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let sum: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    sum * 0.5
}

/// Indices `0..seeds.len()` in canonical (CCW) order: identity if `seeds`
/// is already counter-clockwise, reversed otherwise (§9).
fn canonical_order(seeds: &[Point2]) -> Vec<usize> {
    let n = seeds.len();
    let forward: Vec<usize> = (0..n).collect();
    if signed_area(seeds) < 0.0 {
        forward.into_iter().rev().collect()
    } else {
        forward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc_cluster(cx: f64, cy: f64, radius_cells: i64, step: f64) -> Vec<Point2> {
        let mut pts = Vec::new();
        for gx in -radius_cells..=radius_cells {
            for gy in -radius_cells..=radius_cells {
                let x = gx as f64 * step;
                let y = gy as f64 * step;
                if (x * x + y * y).sqrt() <= radius_cells as f64 * step {
                    pts.push(Point2::new(cx + x, cy + y));
                }
            }
        }
        pts
    }

    #[test]
    fn reverses_clockwise_seed_order() {
        // A clockwise square of seeds (NE, SE, SW, NW order visits them CW).
        let cw_seeds = vec![
            Point2::new(1.0, 1.0),
            Point2::new(1.0, -1.0),
            Point2::new(-1.0, -1.0),
            Point2::new(-1.0, 1.0),
        ];
        assert!(signed_area(&cw_seeds) < 0.0);
        let order = canonical_order(&cw_seeds);
        assert_eq!(order, vec![3, 2, 1, 0]);
    }

    #[test]
    fn keeps_counter_clockwise_seed_order() {
        let ccw_seeds = vec![
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
        ];
        assert!(signed_area(&ccw_seeds) > 0.0);
        let order = canonical_order(&ccw_seeds);
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn builds_one_matryoshka_per_segment() {
        let seeds = vec![Point2::new(0.0, 0.0), Point2::new(5.0, 0.0)];
        let clusters = vec![disc_cluster(0.0, 0.0, 8, 0.1), disc_cluster(5.0, 0.0, 8, 0.1)];
        let map_set = MapSet::build(&clusters, &seeds, 5, 64).expect("build should succeed");
        assert_eq!(map_set.len(), 2);
        for m in map_set.iter() {
            assert_eq!(m.layers(), 5);
        }
    }
}
