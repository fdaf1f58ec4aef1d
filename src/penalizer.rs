//! Curvature penalizer (§4.8): the one concrete [`Penalizer`] this crate
//! ships, reproducing the reference formula verbatim (feasibility gate
//! first, curvature-excess scoring second) with an `rstar` spatial index so
//! the feasibility check does not degrade to O(points * valid_points).

use std::sync::Mutex;

use rstar::{RTree, RTreeObject, AABB};

use crate::collaborators::{DenseSample, Penalizer, PenalizerInitContext};
use crate::geometry::Point2;

/// Default curvature bound (§4.8 "`k_max` defaults to 1.5").
pub const DEFAULT_K_MAX: f64 = 1.5;

#[derive(Debug, Clone, Copy)]
struct IndexedPoint(Point2);

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.0.x, self.0.y])
    }
}

/// Feasibility + curvature-bound penalizer (§4.8).
///
/// `init` builds the spatial index over the valid-area points supplied at
/// construction time; `penalize` never mutates the index, and only writes
/// the offending-points observer when called with `record_invalid = true`
/// (the driver's sequential finalisation recompute). Both are guarded by a
/// mutex so the type stays `Sync` and a single instance can be shared by
/// reference across worker threads for the rest of the run (§5
/// "Invalid-points observer").
pub struct CurvaturePenalizer {
    k_max: f64,
    index: Mutex<Option<RTree<IndexedPoint>>>,
    last_invalid: Mutex<Vec<Point2>>,
}

impl CurvaturePenalizer {
    pub fn new(k_max: f64) -> Self {
        CurvaturePenalizer {
            k_max,
            index: Mutex::new(None),
            last_invalid: Mutex::new(Vec::new()),
        }
    }
}

impl Default for CurvaturePenalizer {
    fn default() -> Self {
        CurvaturePenalizer::new(DEFAULT_K_MAX)
    }
}

impl Penalizer for CurvaturePenalizer {
    fn init(&self, ctx: &PenalizerInitContext) {
        let entries: Vec<IndexedPoint> = ctx.valid_points.iter().map(|&p| IndexedPoint(p)).collect();
        *self.index.lock().expect("penalizer index mutex poisoned") = Some(RTree::bulk_load(entries));
    }

    fn penalize(
        &self,
        points: &[DenseSample],
        valid_points: &[Point2],
        grid: (f64, f64),
        penalty_k: f64,
        _candidate: &[Point2],
        record_invalid: bool,
    ) -> f64 {
        let (grid_x, grid_y) = grid;
        let index = self.index.lock().expect("penalizer index mutex poisoned");

        let is_valid = |p: Point2| -> bool {
            match &*index {
                Some(tree) => {
                    let envelope = AABB::from_corners(
                        [p.x - grid_x, p.y - grid_y],
                        [p.x + grid_x, p.y + grid_y],
                    );
                    tree.locate_in_envelope_intersecting(&envelope)
                        .any(|v| (v.0.x - p.x).abs() < grid_x && (v.0.y - p.y).abs() < grid_y)
                }
                None => valid_points
                    .iter()
                    .any(|v| (v.x - p.x).abs() < grid_x && (v.y - p.y).abs() < grid_y),
            }
        };

        let invalid_points: Vec<Point2> = points
            .iter()
            .map(|s| s.point)
            .filter(|&p| !is_valid(p))
            .collect();

        // Only the sequential finalisation recompute records into the
        // observer; concurrent worker evaluations leave it untouched (§5).
        if record_invalid {
            if let Ok(mut observer) = self.last_invalid.lock() {
                *observer = invalid_points.clone();
            }
        }

        if !invalid_points.is_empty() {
            return invalid_points.len() as f64 * penalty_k * 10.0;
        }

        let kappa_excess: f64 = points
            .iter()
            .filter_map(|s| s.curvature)
            .map(|k| {
                if k > self.k_max {
                    k
                } else if k < -self.k_max {
                    -k
                } else {
                    0.0
                }
            })
            .sum();

        (kappa_excess / 100.0) * penalty_k * 10.0
    }

    fn last_invalid_points(&self) -> Vec<Point2> {
        self.last_invalid
            .lock()
            .expect("penalizer mutex poisoned")
            .clone()
    }
}
