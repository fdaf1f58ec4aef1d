//! Minimal collaborator implementations used to exercise the end-to-end
//! scenarios in `tests/scenarios.rs`. Not part of the library: these stand
//! in for the external selector/segmentator/interpolator/criterion this
//! crate treats as out of scope (spec.md §1).

use std::sync::Arc;

use matryoshka_planner::collaborators::{
    Criterion, DenseSample, Interpolator, Segmentator, SegmentatorMapContext, Selector,
};
use matryoshka_planner::{Collaborators, Config, CurvaturePenalizer, OptimizerDriver, Point2};

/// Installs the `env_logger` backend for the `log` facade so a test run's
/// `RUST_LOG` output (warnings from [`matryoshka_planner::logging`]) is
/// visible; harmless to call more than once across the test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Grid points on a regular lattice inside radius `radius` of `center`,
/// stepping by `step` (S1, S3).
pub fn disc_points(center: Point2, radius: f64, step: f64) -> Vec<Point2> {
    let n = (radius / step).ceil() as i64;
    let mut pts = Vec::new();
    for gx in -n..=n {
        for gy in -n..=n {
            let x = gx as f64 * step;
            let y = gy as f64 * step;
            if (x * x + y * y).sqrt() <= radius {
                pts.push(Point2::new(center.x + x, center.y + y));
            }
        }
    }
    pts
}

/// Grid points in an annulus (disc minus an inner disc of `inner_radius`)
/// (S2).
pub fn annulus_points(center: Point2, inner_radius: f64, outer_radius: f64, step: f64) -> Vec<Point2> {
    disc_points(center, outer_radius, step)
        .into_iter()
        .filter(|&p| p.distance_to(center) >= inner_radius)
        .collect()
}

/// A selector that ignores the centerline argument and returns fixed seed
/// centres supplied at construction, one per segment.
pub struct FixedSeedSelector(pub Vec<Point2>);

impl Selector for FixedSeedSelector {
    fn select(&self, _points: &[Point2], remain: usize) -> Vec<Point2> {
        assert_eq!(self.0.len(), remain, "fixed seed count must match `remain`");
        self.0.clone()
    }
}

/// Assigns every valid point to its nearest seed centre.
pub struct NearestSeedSegmentator;

impl Segmentator for NearestSeedSegmentator {
    fn segmentate(&self, points: &[Point2], group_centers: &[Point2]) -> Vec<Vec<Point2>> {
        let mut clusters = vec![Vec::new(); group_centers.len()];
        for &p in points {
            let (best_i, _) = group_centers
                .iter()
                .enumerate()
                .map(|(i, &c)| (i, p.distance_to(c)))
                .fold((0usize, f64::INFINITY), |best, cur| {
                    if cur.1 < best.1 {
                        cur
                    } else {
                        best
                    }
                });
            clusters[best_i].push(p);
        }
        clusters
    }

    fn map_context(&self) -> Option<SegmentatorMapContext> {
        None
    }
}

/// Passes the control points straight through as the dense sample sequence,
/// with no curvature information.
pub struct IdentityInterpolator;

impl Interpolator for IdentityInterpolator {
    fn interpolate(&self, points: &[Point2]) -> Vec<DenseSample> {
        points.iter().map(|&p| DenseSample::new(p)).collect()
    }
}

/// Like [`IdentityInterpolator`], but stamps a fixed curvature value onto
/// every sample, for exercising the penalizer's curvature-excess branch
/// (S5) through the full `evaluate` pipeline.
pub struct ConstantCurvatureInterpolator(pub f64);

impl Interpolator for ConstantCurvatureInterpolator {
    fn interpolate(&self, points: &[Point2]) -> Vec<DenseSample> {
        points
            .iter()
            .map(|&p| DenseSample::with_curvature(p, self.0))
            .collect()
    }
}

/// Sums the Euclidean distance between consecutive samples: a stand-in lap
/// time / path length criterion.
pub struct PerimeterCriterion;

impl Criterion for PerimeterCriterion {
    fn compute(&self, points: &[DenseSample]) -> f64 {
        if points.len() < 2 {
            return 0.0;
        }
        (0..points.len())
            .map(|i| points[i].point.distance_to(points[(i + 1) % points.len()].point))
            .sum()
    }
}

/// Builds a ready-to-run driver with the reference collaborators above and
/// explicit fixed seed centres (the scenario tests always know their
/// cluster layout up front).
pub fn build_driver_with_seeds(config: Config, seeds: Vec<Point2>) -> OptimizerDriver {
    let collaborators = Collaborators {
        selector: Box::new(FixedSeedSelector(seeds)),
        segmentator: Box::new(NearestSeedSegmentator),
        interpolator: Arc::new(IdentityInterpolator),
        penalizer: Arc::new(CurvaturePenalizer::new(config.k_max)),
        criterion: Arc::new(PerimeterCriterion),
    };
    OptimizerDriver::new(config, collaborators).expect("valid config")
}
