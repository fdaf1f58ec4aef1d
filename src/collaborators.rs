//! Capability interfaces for the external collaborators this crate discovers
//! by configuration rather than implements (§1 "Out of scope", §6, §9
//! "Dynamic module-typed collaborators -> capability interfaces").
//!
//! Each capability is a trait with one primary method plus a typed options
//! record in place of the reference source's free-form keyword splatting
//! (§9 "Keyword-argument splatting -> explicit option structs"). Minimal
//! testable implementations live under `tests/common` and exercise C1-C8
//! end to end.

use crate::geometry::Point2;

/// Picks `remain` seed centres out of a centerline (§6 `selector`).
pub trait Selector {
    fn select(&self, points: &[Point2], remain: usize) -> Vec<Point2>;
}

/// Optional grid-shaped view of the valid-area map a [`Segmentator`] was
/// built from, exposed so a [`Penalizer`] can use the same discretisation
/// (§6 "segmentator (map context) readable fields").
#[derive(Debug, Clone)]
pub struct SegmentatorMapContext {
    pub map: Vec<Vec<bool>>,
    pub map_origin: Point2,
    pub map_grid: (f64, f64),
    pub map_last: Point2,
}

/// Splits a valid-point cloud into `group_centers.len()` clusters, one per
/// segment (§6 `segmentator`).
pub trait Segmentator {
    fn segmentate(&self, points: &[Point2], group_centers: &[Point2]) -> Vec<Vec<Point2>>;

    /// Readable fields a penalizer can reuse; `None` if this segmentator
    /// does not maintain a grid-shaped representation.
    fn map_context(&self) -> Option<SegmentatorMapContext> {
        None
    }
}

/// A dense point on an interpolated path. `curvature` is populated when the
/// interpolator can provide it; the penalizer's curvature-excess branch
/// (§4.8) only engages when it is `Some`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenseSample {
    pub point: Point2,
    pub curvature: Option<f64>,
}

impl DenseSample {
    pub fn new(point: Point2) -> Self {
        DenseSample {
            point,
            curvature: None,
        }
    }

    pub fn with_curvature(point: Point2, curvature: f64) -> Self {
        DenseSample {
            point,
            curvature: Some(curvature),
        }
    }
}

/// Turns the ordered per-segment control points into a dense closed curve
/// (§6 `interpolator`). `Send + Sync` so a single instance can be shared by
/// reference across the optimiser's worker pool (§5).
pub trait Interpolator: Send + Sync {
    fn interpolate(&self, points: &[Point2]) -> Vec<DenseSample>;
}

/// Everything a [`Penalizer`] needs once, at construction, in place of the
/// reference source's `**kwargs` forwarding (§9).
#[derive(Debug, Clone)]
pub struct PenalizerInitContext {
    pub map_context: Option<SegmentatorMapContext>,
    pub valid_points: Vec<Point2>,
    pub start_points: Vec<Point2>,
    pub group_centers: Vec<Point2>,
}

/// Scores feasibility of a dense curve against the valid area and a
/// curvature bound, and records offending points for diagnostics (§4.8).
///
/// `init` takes `&self`, not `&mut self`: implementations use interior
/// mutability (a mutex or similar) so one instance can be built once at
/// `OptimizerDriver::init` time and then shared by reference across the
/// worker pool for the rest of the run (§5 "Shared state").
pub trait Penalizer: Send + Sync {
    fn init(&self, ctx: &PenalizerInitContext);

    /// `record_invalid` gates the [`Penalizer::last_invalid_points`] side
    /// effect: the optimiser driver sets it `false` for the parallel search
    /// (§5 "not touched by concurrent workers") and `true` only for the
    /// single-threaded finalisation recompute (§4.9, §5 "Invalid-points
    /// observer: updated only during the final single-threaded evaluation").
    fn penalize(
        &self,
        points: &[DenseSample],
        valid_points: &[Point2],
        grid: (f64, f64),
        penalty_k: f64,
        candidate: &[Point2],
        record_invalid: bool,
    ) -> f64;

    /// Points judged infeasible by the most recent recording
    /// [`Penalizer::penalize`] call, published for read-only consumption by
    /// plotting collaborators (§4.8 "publishes... via an observer hook").
    fn last_invalid_points(&self) -> Vec<Point2>;
}

/// Scores an already-feasible dense curve (§6 `criterion`).
pub trait Criterion: Send + Sync {
    fn compute(&self, points: &[DenseSample]) -> f64;
}
