//! Evaluation engine (C7, §4.7): the pure map -> interpolate -> penalize ->
//! score pipeline the optimiser calls once per candidate.

use crate::collaborators::{Criterion, Interpolator, Penalizer};
use crate::geometry::Point2;
use crate::mapset::MapSet;

/// Everything [`evaluate`] needs to score one candidate: the MapSet built
/// once per track, and the external collaborators it composes (§4.7, §6).
pub struct EvaluationContext<'a> {
    pub map_set: &'a MapSet,
    pub interpolator: &'a dyn Interpolator,
    pub penalizer: &'a dyn Penalizer,
    pub criterion: &'a dyn Criterion,
    pub valid_points: &'a [Point2],
    pub grid: (f64, f64),
    pub penalty_k: f64,
    /// Forwarded to [`Penalizer::penalize`] as its `record_invalid` flag
    /// (§5 "Invalid-points observer... not touched by concurrent workers").
    /// The optimiser driver sets this `false` for parallel search
    /// evaluations and `true` only for the sequential finalisation
    /// recompute.
    pub record_invalid: bool,
}

/// The penalty/criterion breakdown behind one [`evaluate`] call, for
/// callers (the optimiser's logging at verbosity >= 2, §6) that want more
/// than the bare scalar.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationDetail {
    pub penalty: f64,
    /// The criterion value, only computed (and only meaningful) when
    /// `penalty == 0.0` (§4.7 step 4: "If penalty != 0 return penalty (no
    /// criterion evaluation)").
    pub correct: Option<f64>,
    pub score: f64,
}

/// Scores one candidate `u` (one `(alpha, beta)` pair per segment, in the
/// MapSet's canonical order). Always returns a finite value: non-finite
/// collaborator output is clamped to `f64::INFINITY` rather than
/// propagated as an error (§7 `EvaluationFailure`).
pub fn evaluate(ctx: &EvaluationContext, u: &[(f64, f64)]) -> f64 {
    evaluate_detailed(ctx, u).score
}

/// Like [`evaluate`], but also returns the penalty and (when feasible) the
/// criterion value that produced the final score.
pub fn evaluate_detailed(ctx: &EvaluationContext, u: &[(f64, f64)]) -> EvaluationDetail {
    let control_points: Vec<Point2> = ctx.map_set.map_all(u);

    let dense = ctx.interpolator.interpolate(&control_points);

    let penalty = ctx.penalizer.penalize(
        &dense,
        ctx.valid_points,
        ctx.grid,
        ctx.penalty_k,
        &control_points,
        ctx.record_invalid,
    );

    let (correct, raw_score) = if penalty != 0.0 {
        (None, penalty)
    } else {
        let value = ctx.criterion.compute(&dense);
        (Some(value), value)
    };

    let score = if raw_score.is_finite() {
        raw_score
    } else {
        f64::INFINITY
    };

    EvaluationDetail {
        penalty,
        correct,
        score,
    }
}
