//! Error taxonomy (§7, §10.2).
//!
//! Build-time failures (`ConfigError`, `DegenerateSegmentError`) are fatal
//! and propagate as `Err`. Per-candidate signalling (`EvaluationFailure`,
//! infeasibility) is *not* modelled as an error: [`crate::evaluate::evaluate`]
//! always returns a finite `f64`, clamping non-finite collaborator output to
//! `f64::INFINITY` instead of returning `Result`.

use thiserror::Error;

/// Fatal error constructing a run (`OptimizerDriver::init`, §4.9).
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    DegenerateSegment(#[from] DegenerateSegmentError),
}

/// Malformed configuration or a missing required collaborator (§7).
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("layers must be >= 2, got {0}")]
    TooFewLayers(usize),

    #[error("groups must be >= 1, got {0}")]
    TooFewGroups(usize),

    #[error("grid override must have positive components, got ({0}, {1})")]
    InvalidGrid(f64, f64),

    #[error("workers must be >= 1, got {0}")]
    TooFewWorkers(usize),
}

/// Boundary extraction (C2) could not produce a closed polyline for a
/// segment.
#[derive(Debug, Error, PartialEq)]
pub enum DegenerateSegmentError {
    #[error("segment {segment} has {found} boundary point(s), need at least 3")]
    TooFewBoundaryPoints { segment: usize, found: usize },

    #[error("segment {segment}'s boundary traversal failed to close")]
    TraversalDidNotClose { segment: usize },

    #[error("segment {segment} is empty")]
    EmptyCluster { segment: usize },
}
