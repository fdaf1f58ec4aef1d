//! Matryoshka-transform trajectory planning core.
//!
//! Reduces choosing one point per track segment from a 2D valid region to a
//! low-dimensional optimisation over a unit square per segment. The core
//! idea (C5/C6, [`matryoshka`]) is a per-segment bijection between
//! `[0,1]^2` and that segment's physical interior, built from nested closed
//! curves contracting from the segment boundary to a centre point. A
//! generic derivative-free optimiser ([`optimizer`]) proposes one point per
//! segment; [`evaluate`] maps each back to physical coordinates, hands the
//! ordered sequence to an external interpolator, gates it through a
//! feasibility/curvature penalizer, and scores it with an external
//! criterion.
//!
//! Track segmentation, centre selection, path interpolation and the cost
//! criterion are external collaborators this crate discovers through the
//! traits in [`collaborators`], not implementations it owns.

pub mod beautify;
pub mod border;
pub mod centre;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod geometry;
pub mod logging;
pub mod mapset;
pub mod matryoshka;
pub mod optimizer;
pub mod penalizer;

pub use collaborators::{Criterion, DenseSample, Interpolator, Penalizer, Selector, Segmentator};
pub use config::Config;
pub use error::{ConfigError, DegenerateSegmentError, PlannerError};
pub use evaluate::evaluate;
pub use geometry::Point2;
pub use mapset::MapSet;
pub use matryoshka::Matryoshka;
pub use optimizer::{Collaborators, DriverState, InitInputs, OptimizationReport, OptimizerDriver};
pub use penalizer::CurvaturePenalizer;
