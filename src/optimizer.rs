//! Optimiser driver (C8, §4.9, §5, §9).
//!
//! Owns the [`MapSet`] and the external collaborators, drives a budgeted,
//! parallel, discrete one-plus-one-style GA over it, and reports the best
//! feasible candidate found. Where the reference source kept the MapSet,
//! collaborator handles, grid and penalty scale as module-level mutable
//! globals, this crate closes them into one immutable
//! [`OptimisationContext`] snapshot that worker tasks share by `Arc`
//! (§9 "Process-wide mutable globals -> explicit context").

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::collaborators::{Criterion, Interpolator, Penalizer, PenalizerInitContext, Segmentator, Selector};
use crate::config::Config;
use crate::error::PlannerError;
use crate::evaluate::{evaluate, evaluate_detailed, EvaluationContext};
use crate::geometry::{grid_cell_size, Point2};
use crate::logging::RunLog;
use crate::mapset::MapSet;

/// `Idle -> Built(MapSet) -> Optimising -> Finalising -> Reported` (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Built,
    Optimising,
    Finalising,
    Reported,
}

/// The five named external capabilities this crate discovers by
/// configuration rather than implements (§1, §6).
pub struct Collaborators {
    pub selector: Box<dyn Selector>,
    pub segmentator: Box<dyn Segmentator>,
    pub interpolator: Arc<dyn Interpolator>,
    pub penalizer: Arc<dyn Penalizer>,
    pub criterion: Arc<dyn Criterion>,
}

/// Inputs to [`OptimizerDriver::init`]: the raw track data the `selector`
/// and `segmentator` collaborators reduce to a MapSet (§1 "Out of scope").
pub struct InitInputs {
    pub centerline: Vec<Point2>,
    pub valid_points: Vec<Point2>,
}

/// An immutable snapshot of everything one `evaluate` call needs, shared by
/// `Arc` across the worker pool for the duration of a run (§5, §9).
#[derive(Clone)]
pub struct OptimisationContext {
    map_set: Arc<MapSet>,
    interpolator: Arc<dyn Interpolator>,
    penalizer: Arc<dyn Penalizer>,
    criterion: Arc<dyn Criterion>,
    valid_points: Arc<Vec<Point2>>,
    grid: (f64, f64),
    penalty_k: f64,
}

impl OptimisationContext {
    /// Used by the parallel search loop: does not record into the
    /// penalizer's invalid-point observer (§5).
    pub fn evaluate(&self, u: &[(f64, f64)]) -> f64 {
        evaluate(&self.evaluation_context(false), u)
    }

    /// Used only by the sequential finalisation recompute: records into the
    /// penalizer's invalid-point observer (§4.9, §5).
    pub fn evaluate_detailed(&self, u: &[(f64, f64)]) -> crate::evaluate::EvaluationDetail {
        evaluate_detailed(&self.evaluation_context(true), u)
    }

    fn evaluation_context(&self, record_invalid: bool) -> EvaluationContext {
        EvaluationContext {
            map_set: &self.map_set,
            interpolator: self.interpolator.as_ref(),
            penalizer: self.penalizer.as_ref(),
            criterion: self.criterion.as_ref(),
            valid_points: &self.valid_points,
            grid: self.grid,
            penalty_k: self.penalty_k,
            record_invalid,
        }
    }

    pub fn dims(&self) -> usize {
        self.map_set.len()
    }

    pub fn map_set(&self) -> &MapSet {
        &self.map_set
    }
}

/// One scored candidate: `u` in the MapSet's canonical per-segment order,
/// and the evaluator's scalar score for it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub u: Vec<(f64, f64)>,
    pub score: f64,
}

/// Budgeted discrete one-plus-lambda GA (§4.9 "a discrete one-plus-one
/// style GA variant is the reference", §5 "up to W concurrent evaluate
/// calls"). Each generation perturbs the incumbent into up to `workers`
/// mutants sequentially (so the RNG draw order, and hence the result, does
/// not depend on thread scheduling), evaluates them in parallel, and keeps
/// the best mutant if it improves on the incumbent (one-fifth success rule
/// on the mutation step size).
pub struct OnePlusOneOptimizer {
    dims: usize,
    rng: StdRng,
    sigma: f64,
}

const INITIAL_SIGMA: f64 = 0.2;
const MIN_SIGMA: f64 = 1e-3;
const MAX_SIGMA: f64 = 0.5;

impl OnePlusOneOptimizer {
    pub fn new(dims: usize, seed: u64) -> Self {
        OnePlusOneOptimizer {
            dims,
            rng: StdRng::seed_from_u64(seed),
            sigma: INITIAL_SIGMA,
        }
    }

    fn random_candidate(&mut self) -> Vec<(f64, f64)> {
        (0..self.dims)
            .map(|_| (self.rng.gen::<f64>(), self.rng.gen::<f64>()))
            .collect()
    }

    fn mutate(&mut self, base: &[(f64, f64)]) -> Vec<(f64, f64)> {
        base.iter()
            .map(|&(a, b)| {
                let da = self.rng.gen_range(-self.sigma..=self.sigma);
                let db = self.rng.gen_range(-self.sigma..=self.sigma);
                ((a + da).clamp(0.0, 1.0), (b + db).clamp(0.0, 1.0))
            })
            .collect()
    }

    /// Runs up to `budget` `evaluate` calls (exactly `budget`, unless a
    /// `deadline` cuts the run short between generations) through a
    /// `workers`-wide pool, and returns the best candidate seen alongside
    /// the number of `evaluate` calls actually observed (§5 "Cancellation",
    /// §8 S6).
    pub fn run(
        &mut self,
        ctx: &OptimisationContext,
        budget: usize,
        workers: usize,
        deadline: Option<Instant>,
        log: &RunLog,
    ) -> SearchOutcome {
        let workers = workers.max(1);
        let mut incumbent = self.random_candidate();
        let mut best_score = ctx.evaluate(&incumbent);
        let mut evaluations = 1usize;
        if !best_score.is_finite() {
            log.evaluation_failure(&incumbent);
        }
        log.candidate_points(&ctx.map_set().map_all(&incumbent));

        if evaluations >= budget {
            return SearchOutcome {
                best: Candidate {
                    u: incumbent,
                    score: best_score,
                },
                evaluations,
            };
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .expect("failed to build optimiser worker pool");

        while evaluations < budget {
            if let Some(dl) = deadline {
                if Instant::now() >= dl {
                    break;
                }
            }

            let batch = (budget - evaluations).min(workers);
            let mut mutants = Vec::with_capacity(batch);
            for _ in 0..batch {
                mutants.push(self.mutate(&incumbent));
            }

            let scored: Vec<(Vec<(f64, f64)>, f64)> = pool.install(|| {
                mutants
                    .into_par_iter()
                    .map(|m| {
                        let score = ctx.evaluate(&m);
                        (m, score)
                    })
                    .collect()
            });
            evaluations += scored.len();

            for (m, score) in &scored {
                if !score.is_finite() {
                    log.evaluation_failure(m);
                }
            }

            if let Some((candidate_u, candidate_score)) = scored
                .into_iter()
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            {
                if candidate_score < best_score {
                    incumbent = candidate_u;
                    best_score = candidate_score;
                    self.sigma = (self.sigma * 1.1).min(MAX_SIGMA);
                } else {
                    self.sigma = (self.sigma * 0.9).max(MIN_SIGMA);
                }
            }
        }

        SearchOutcome {
            best: Candidate {
                u: incumbent,
                score: best_score,
            },
            evaluations,
        }
    }
}

/// The result of [`OnePlusOneOptimizer::run`]: the best candidate found and
/// the number of `evaluate` calls actually performed, which is `budget`
/// unless `deadline` cut the search short (§5, §8 S6).
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Candidate,
    pub evaluations: usize,
}

/// The final report handed back to the caller once a run reaches
/// `Reported` (§4.9 "recomputes the best candidate once").
#[derive(Debug, Clone)]
pub struct OptimizationReport {
    pub best: Candidate,
    pub control_points: Vec<Point2>,
    pub evaluations: usize,
}

/// Owns the MapSet and collaborators across the state machine of one run
/// (§4.9, §9 "explicit context").
pub struct OptimizerDriver {
    state: DriverState,
    config: Config,
    collaborators: Collaborators,
    map_set: Option<Arc<MapSet>>,
    valid_points: Vec<Point2>,
    log: RunLog,
}

impl OptimizerDriver {
    pub fn new(config: Config, collaborators: Collaborators) -> Result<Self, PlannerError> {
        config.validate()?;
        let verbosity = config.logging_verbosity;
        Ok(OptimizerDriver {
            state: DriverState::Idle,
            config,
            collaborators,
            map_set: None,
            valid_points: Vec::new(),
            log: RunLog::to_stdout(verbosity),
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Builds the MapSet from `inputs` via the selector/segmentator
    /// collaborators and C2-C5, unless `hold_matryoshka` is set and a
    /// MapSet already exists, in which case the existing one is reused
    /// (§4.9 "Re-entering `init` with `hold_matryoshka=true`...").
    pub fn init(&mut self, inputs: InitInputs) -> Result<(), PlannerError> {
        if self.config.hold_matryoshka && self.map_set.is_some() {
            self.valid_points = inputs.valid_points;
            self.state = DriverState::Built;
            return Ok(());
        }

        let seeds = self
            .collaborators
            .selector
            .select(&inputs.centerline, self.config.groups);
        let clusters = self
            .collaborators
            .segmentator
            .segmentate(&inputs.valid_points, &seeds);
        let map_set = MapSet::build_default(&clusters, &seeds, self.config.layers)?;

        self.collaborators.penalizer.init(&PenalizerInitContext {
            map_context: self.collaborators.segmentator.map_context(),
            valid_points: inputs.valid_points.clone(),
            start_points: seeds.clone(),
            group_centers: seeds,
        });

        self.map_set = Some(Arc::new(map_set));
        self.valid_points = inputs.valid_points;
        self.state = DriverState::Built;
        Ok(())
    }

    fn grid(&self) -> (f64, f64) {
        match self.config.grid {
            Some(g) => g,
            None => {
                let g = grid_cell_size(&self.valid_points);
                (g, g)
            }
        }
    }

    fn context(&self) -> OptimisationContext {
        let map_set = self
            .map_set
            .as_ref()
            .expect("optimize() requires Built state")
            .clone();
        OptimisationContext {
            map_set,
            interpolator: Arc::clone(&self.collaborators.interpolator),
            penalizer: Arc::clone(&self.collaborators.penalizer),
            criterion: Arc::clone(&self.collaborators.criterion),
            valid_points: Arc::new(self.valid_points.clone()),
            grid: self.grid(),
            penalty_k: self.config.penalty,
        }
    }

    /// Drives the budgeted, parallel optimiser, then performs the strictly
    /// sequential finalisation (§4.9, §5 "final best-recomputation is
    /// strictly sequential"). Honours `Config::timeout_ms` as the deadline
    /// of §5's cancellation model, in addition to the evaluation budget.
    pub fn optimize(&mut self) -> OptimizationReport {
        assert_eq!(
            self.state,
            DriverState::Built,
            "optimize() requires init() to have run first"
        );
        self.state = DriverState::Optimising;

        let deadline = self
            .config
            .timeout_ms
            .map(|ms| Instant::now() + std::time::Duration::from_millis(ms));

        let ctx = self.context();
        let mut optimizer = OnePlusOneOptimizer::new(ctx.dims(), self.config.seed);
        let outcome = optimizer.run(&ctx, self.config.budget, self.config.workers, deadline, &self.log);
        let best = outcome.best;

        self.state = DriverState::Finalising;
        // Sequential recompute: canonical result, and the side effect of
        // populating the penalizer's invalid-point observer (§4.9, §4.8).
        let detail = ctx.evaluate_detailed(&best.u);
        let final_score = detail.score;
        let control_points = ctx.map_set().map_all(&best.u);

        self.log.solution(&best.u);
        self.log.penalty(detail.penalty);
        if let Some(correct) = detail.correct {
            self.log.correct(correct);
        }
        self.log.final_score(final_score);

        self.state = DriverState::Reported;
        OptimizationReport {
            best: Candidate {
                u: best.u,
                score: final_score,
            },
            control_points,
            evaluations: outcome.evaluations,
        }
    }

    pub fn last_invalid_points(&self) -> Vec<Point2> {
        self.collaborators.penalizer.last_invalid_points()
    }
}
