//! Run log (§5 "Logger: shared; all writes through a single mutex-protected
//! sink", §6 "Log lines are line-oriented records `key:value`").
//!
//! This is distinct from the ambient `log`/`env_logger` stack the rest of
//! the crate uses for ordinary diagnostics (warnings, internal errors):
//! `RunLog` is the domain-specific record of a run's solution, penalty and
//! score, gated by `logging_verbosity` (§9 "Printing in the penalizer").

use std::io::{self, Write};
use std::sync::Mutex;

use crate::geometry::Point2;

/// Writes gated `key:value` lines to a single shared sink.
pub struct RunLog {
    verbosity: u8,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl RunLog {
    pub fn new<W: Write + Send + 'static>(verbosity: u8, sink: W) -> Self {
        RunLog {
            verbosity,
            sink: Mutex::new(Box::new(sink)),
        }
    }

    pub fn to_stdout(verbosity: u8) -> Self {
        RunLog::new(verbosity, io::stdout())
    }

    fn write_line(&self, line: &str) {
        log::debug!(target: "matryoshka_planner::run_log", "{line}");
        let mut sink = self.sink.lock().expect("run log sink mutex poisoned");
        let _ = writeln!(sink, "{line}");
    }

    /// Verbosity >= 1: the recommended solution vector.
    pub fn solution(&self, u: &[(f64, f64)]) {
        if self.verbosity >= 1 {
            self.write_line(&format!("solution:{u:?}"));
        }
    }

    /// Verbosity >= 1: the final reported score.
    pub fn final_score(&self, score: f64) {
        if self.verbosity >= 1 {
            self.write_line(&format!("final:{score}"));
        }
    }

    /// Verbosity >= 2: the penalty component of a candidate's score.
    pub fn penalty(&self, penalty: f64) {
        if self.verbosity >= 2 {
            self.write_line(&format!("penalty:{penalty}"));
        }
    }

    /// Verbosity >= 2: the feasibility-gated criterion value ("correct" in
    /// the reference source's log vocabulary, §6 persisted-state examples).
    pub fn correct(&self, value: f64) {
        if self.verbosity >= 2 {
            self.write_line(&format!("correct:{value}"));
        }
    }

    /// Verbosity >= 1: a candidate's score was non-finite and got clamped
    /// to infinity (§7 `EvaluationFailure`, "logged at verbosity >= 1").
    pub fn evaluation_failure(&self, u: &[(f64, f64)]) {
        if self.verbosity >= 1 {
            log::warn!(target: "matryoshka_planner::run_log", "evaluation_failure:{u:?}");
            self.write_line(&format!("evaluation_failure:{u:?}"));
        }
    }

    /// Verbosity >= 3: per-candidate control points.
    pub fn candidate_points(&self, points: &[Point2]) {
        if self.verbosity >= 3 {
            self.write_line(&format!("points:{points:?}"));
        }
    }
}
