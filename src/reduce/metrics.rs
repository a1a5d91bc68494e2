//! Reduction run metrics.
//!
//! `Reducer::run` returns just the outcome; `Reducer::run_with_metrics` also
//! records a compact per-step trace, which the CLI prints and tests use to
//! check oracle call counts and monotone shrinking.

use super::oracle::Outcome;
use crate::model::SubjectSize;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct ReductionMetrics {
    /// Total elapsed time, re-verification included.
    pub total: Duration,
    /// Oracle invocations, re-verification included.
    pub oracle_calls: usize,
    /// One entry per candidate that reached the oracle.
    pub steps: Vec<StepMetrics>,
    /// Size of the subject the run started from.
    pub initial_size: SubjectSize,
    /// Whether the run stopped on the oracle-call budget rather than exhaustion.
    pub budget_exhausted: bool,
    /// Whether the run stopped because the provider proposed a non-shrinking candidate.
    pub provider_violation: bool,
}

/// A single candidate test.
#[derive(Debug, Clone)]
pub struct StepMetrics {
    pub duration: Duration,
    pub candidate_size: SubjectSize,
    pub outcome: Outcome,
    pub accepted: bool,
}

impl ReductionMetrics {
    pub fn accepted(&self) -> usize {
        self.steps.iter().filter(|s| s.accepted).count()
    }

    pub fn rejected(&self) -> usize {
        self.steps.len() - self.accepted()
    }

    /// Sizes of the accepted subject after each accepted step, starting with
    /// the initial size.
    pub fn accepted_sizes(&self) -> Vec<SubjectSize> {
        std::iter::once(self.initial_size)
            .chain(self.steps.iter().filter(|s| s.accepted).map(|s| s.candidate_size))
            .collect()
    }
}
