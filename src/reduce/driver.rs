//! The shrink loop.
//!
//! ```text
//! loop:
//!   candidate = provider.next(current)      None -> stop
//!   outcome   = oracle.test(candidate)
//!   bug?      -> current = candidate        (accepted, strictly smaller)
//!   else      -> keep current               (rejected)
//! final = oracle.test(current)              re-verify before returning
//! ```
//!
//! Both bug kinds are accepted alike: a crash that shrinks into a layout bug
//! is kept, and callers compare [`Outcome::bug_kind`] afterwards if the kind
//! matters to them. The final re-verification is never retried here; a
//! flaky oracle shows up as a [`ReductionVerdict::NoRepro`].

use super::metrics::{ReductionMetrics, StepMetrics};
use super::oracle::{Oracle, Outcome};
use super::provider::ReductionStepProvider;
use super::verdict::{ReductionVerdict, classify};
use crate::error::Result;
use crate::model::RunSubject;
use std::time::Instant;

/// Knobs for a reduction run.
#[derive(Debug, Clone, Default)]
pub struct ReduceOptions {
    /// Stop requesting candidates after this many candidate tests. The final
    /// re-verification is always run and does not count.
    pub max_oracle_calls: Option<usize>,
}

/// Outcome of a reduction bundled with its trace.
#[derive(Debug, Clone)]
pub struct Reduction {
    pub subject: RunSubject,
    pub outcome: Outcome,
    pub verdict: ReductionVerdict,
    pub metrics: ReductionMetrics,
}

/// Drives a provider against an oracle until the provider is exhausted.
///
/// Usage: `Reducer::new(&mut provider, &mut oracle).run(subject)`.
pub struct Reducer<'a, P: ?Sized, O: ?Sized> {
    provider: &'a mut P,
    oracle: &'a mut O,
    options: ReduceOptions,
}

impl<'a, P, O> Reducer<'a, P, O>
where
    P: ReductionStepProvider + ?Sized,
    O: Oracle + ?Sized,
{
    pub fn new(provider: &'a mut P, oracle: &'a mut O) -> Self {
        Reducer { provider, oracle, options: ReduceOptions::default() }
    }

    pub fn with_options(mut self, options: ReduceOptions) -> Self {
        self.options = options;
        self
    }

    /// Shrink `subject`, assumed to reproduce a bug, and return the smallest
    /// accepted subject with its re-verification outcome and trace.
    pub fn run_with_metrics(self, subject: RunSubject) -> Result<Reduction> {
        let total_start = Instant::now();
        let mut metrics = ReductionMetrics { initial_size: subject.size(), ..ReductionMetrics::default() };
        let mut current = subject;

        loop {
            if self.options.max_oracle_calls.is_some_and(|budget| metrics.oracle_calls >= budget) {
                tracing::info!(calls = metrics.oracle_calls, "oracle budget spent, stopping reduction");
                metrics.budget_exhausted = true;
                break;
            }

            let Some(candidate) = self.provider.next(&current) else {
                break;
            };

            let current_size = current.size();
            let candidate_size = candidate.size();
            if candidate_size.total() >= current_size.total() {
                tracing::warn!(
                    current = %current_size,
                    candidate = %candidate_size,
                    "provider proposed a candidate that does not shrink the subject; stopping"
                );
                metrics.provider_violation = true;
                break;
            }

            let step_start = Instant::now();
            let outcome = self.oracle.test(&candidate)?;
            metrics.oracle_calls += 1;
            let accepted = outcome.is_bug();

            tracing::debug!(
                step = metrics.steps.len(),
                size = %candidate_size,
                outcome = outcome.label(),
                accepted,
                "reduction step"
            );

            metrics.steps.push(StepMetrics {
                duration: step_start.elapsed(),
                candidate_size,
                outcome,
                accepted,
            });

            if accepted {
                current = candidate;
            }
        }

        let outcome = self.oracle.test(&current)?;
        metrics.oracle_calls += 1;
        let verdict = classify(&current, &outcome);
        metrics.total = total_start.elapsed();

        tracing::info!(
            from = %metrics.initial_size,
            to = %current.size(),
            calls = metrics.oracle_calls,
            verdict = verdict.describe(),
            "reduction finished"
        );

        Ok(Reduction { subject: current, outcome, verdict, metrics })
    }

    /// Like [`run_with_metrics`](Self::run_with_metrics) without the trace.
    pub fn run(self, subject: RunSubject) -> Result<(RunSubject, Outcome)> {
        let reduction = self.run_with_metrics(subject)?;
        Ok((reduction.subject, reduction.outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, ElementTree, StyleMap};
    use crate::reduce::MinifyStepProvider;

    fn subject() -> RunSubject {
        let tree = ElementTree::new(vec![
            Element::element("div", "1", vec![Element::element("p", "2", vec![Element::text("x")])]),
            Element::element("span", "3", vec![]),
            Element::element("b", "4", vec![]),
        ]);
        let mut overrides = StyleMap::overrides();
        overrides.set("3", "display", "none");
        overrides.set("4", "color", "red");
        RunSubject::new(tree, StyleMap::baseline(), overrides)
    }

    /// Bug reproduces while `span#3` keeps `display: none`.
    fn needs_span_display(s: &RunSubject) -> Result<Outcome> {
        let hit = s.overrides().get("3").is_some_and(|d| d.get("display").is_some_and(|v| v == "none"));
        Ok(if hit { Outcome::LayoutBug(vec!["#3 height".into()]) } else { Outcome::Pass })
    }

    #[test]
    fn shrinks_to_the_responsible_element_and_property() {
        let mut provider = MinifyStepProvider::new();
        let mut oracle = needs_span_display;
        let reduction = Reducer::new(&mut provider, &mut oracle).run_with_metrics(subject()).unwrap();

        assert_eq!(reduction.subject.tree().element_ids().into_iter().collect::<Vec<_>>(), vec!["3"]);
        assert_eq!(reduction.subject.overrides().declaration_count(), 1);
        assert_eq!(reduction.verdict, ReductionVerdict::Minimal);
        assert!(reduction.outcome.is_bug());
    }

    #[test]
    fn accepted_sizes_never_grow() {
        let mut provider = MinifyStepProvider::new();
        let mut oracle = needs_span_display;
        let reduction = Reducer::new(&mut provider, &mut oracle).run_with_metrics(subject()).unwrap();
        let sizes = reduction.metrics.accepted_sizes();
        assert!(sizes.windows(2).all(|w| w[1].total() < w[0].total()));
        assert_eq!(reduction.metrics.oracle_calls, reduction.metrics.steps.len() + 1);
    }

    #[test]
    fn budget_stops_candidate_requests_but_still_reverifies() {
        let mut provider = MinifyStepProvider::new();
        let mut oracle = needs_span_display;
        let reduction = Reducer::new(&mut provider, &mut oracle)
            .with_options(ReduceOptions { max_oracle_calls: Some(2) })
            .run_with_metrics(subject())
            .unwrap();
        assert_eq!(reduction.metrics.steps.len(), 2);
        assert_eq!(reduction.metrics.oracle_calls, 3);
        assert!(reduction.metrics.budget_exhausted);
    }

    struct Stubborn;

    impl ReductionStepProvider for Stubborn {
        fn next(&mut self, current: &RunSubject) -> Option<RunSubject> {
            Some(current.clone())
        }
    }

    #[test]
    fn non_shrinking_candidate_stops_the_loop_without_testing_it() {
        let mut provider = Stubborn;
        let mut calls = 0;
        let mut oracle = |_: &RunSubject| -> Result<Outcome> {
            calls += 1;
            Ok(Outcome::Crash)
        };
        let reduction = Reducer::new(&mut provider, &mut oracle).run_with_metrics(subject()).unwrap();
        assert!(reduction.metrics.provider_violation);
        assert!(reduction.metrics.steps.is_empty());
        assert_eq!(reduction.metrics.oracle_calls, 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn failed_reverification_is_reported_not_retried() {
        let mut provider = MinifyStepProvider::new();
        let mut oracle = |_: &RunSubject| -> Result<Outcome> { Ok(Outcome::Pass) };
        let reduction = Reducer::new(&mut provider, &mut oracle).run_with_metrics(subject()).unwrap();
        assert_eq!(reduction.subject, subject());
        assert_eq!(reduction.verdict, ReductionVerdict::NoRepro);
    }
}
