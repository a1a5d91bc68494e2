use crate::error::Result;
use crate::merge::{Generalized, SubjectView, generalize};
use crate::model::RunSubject;
use crate::reduce::{MinifyStepProvider, Oracle, Outcome, ReduceOptions, Reducer, Reduction};
use crate::rules::{MatchSummary, MatchTarget, Rule, RuleMatcher, default_rule_name, derive_rule};
use crate::storage::{load_subject, subject_files};
use std::path::{Path, PathBuf};

/// Result of [`triage`].
#[derive(Debug, Clone)]
pub enum Triage {
    /// A known-bug rule matched; the subject was re-tested once, not reduced.
    KnownBug { rule: String, outcome: Outcome, summary: MatchSummary },
    Reduced { reduction: Reduction, summary: MatchSummary },
}

impl Triage {
    pub fn summary(&self) -> &MatchSummary {
        match self {
            Triage::KnownBug { summary, .. } | Triage::Reduced { summary, .. } => summary,
        }
    }
}

/// One file visited by [`check_subjects`].
#[derive(Debug, Clone)]
pub struct CheckedFile {
    pub path: PathBuf,
    /// Name of the first matching rule, or the load error.
    pub result: std::result::Result<Option<String>, String>,
}

/// Per-file results and totals of [`check_subjects`].
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub files: Vec<CheckedFile>,
    /// Files matched by some rule.
    pub positives: usize,
    /// Files that loaded and matched no rule.
    pub negatives: usize,
    pub errors: usize,
    pub summary: MatchSummary,
}

/// Shrink `subject` with the default element-then-style provider.
pub fn minimize<O: Oracle + ?Sized>(subject: RunSubject, oracle: &mut O, options: &ReduceOptions) -> Result<Reduction> {
    let mut provider = MinifyStepProvider::new();
    Reducer::new(&mut provider, oracle).with_options(options.clone()).run_with_metrics(subject)
}

/// Check `subject` against the known-bug rules before reducing it.
///
/// Every rule is evaluated so the summary covers the whole rule set. On a
/// match the subject is tested once more and returned unreduced.
pub fn triage<O: Oracle + ?Sized>(
    subject: RunSubject,
    oracle: &mut O,
    matcher: Option<&RuleMatcher>,
    options: &ReduceOptions,
) -> Result<Triage> {
    let mut summary = MatchSummary::default();
    let mut known = None;
    if let Some(matcher) = matcher {
        let target = MatchTarget::from_subject(&subject);
        for m in matcher.evaluate(&target) {
            tracing::debug!(rule = %m.rule.name, pattern = m.pattern_found, style = m.style_hit.is_some(), "rule checked");
            summary.record(&m);
            if known.is_none() && m.is_match() {
                known = Some(m.rule.name.clone());
            }
        }
    }

    if let Some(rule) = known {
        tracing::info!(%rule, "known bug, skipping reduction");
        let outcome = oracle.test(&subject)?;
        return Ok(Triage::KnownBug { rule, outcome, summary });
    }
    let reduction = minimize(subject, oracle, options)?;
    Ok(Triage::Reduced { reduction, summary })
}

/// Merge subjects left to right into one generalized tree.
pub fn generalize_subjects(subjects: &[RunSubject]) -> Result<Generalized> {
    let views: Vec<SubjectView> = subjects.iter().map(SubjectView::from_subject).collect();
    generalize(&views)
}

/// Generalize `subjects` and derive a rule from the result. Without a name
/// the rule is named by the current timestamp.
pub fn learn_rule(subjects: &[RunSubject], name: Option<&str>) -> Result<Rule> {
    let generalized = generalize_subjects(subjects)?;
    let name = name.map(str::to_string).unwrap_or_else(default_rule_name);
    Ok(derive_rule(name, &generalized))
}

/// Evaluate `matcher` against every `.json` subject file under `dir`.
/// Unreadable files are reported per file, not as a failure of the run.
pub fn check_subjects(dir: &Path, matcher: &RuleMatcher) -> Result<CheckReport> {
    let mut report = CheckReport::default();
    for path in subject_files(dir, false)? {
        let result = match load_subject(&path) {
            Ok(subject) => {
                let target = MatchTarget::from_subject(&subject);
                let mut hit = None;
                for m in matcher.evaluate(&target) {
                    report.summary.record(&m);
                    if hit.is_none() && m.is_match() {
                        hit = Some(m.rule.name.clone());
                    }
                }
                if hit.is_some() {
                    report.positives += 1;
                } else {
                    report.negatives += 1;
                }
                Ok(hit)
            }
            Err(err) => {
                report.errors += 1;
                Err(err.to_string())
            }
        };
        report.files.push(CheckedFile { path, result });
    }
    Ok(report)
}
