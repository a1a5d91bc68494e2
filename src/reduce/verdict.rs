use super::oracle::{BugKind, Outcome};
use crate::model::RunSubject;
use serde::{Deserialize, Serialize};

/// What a finished reduction amounts to once it has been re-verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionVerdict {
    /// Reproduces and carries at least one style mutation (or is a crash).
    Minimal,
    /// The re-verification did not reproduce the bug.
    NoRepro,
    /// A layout bug that no style mutation is left to explain.
    NoResidualCause,
    /// The re-verification timed out.
    OracleTimeout,
}

impl ReductionVerdict {
    pub fn is_reportable(self) -> bool {
        self == ReductionVerdict::Minimal
    }

    pub fn describe(self) -> &'static str {
        match self {
            ReductionVerdict::Minimal => "minimal reproduction",
            ReductionVerdict::NoRepro => "false positive (could not reproduce)",
            ReductionVerdict::NoResidualCause => "false positive (no modified styles)",
            ReductionVerdict::OracleTimeout => "oracle timed out during re-verification",
        }
    }
}

/// Classify a minimized subject by its re-verification outcome.
pub fn classify(subject: &RunSubject, outcome: &Outcome) -> ReductionVerdict {
    match outcome {
        Outcome::Timeout => ReductionVerdict::OracleTimeout,
        Outcome::Pass => ReductionVerdict::NoRepro,
        _ if outcome.bug_kind() == Some(BugKind::Layout) && subject.overrides().is_empty() => {
            ReductionVerdict::NoResidualCause
        }
        Outcome::LayoutBug(_) | Outcome::Crash => ReductionVerdict::Minimal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, ElementTree};

    fn bare() -> RunSubject {
        RunSubject::from_tree(ElementTree::new(vec![Element::element("div", "1", vec![])]))
    }

    #[test]
    fn layout_bug_without_overrides_has_no_residual_cause() {
        let verdict = classify(&bare(), &Outcome::LayoutBug(vec!["diff".into()]));
        assert_eq!(verdict, ReductionVerdict::NoResidualCause);
    }

    #[test]
    fn crash_without_overrides_is_still_minimal() {
        assert_eq!(classify(&bare(), &Outcome::Crash), ReductionVerdict::Minimal);
    }

    #[test]
    fn pass_and_timeout_are_distinct() {
        assert_eq!(classify(&bare(), &Outcome::Pass), ReductionVerdict::NoRepro);
        assert_eq!(classify(&bare(), &Outcome::Timeout), ReductionVerdict::OracleTimeout);
    }

    #[test]
    fn layout_bug_with_overrides_is_minimal() {
        let mut s = bare();
        s.overrides_mut().set("1", "display", "none");
        assert_eq!(classify(&s, &Outcome::LayoutBug(vec!["x".into()])), ReductionVerdict::Minimal);
    }
}
