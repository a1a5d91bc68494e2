//! The pass/fail oracle contract.

use crate::error::Result;
use crate::model::RunSubject;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of one rendered subject.
///
/// Layout-bug details are opaque to the reducer; only their presence matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "details", rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    LayoutBug(Vec<String>),
    Crash,
    Timeout,
}

/// The two kinds of defect the reducer shrinks towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BugKind {
    Layout,
    Crash,
}

impl Outcome {
    /// `LayoutBug` from a detail list; no details means no bug.
    pub fn from_details(details: Vec<String>) -> Self {
        if details.is_empty() { Outcome::Pass } else { Outcome::LayoutBug(details) }
    }

    /// True for layout bugs and crashes. Timeouts are not bugs.
    pub fn is_bug(&self) -> bool {
        self.bug_kind().is_some()
    }

    pub fn bug_kind(&self) -> Option<BugKind> {
        match self {
            Outcome::LayoutBug(_) => Some(BugKind::Layout),
            Outcome::Crash => Some(BugKind::Crash),
            Outcome::Pass | Outcome::Timeout => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::LayoutBug(_) => "BUG",
            Outcome::Crash => "CRASH",
            Outcome::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::LayoutBug(details) => write!(f, "{} ({} differences)", self.label(), details.len()),
            _ => f.write_str(self.label()),
        }
    }
}

/// External predicate that renders a subject and classifies the result.
///
/// Calls block and may take seconds. Implementations must not retry
/// internally; a timeout is reported as [`Outcome::Timeout`]. The error path
/// is reserved for failures to *run* the oracle at all (writing the page,
/// spawning a process), which are not test outcomes.
pub trait Oracle {
    fn test(&mut self, subject: &RunSubject) -> Result<Outcome>;
}

impl<F> Oracle for F
where
    F: FnMut(&RunSubject) -> Result<Outcome>,
{
    fn test(&mut self, subject: &RunSubject) -> Result<Outcome> {
        self(subject)
    }
}
