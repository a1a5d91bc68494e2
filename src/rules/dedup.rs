//! Canonical keys for rule deduplication.
//!
//! Two rules describe the same bug class when they require the same set of
//! style values on the same ordered child pattern. The rule's name and the
//! order its style requirements were written in do not matter; the pattern
//! order does, because matching is a contiguous window.
//!
//! ## Invariants
//!
//! - `RuleKey::of` is a pure function of the rule class.
//! - The store never holds two rules with equal keys.

use super::rule::{PatternEntry, RuleClass, StyleValue};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleKey {
    style: Vec<(String, StyleValue)>,
    pattern: Vec<PatternEntry>,
}

impl RuleKey {
    pub fn of(class: &RuleClass) -> Self {
        let mut style = class.style.clone();
        style.sort();
        RuleKey { style, pattern: class.html_pattern.clone() }
    }
}
