//! Candidate sources for the reducer.
//!
//! A provider proposes one strictly smaller variant of the current accepted
//! subject per call, or `None` once it has nothing left to try for that
//! subject. Providers are stateful for the whole minimization and are created
//! fresh per top-level run.
//!
//! ## Default search order
//!
//! [`MinifyStepProvider`] plans, for the current subject:
//!
//! ```text
//! 1. remove element            (document pre-order: outer subtrees first)
//! 2. revert override property  (ordered by id, then property)
//! ```
//!
//! and walks that plan with a cursor. A rejected candidate advances the
//! cursor; an accepted candidate leaves it in place, and the plan is rebuilt
//! from the smaller subject on the next call (the entry now under the cursor
//! is the one that followed the removed step).

use crate::model::RunSubject;

/// Source of reduction candidates.
pub trait ReductionStepProvider {
    /// Propose a single strictly smaller mutation of `current`, or `None`
    /// when exhausted for it.
    fn next(&mut self, current: &RunSubject) -> Option<RunSubject>;
}

/// One reduction action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReductionStep {
    RemoveElement(String),
    RevertOverride { id: String, property: String },
}

impl ReductionStep {
    /// Apply the step to a copy of `subject`. `None` if it would not shrink it.
    pub fn apply(&self, subject: &RunSubject) -> Option<RunSubject> {
        let before = subject.size();
        let mut candidate = subject.clone();
        match self {
            ReductionStep::RemoveElement(id) => candidate.remove_element(id),
            ReductionStep::RevertOverride { id, property } => {
                candidate.overrides_mut().remove_property(id, property)?;
            }
        }
        (candidate.size().total() < before.total()).then_some(candidate)
    }
}

/// Every step applicable to `subject`, in search order.
pub fn plan_steps(subject: &RunSubject) -> Vec<ReductionStep> {
    let removals = subject
        .tree()
        .elements()
        .filter(|node| node.id != crate::model::NO_ID)
        .map(|node| ReductionStep::RemoveElement(node.id.clone()));

    let reverts = subject.overrides().iter().flat_map(|(id, decls)| {
        decls.keys().map(move |property| ReductionStep::RevertOverride { id: id.clone(), property: property.clone() })
    });

    removals.chain(reverts).collect()
}

/// The default element-then-style provider.
#[derive(Debug, Default)]
pub struct MinifyStepProvider {
    cursor: usize,
    /// Last candidate handed out; compared with the next `current` to learn
    /// whether it was accepted.
    pending: Option<RunSubject>,
}

impl MinifyStepProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReductionStepProvider for MinifyStepProvider {
    fn next(&mut self, current: &RunSubject) -> Option<RunSubject> {
        if let Some(proposed) = self.pending.take() {
            if &proposed != current {
                self.cursor += 1;
            }
        }

        let plan = plan_steps(current);
        while let Some(step) = plan.get(self.cursor) {
            if let Some(candidate) = step.apply(current) {
                tracing::trace!(?step, cursor = self.cursor, "proposing reduction step");
                self.pending = Some(candidate.clone());
                return Some(candidate);
            }
            self.cursor += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, ElementTree, StyleMap};

    fn subject() -> RunSubject {
        let tree = ElementTree::new(vec![
            Element::element("div", "a", vec![Element::element("p", "b", vec![])]),
            Element::element("span", "c", vec![]),
        ]);
        let mut overrides = StyleMap::overrides();
        overrides.set("b", "width", "1px");
        overrides.set("c", "color", "red");
        RunSubject::new(tree, StyleMap::baseline(), overrides)
    }

    #[test]
    fn plan_lists_elements_then_overrides() {
        let plan = plan_steps(&subject());
        assert_eq!(
            plan,
            vec![
                ReductionStep::RemoveElement("a".into()),
                ReductionStep::RemoveElement("b".into()),
                ReductionStep::RemoveElement("c".into()),
                ReductionStep::RevertOverride { id: "b".into(), property: "width".into() },
                ReductionStep::RevertOverride { id: "c".into(), property: "color".into() },
            ]
        );
    }

    #[test]
    fn every_candidate_is_strictly_smaller() {
        let s = subject();
        for step in plan_steps(&s) {
            let candidate = step.apply(&s).unwrap();
            assert!(candidate.size().total() < s.size().total());
        }
    }

    #[test]
    fn rejected_candidates_advance_the_cursor_until_exhaustion() {
        let s = subject();
        let mut provider = MinifyStepProvider::new();
        let mut proposals = 0;
        while provider.next(&s).is_some() {
            proposals += 1;
        }
        assert_eq!(proposals, 5);
        assert!(provider.next(&s).is_none());
    }

    #[test]
    fn accepted_candidate_replans_from_smaller_subject() {
        let s = subject();
        let mut provider = MinifyStepProvider::new();

        // Reject "remove a", accept "remove b".
        let first = provider.next(&s).unwrap();
        assert!(first.tree().find("a").is_none());
        let second = provider.next(&s).unwrap();
        assert!(second.tree().find("b").is_none());

        // The plan for `second` is [a, c, revert c.color]; the cursor stays on
        // index 1, which is now "remove c".
        let third = provider.next(&second).unwrap();
        assert!(third.tree().find("c").is_none());
        assert!(third.tree().find("a").is_some());
    }
}
