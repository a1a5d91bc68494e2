use super::build::{Generalized, merge_trees};
use super::view::{Side, SubjectView};
use crate::error::{Error, Result};
use crate::model::RunSubject;

/// Fold [`merge_trees`] over every view that has a start anchor, left to
/// right. Views without an anchor are skipped.
pub fn generalize(views: &[SubjectView]) -> Result<Generalized> {
    let sides: Vec<Side<'_>> = views.iter().filter_map(SubjectView::side).collect();
    if sides.len() < 2 {
        return Err(Error::NotEnoughSubjects { needed: 2, found: sides.len() });
    }
    if sides.len() < views.len() {
        tracing::debug!(skipped = views.len() - sides.len(), "views without a start anchor skipped");
    }

    let mut acc = merge_trees(sides[0], sides[1]);
    for side in &sides[2..] {
        acc = merge_trees(acc.side(), *side);
    }
    tracing::debug!(inputs = sides.len(), nodes = acc.tree.len(), "generalized");
    Ok(acc)
}

/// Sort subjects by a stable key so that the fold in [`generalize`] does not
/// depend on the order subjects were found in.
pub fn canonical_order(subjects: &mut [RunSubject]) {
    subjects.sort_by_cached_key(|s| (s.signature(), s.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, ElementTree, StyleMap};

    fn failing(parent_tag: &str, start_id: &str, extra: &str) -> RunSubject {
        let tree = ElementTree::new(vec![Element::element(
            parent_tag,
            "10",
            vec![Element::element("p", "11", vec![]), Element::element("div", start_id, vec![])],
        )]);
        let mut overrides = StyleMap::overrides();
        overrides.set(start_id, "display", "none");
        overrides.set(start_id, "width", extra);
        RunSubject::new(tree, StyleMap::baseline(), overrides)
    }

    #[test]
    fn shared_override_survives_generalization() {
        let views: Vec<SubjectView> =
            [failing("section", "20", "1px"), failing("section", "30", "2px")].iter().map(SubjectView::from_subject).collect();
        let g = generalize(&views).unwrap();
        let start = g.start_facts().unwrap();
        assert_eq!(start.modified_style.get("display").map(String::as_str), Some("none"));
        assert_eq!(start.modified_style.get("width").map(String::as_str), Some("diff"));
        let parent = g.tree.parent(g.start).unwrap();
        assert_eq!(g.tree.data(parent).tag(), "section");
    }

    #[test]
    fn three_way_merge_folds_left_to_right() {
        let views: Vec<SubjectView> = [
            failing("section", "20", "1px"),
            failing("section", "30", "1px"),
            failing("article", "40", "1px"),
        ]
        .iter()
        .map(SubjectView::from_subject)
        .collect();
        let g = generalize(&views).unwrap();
        let parent = g.tree.parent(g.start).unwrap();
        assert_eq!(g.tree.data(parent), &crate::merge::NodeData::Empty);
        assert_eq!(
            g.start_facts().unwrap().modified_style.get("width").map(String::as_str),
            Some("1px")
        );
    }

    #[test]
    fn needs_two_anchored_views() {
        let plain = RunSubject::from_tree(ElementTree::new(vec![Element::element("div", "1", vec![])]));
        let views = vec![SubjectView::from_subject(&failing("section", "2", "1px")), SubjectView::from_subject(&plain)];
        match generalize(&views) {
            Err(Error::NotEnoughSubjects { needed: 2, found: 1 }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn canonical_order_is_input_independent() {
        let a = failing("section", "20", "1px");
        let b = failing("article", "30", "2px");
        let mut one = vec![a.clone(), b.clone()];
        let mut two = vec![b, a];
        canonical_order(&mut one);
        canonical_order(&mut two);
        assert_eq!(one, two);
    }
}
