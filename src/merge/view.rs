//! Combined per-element view of a subject, the input side of a merge.

use super::tree::{ElementFacts, NodeData, NodeId, NodeTree};
use crate::materialize::DEV_CONTROLS_ID;
use crate::model::{Declarations, Element, NO_ID, RunSubject};
use std::collections::BTreeMap;

/// Tag and id of the synthetic element wrapping the subject's forest.
pub const VIEW_ROOT_TAG: &str = "body";
pub const VIEW_ROOT_ID: &str = "Root";

/// A subject's forest under a synthetic `body#Root`, with every element
/// carrying its baseline, override and combined styles.
#[derive(Debug, Clone)]
pub struct SubjectView {
    pub tree: NodeTree,
    pub root: NodeId,
    /// First element in pre-order with a non-empty override style.
    pub start: Option<NodeId>,
}

/// One input of a merge: a tree and the anchor to climb from.
#[derive(Debug, Clone, Copy)]
pub struct Side<'a> {
    pub tree: &'a NodeTree,
    pub start: NodeId,
}

impl SubjectView {
    pub fn from_subject(subject: &RunSubject) -> Self {
        let mut tree = NodeTree::new();
        let root = tree.push(NodeData::Element(ElementFacts {
            tag: VIEW_ROOT_TAG.to_string(),
            id: VIEW_ROOT_ID.to_string(),
            ..ElementFacts::default()
        }));

        let mut builder = ViewBuilder { subject, tree, start: None };
        for node in subject.tree().roots() {
            builder.attach(root, node);
        }
        SubjectView { tree: builder.tree, root, start: builder.start }
    }

    pub fn side(&self) -> Option<Side<'_>> {
        self.start.map(|start| Side { tree: &self.tree, start })
    }
}

struct ViewBuilder<'s> {
    subject: &'s RunSubject,
    tree: NodeTree,
    start: Option<NodeId>,
}

impl ViewBuilder<'_> {
    fn attach(&mut self, parent: NodeId, node: &Element) {
        let el = match node {
            Element::Text(leaf) => {
                let id = self.tree.push(NodeData::Text(leaf.text.clone()));
                self.tree.append_child(parent, id);
                return;
            }
            Element::Element(el) => el,
        };
        if el.id == DEV_CONTROLS_ID {
            return;
        }

        let (base_style, modified_style, style) = self.styles_for(&el.id);
        let has_override = !modified_style.is_empty();
        let id = self.tree.push(NodeData::Element(ElementFacts {
            tag: el.tag.clone(),
            id: el.id.clone(),
            attrs: el.attrs.clone(),
            base_style,
            modified_style,
            style,
        }));
        self.tree.append_child(parent, id);
        if self.start.is_none() && has_override {
            self.start = Some(id);
        }

        for child in &el.children {
            self.attach(id, child);
        }
    }

    fn styles_for(&self, id: &str) -> (Declarations, Declarations, Declarations) {
        if id == NO_ID {
            return Default::default();
        }
        let base = self.subject.baseline().get(id).cloned().unwrap_or_default();
        let modified = self.subject.overrides().get(id).cloned().unwrap_or_default();
        let mut combined: BTreeMap<String, String> = base.clone();
        combined.extend(modified.iter().map(|(k, v)| (k.clone(), v.clone())));
        (base, modified, combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementTree, StyleMap};

    fn subject() -> RunSubject {
        let tree = ElementTree::new(vec![
            Element::element("div", DEV_CONTROLS_ID, vec![Element::element("button", "9", vec![])]),
            Element::element(
                "section",
                "1",
                vec![Element::text("a"), Element::element("p", "2", vec![]), Element::element("p", "3", vec![])],
            ),
        ]);
        let mut baseline = StyleMap::baseline();
        baseline.set("2", "display", "block");
        baseline.set("2", "color", "black");
        let mut overrides = StyleMap::overrides();
        overrides.set("2", "color", "red");
        overrides.set("3", "width", "10px");
        RunSubject::new(tree, baseline, overrides)
    }

    #[test]
    fn wraps_forest_and_skips_dev_controls() {
        let view = SubjectView::from_subject(&subject());
        let top = view.tree.children(view.root);
        assert_eq!(top.len(), 1);
        assert_eq!(view.tree.data(top[0]).tag(), "section");
        assert_eq!(view.tree.data(view.root).as_element().map(|f| f.id.as_str()), Some(VIEW_ROOT_ID));
    }

    #[test]
    fn start_is_first_overridden_element() {
        let view = SubjectView::from_subject(&subject());
        let start = view.start.unwrap();
        let facts = view.tree.data(start).as_element().unwrap();
        assert_eq!(facts.id, "2");
        assert_eq!(facts.style.get("color").map(String::as_str), Some("red"));
        assert_eq!(facts.style.get("display").map(String::as_str), Some("block"));
        assert_eq!(facts.base_style.get("color").map(String::as_str), Some("black"));
        assert_eq!(view.tree.sibling_index(start), Some(1));
    }

    #[test]
    fn no_overrides_means_no_anchor() {
        let s = RunSubject::from_tree(ElementTree::new(vec![Element::element("div", "1", vec![])]));
        let view = SubjectView::from_subject(&s);
        assert!(view.start.is_none());
        assert!(view.side().is_none());
    }
}
