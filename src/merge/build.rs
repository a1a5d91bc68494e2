//! Pairwise merge of nodes, subtrees and ancestor chains.

use super::tree::{DIFF, ElementFacts, NodeData, NodeId, NodeTree};
use super::view::Side;
use crate::model::Declarations;

/// Output of [`merge_trees`]: a fresh arena with its root and start anchor.
#[derive(Debug, Clone)]
pub struct Generalized {
    pub tree: NodeTree,
    pub root: NodeId,
    pub start: NodeId,
}

impl Generalized {
    /// Use this result as one input of a further merge.
    pub fn side(&self) -> Side<'_> {
        Side { tree: &self.tree, start: self.start }
    }

    pub fn start_facts(&self) -> Option<&ElementFacts> {
        self.tree.data(self.start).as_element()
    }

    pub fn root_children(&self) -> &[NodeId] {
        self.tree.children(self.root)
    }
}

/// Merge two node payloads.
///
/// - text + text: text kept if equal, else `"diff"`;
/// - element + element with the same tag: id kept if equal, else `"diff"`;
///   attrs and the three style maps keep shared keys only;
/// - anything else (tag mismatch, element + text, a sentinel): `Empty`.
pub fn merge_nodes(a: &NodeData, b: &NodeData) -> NodeData {
    match (a, b) {
        (NodeData::Text(x), NodeData::Text(y)) => NodeData::Text(agree(x, y)),
        (NodeData::Element(x), NodeData::Element(y)) if x.tag == y.tag => NodeData::Element(ElementFacts {
            tag: x.tag.clone(),
            id: agree(&x.id, &y.id),
            attrs: merge_declarations(&x.attrs, &y.attrs),
            base_style: merge_declarations(&x.base_style, &y.base_style),
            modified_style: merge_declarations(&x.modified_style, &y.modified_style),
            style: merge_declarations(&x.style, &y.style),
        }),
        _ => NodeData::Empty,
    }
}

fn agree(x: &str, y: &str) -> String {
    if x == y { x.to_string() } else { DIFF.to_string() }
}

/// Keys present on both sides; unequal values become `"diff"`.
pub fn merge_declarations(a: &Declarations, b: &Declarations) -> Declarations {
    a.iter()
        .filter_map(|(key, va)| b.get(key).map(|vb| (key.clone(), agree(va, vb))))
        .collect()
}

/// Merge `a` and `b` and their children by position into `out`.
///
/// Children beyond the shorter list have no counterpart and are dropped.
/// `Empty` results are leaves.
pub fn build_down(out: &mut NodeTree, ta: &NodeTree, a: NodeId, tb: &NodeTree, b: NodeId) -> NodeId {
    let merged = out.push(merge_nodes(ta.data(a), tb.data(b)));
    if let NodeData::Element(_) = out.data(merged) {
        for (&ca, &cb) in ta.children(a).iter().zip(tb.children(b)) {
            let child = build_down(out, ta, ca, tb, cb);
            out.append_child(merged, child);
        }
    }
    merged
}

/// Merge two anchored trees.
///
/// The anchors are merged with [`build_down`]; then, while both sides still
/// have a parent, the parents are merged and their children rebuilt as
/// `left siblings ++ [previous result] ++ right siblings`, where siblings are
/// paired outward from the aligned position and stop at the shorter side.
pub fn merge_trees(a: Side<'_>, b: Side<'_>) -> Generalized {
    let mut out = NodeTree::new();
    let start = build_down(&mut out, a.tree, a.start, b.tree, b.start);

    let (mut cur_a, mut cur_b, mut cur) = (a.start, b.start, start);
    loop {
        let (Some(pa), Some(pb)) = (a.tree.parent(cur_a), b.tree.parent(cur_b)) else {
            break;
        };
        let (Some(i1), Some(i2)) = (a.tree.sibling_index(cur_a), b.tree.sibling_index(cur_b)) else {
            break;
        };

        let parent = out.push(merge_nodes(a.tree.data(pa), b.tree.data(pb)));
        let (s1, s2) = (a.tree.children(pa), b.tree.children(pb));

        let mut children = Vec::with_capacity(s1.len().min(s2.len()));
        for k in (1..=i1.min(i2)).rev() {
            children.push(build_down(&mut out, a.tree, s1[i1 - k], b.tree, s2[i2 - k]));
        }
        children.push(cur);
        for (&x, &y) in s1[i1 + 1..].iter().zip(&s2[i2 + 1..]) {
            children.push(build_down(&mut out, a.tree, x, b.tree, y));
        }
        out.set_children(parent, children);

        cur = parent;
        cur_a = pa;
        cur_b = pb;
    }

    Generalized { tree: out, root: cur, start }
}
