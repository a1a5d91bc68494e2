//! Arena tree used by the merge engine.
//!
//! Nodes live in a `Vec` and refer to each other through [`NodeId`] handles.
//! `parent` is a plain back-index used for climbing during the ancestor
//! merge; it never owns anything, so a whole tree is dropped in one go.
//!
//! ## Invariants
//!
//! - A `NodeId` is only meaningful for the tree that created it.
//! - `children(p)` contains `c` iff `parent(c) == Some(p)` for nodes attached
//!   through [`NodeTree::append_child`] / [`NodeTree::set_children`].

use crate::model::{Declarations, TEXT_TAG};

/// Marker for a property, attribute, tag, id or text on which two merged
/// inputs disagree.
pub const DIFF: &str = "diff";

/// Display name of the structural-divergence sentinel.
pub const EMPTY: &str = "empty";

/// Handle into a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

bitflags::bitflags! {
    /// Which facets of a merged node carry a `"diff"` marker.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DiffMask: u8 {
        const TAG            = 1 << 0;
        const ID             = 1 << 1;
        const ATTRS          = 1 << 2;
        const BASE_STYLE     = 1 << 3;
        const MODIFIED_STYLE = 1 << 4;
        const STYLE          = 1 << 5;
        const TEXT           = 1 << 6;
        /// The node is the `Empty` sentinel.
        const STRUCTURE      = 1 << 7;
    }
}

/// Style and identity facts of an element in the combined view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementFacts {
    pub tag: String,
    pub id: String,
    pub attrs: Declarations,
    /// Baseline declarations of the element.
    pub base_style: Declarations,
    /// Override declarations of the element.
    pub modified_style: Declarations,
    /// Baseline overlaid by overrides.
    pub style: Declarations,
}

/// Payload of a merge-domain node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(ElementFacts),
    Text(String),
    /// The two inputs diverge structurally at this position.
    Empty,
}

impl NodeData {
    pub fn tag(&self) -> &str {
        match self {
            NodeData::Element(facts) => &facts.tag,
            NodeData::Text(_) => TEXT_TAG,
            NodeData::Empty => EMPTY,
        }
    }

    pub fn as_element(&self) -> Option<&ElementFacts> {
        match self {
            NodeData::Element(facts) => Some(facts),
            _ => None,
        }
    }

    /// Facets of this node that hold a `"diff"` marker.
    pub fn diff_mask(&self) -> DiffMask {
        fn any_diff(decls: &Declarations) -> bool {
            decls.values().any(|v| v == DIFF)
        }

        match self {
            NodeData::Empty => DiffMask::STRUCTURE,
            NodeData::Text(text) if text == DIFF => DiffMask::TEXT,
            NodeData::Text(_) => DiffMask::empty(),
            NodeData::Element(facts) => {
                let mut mask = DiffMask::empty();
                mask.set(DiffMask::TAG, facts.tag == DIFF);
                mask.set(DiffMask::ID, facts.id == DIFF);
                mask.set(DiffMask::ATTRS, any_diff(&facts.attrs));
                mask.set(DiffMask::BASE_STYLE, any_diff(&facts.base_style));
                mask.set(DiffMask::MODIFIED_STYLE, any_diff(&facts.modified_style));
                mask.set(DiffMask::STYLE, any_diff(&facts.style));
                mask
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of merge-domain nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    slots: Vec<Slot>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Add a detached node.
    pub fn push(&mut self, data: NodeData) -> NodeId {
        self.slots.push(Slot { data, parent: None, children: Vec::new() });
        NodeId(self.slots.len() - 1)
    }

    /// Attach `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.slots[child.0].parent = Some(parent);
        self.slots[parent.0].children.push(child);
    }

    /// Replace the children of `parent`, re-pointing each child's parent.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for &child in &children {
            self.slots[child.0].parent = Some(parent);
        }
        self.slots[parent.0].children = children;
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.slots[id.0].data
    }

    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.slots[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.0].children
    }

    /// Position of `id` among its parent's children.
    pub fn sibling_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// `id` and its ancestors, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&n| self.parent(n))
    }

    /// Nodes of the subtree rooted at `id`, pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev());
        }
        out
    }

    /// Whether any node under `id` (inclusive) carries a divergence marker.
    pub fn has_diff(&self, id: NodeId) -> bool {
        self.descendants(id).into_iter().any(|n| !self.data(n).diff_mask().is_empty())
    }

    /// Structural equality of two subtrees, possibly in different arenas.
    pub fn subtree_eq(&self, a: NodeId, other: &NodeTree, b: NodeId) -> bool {
        if self.data(a) != other.data(b) {
            return false;
        }
        let (ca, cb) = (self.children(a), other.children(b));
        ca.len() == cb.len() && ca.iter().zip(cb).all(|(&x, &y)| self.subtree_eq(x, other, y))
    }
}
