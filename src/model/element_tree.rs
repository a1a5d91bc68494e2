//! Ordered, id-addressable document tree.
//!
//! A subject's document is a *forest*: the top-level sequence is what ends up
//! directly under `<body>` when the subject is materialized. Elements carry a
//! stable `id` assigned by the synthesizer; the `"none"` sentinel marks nodes
//! that were created without one and may repeat.
//!
//! ```text
//! roots: [ div#1 ─┬─ div#2
//!                 └─ "hello"
//!          span#3 ]
//! ```
//!
//! All operations here are total: looking up or removing an id that is not in
//! the tree is simply a no-op (`None`).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Id given to elements that were created without one.
pub const NO_ID: &str = "none";

/// Tag name used when a text leaf is rendered in tag position.
pub const TEXT_TAG: &str = "#text";

fn no_id() -> String {
    NO_ID.to_string()
}

/// A node in the document: either an element with children or a text leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Element(ElementNode),
    Text(TextLeaf),
}

/// An element node. `attrs` never contains `tag`, `id` or `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag: String,
    #[serde(default = "no_id")]
    pub id: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<Element>,
}

/// A text leaf. Text has no id and no children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLeaf {
    pub text: String,
}

impl Element {
    /// Shorthand for an element without attributes.
    pub fn element(tag: impl Into<String>, id: impl Into<String>, children: Vec<Element>) -> Self {
        Element::Element(ElementNode { tag: tag.into(), id: id.into(), attrs: BTreeMap::new(), children })
    }

    /// Shorthand for a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Element::Text(TextLeaf { text: text.into() })
    }

    /// Tag in tag position (`"#text"` for text leaves).
    pub fn tag(&self) -> &str {
        match self {
            Element::Element(node) => &node.tag,
            Element::Text(_) => TEXT_TAG,
        }
    }

    /// The element payload, if this is not a text leaf.
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Element::Element(node) => Some(node),
            Element::Text(_) => None,
        }
    }

    fn has_id(&self, id: &str) -> bool {
        self.as_element().is_some_and(|node| node.id == id)
    }
}

impl ElementNode {
    /// Every id in the subtree rooted here, including this node's own id.
    /// The `"none"` sentinel is never reported.
    pub fn subtree_ids(&self) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        let mut stack: Vec<&ElementNode> = vec![self];
        while let Some(node) = stack.pop() {
            if node.id != NO_ID {
                ids.insert(node.id.clone());
            }
            stack.extend(node.children.iter().filter_map(Element::as_element));
        }
        ids
    }
}

/// Pre-order iterator over the element nodes of a forest (text leaves are
/// skipped).
pub struct Elements<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a ElementNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(item) = self.stack.pop() {
            if let Element::Element(node) = item {
                // Reverse so the leftmost child is visited first.
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}

/// The document forest of a subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTree {
    roots: Vec<Element>,
}

impl ElementTree {
    pub fn new(roots: Vec<Element>) -> Self {
        ElementTree { roots }
    }

    /// Top-level nodes, in document order.
    pub fn roots(&self) -> &[Element] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Element nodes in document pre-order.
    pub fn elements(&self) -> Elements<'_> {
        Elements { stack: self.roots.iter().rev().collect() }
    }

    /// Number of element nodes (text leaves are not counted).
    pub fn element_count(&self) -> usize {
        self.elements().count()
    }

    /// Recursive id lookup. The sentinel id never resolves.
    pub fn find(&self, id: &str) -> Option<&ElementNode> {
        if id == NO_ID {
            return None;
        }
        self.elements().find(|node| node.id == id)
    }

    /// All ids present in the tree, sentinel excluded.
    pub fn element_ids(&self) -> BTreeSet<String> {
        self.elements().filter(|node| node.id != NO_ID).map(|node| node.id.clone()).collect()
    }

    /// Detach the subtree rooted at `id` and return it.
    ///
    /// Only the first match in document order is removed; ids are unique
    /// apart from the sentinel, which is never removable.
    pub fn remove(&mut self, id: &str) -> Option<Element> {
        if id == NO_ID {
            return None;
        }
        remove_from(&mut self.roots, id)
    }

    /// Rename every node carrying `old` to `new`. Returns how many nodes changed.
    pub fn rename_id(&mut self, old: &str, new: &str) -> usize {
        let mut renamed = 0;
        let mut stack: Vec<&mut Element> = self.roots.iter_mut().collect();
        while let Some(item) = stack.pop() {
            if let Element::Element(node) = item {
                if node.id == old {
                    node.id = new.to_string();
                    renamed += 1;
                }
                stack.extend(node.children.iter_mut());
            }
        }
        renamed
    }
}

fn remove_from(nodes: &mut Vec<Element>, id: &str) -> Option<Element> {
    if let Some(pos) = nodes.iter().position(|n| n.has_id(id)) {
        return Some(nodes.remove(pos));
    }
    for node in nodes.iter_mut() {
        if let Element::Element(el) = node {
            if let Some(found) = remove_from(&mut el.children, id) {
                return Some(found);
            }
        }
    }
    None
}
