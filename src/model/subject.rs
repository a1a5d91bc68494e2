//! The unit of testing: one document plus its two style layers.

use super::element_tree::ElementTree;
use super::signature::styles_signature;
use super::style_map::{StyleLayer, StyleMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A synthetic test document paired with its baseline and override styles.
///
/// Invariants:
///
/// - every id in either style map names a node that is (or was) in the tree;
///   removing a node removes its whole subtree from both maps;
/// - ids are coherent across all three structures: a rename is applied to the
///   tree and both maps together.
///
/// `Clone` is a full deep copy; the reducer relies on that to throw away a
/// rejected candidate without touching the last accepted subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SubjectParts")]
pub struct RunSubject {
    tree: ElementTree,
    baseline: StyleMap,
    overrides: StyleMap,
}

/// Stored form; deserialized subjects go through [`RunSubject::new`].
#[derive(Deserialize)]
struct SubjectParts {
    tree: ElementTree,
    baseline: StyleMap,
    overrides: StyleMap,
}

impl From<SubjectParts> for RunSubject {
    fn from(parts: SubjectParts) -> Self {
        RunSubject::new(parts.tree, parts.baseline, parts.overrides)
    }
}

/// Size measure used to check that reduction only ever shrinks a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SubjectSize {
    /// Element nodes in the tree.
    pub elements: usize,
    /// Override declarations across all ids.
    pub overrides: usize,
}

impl SubjectSize {
    pub fn total(&self) -> usize {
        self.elements + self.overrides
    }
}

impl fmt::Display for SubjectSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} elements, {} overrides", self.elements, self.overrides)
    }
}

impl RunSubject {
    /// Assemble a subject. The maps are re-tagged with their layers so a
    /// swapped argument cannot change how signatures are computed.
    pub fn new(tree: ElementTree, baseline: StyleMap, overrides: StyleMap) -> Self {
        let baseline = StyleMap::from_entries(StyleLayer::Baseline, baseline.iter().map(|(k, v)| (k.clone(), v.clone())));
        let overrides =
            StyleMap::from_entries(StyleLayer::Override, overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        RunSubject { tree, baseline, overrides }
    }

    /// A subject with no style facts at all.
    pub fn from_tree(tree: ElementTree) -> Self {
        RunSubject { tree, baseline: StyleMap::baseline(), overrides: StyleMap::overrides() }
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn baseline(&self) -> &StyleMap {
        &self.baseline
    }

    pub fn overrides(&self) -> &StyleMap {
        &self.overrides
    }

    pub fn baseline_mut(&mut self) -> &mut StyleMap {
        &mut self.baseline
    }

    pub fn overrides_mut(&mut self) -> &mut StyleMap {
        &mut self.overrides
    }

    pub fn size(&self) -> SubjectSize {
        SubjectSize { elements: self.tree.element_count(), overrides: self.overrides.declaration_count() }
    }

    /// Remove the element `id` together with its subtree, and every style
    /// entry of the removed ids.
    ///
    /// An id that is not in the tree still has its own style entries removed,
    /// so stale references left behind by earlier partial removals are
    /// cleaned up. Calling this twice is harmless.
    pub fn remove_element(&mut self, id: &str) {
        let mut doomed: BTreeSet<String> = self.tree.find(id).map(|node| node.subtree_ids()).unwrap_or_default();
        doomed.insert(id.to_string());

        for rid in &doomed {
            self.baseline.remove(rid);
            self.overrides.remove(rid);
        }
        self.tree.remove(id);
    }

    /// Rename `old` to `new` in the tree and both style maps.
    ///
    /// Callers must pick a `new` id that is not already in use; an existing
    /// style entry under `new` is overwritten.
    pub fn rename_id(&mut self, old: &str, new: &str) {
        self.tree.rename_id(old, new);
        self.baseline.rename_id(old, new);
        self.overrides.rename_id(old, new);
    }

    /// Ids referenced anywhere: tree, baseline map or override map.
    pub fn element_ids(&self) -> BTreeSet<String> {
        let mut ids = self.tree.element_ids();
        ids.extend(self.baseline.element_ids());
        ids.extend(self.overrides.element_ids());
        ids
    }

    /// All style tokens of both layers.
    pub fn style_tokens(&self) -> BTreeSet<String> {
        let mut tokens = self.baseline.signature_tokens();
        tokens.extend(self.overrides.signature_tokens());
        tokens
    }

    /// Stable fingerprint of the style facts and mutations this subject exercises.
    pub fn signature(&self) -> String {
        styles_signature(&self.baseline.signature_tokens(), &self.overrides.signature_tokens())
    }
}

impl fmt::Display for RunSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RunSubject(")?;
        writeln!(f, "  Elements: {},", self.element_ids().len())?;
        writeln!(f, "  Base Styles: {},", self.baseline.signature_tokens().len())?;
        writeln!(f, "  Modified Styles: {},", self.overrides.signature_tokens().len())?;
        writeln!(f, "  Styles Signature: {}", self.signature())?;
        write!(f, ")")
    }
}
