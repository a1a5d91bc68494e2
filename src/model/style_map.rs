//! Id-indexed style layers.
//!
//! Every subject carries two `StyleMap`s over the same id space:
//!
//! - the **baseline** layer holds computed/initial style facts, and
//!   fingerprints as `property:value` tokens (the concrete value matters,
//!   e.g. `display:flex`);
//! - the **override** layer holds the mutations applied by the generated
//!   style-change script, and fingerprints as bare property names (only
//!   *which* property was perturbed matters).
//!
//! An id that is not present is treated as having no declarations; none of
//! the operations here fail.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Property name -> value for a single element.
pub type Declarations = BTreeMap<String, String>;

/// Which of the two style layers a map represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleLayer {
    Baseline,
    Override,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleMap {
    layer: StyleLayer,
    #[serde(default)]
    map: BTreeMap<String, Declarations>,
}

impl StyleMap {
    pub fn new(layer: StyleLayer) -> Self {
        StyleMap { layer, map: BTreeMap::new() }
    }

    pub fn baseline() -> Self {
        Self::new(StyleLayer::Baseline)
    }

    pub fn overrides() -> Self {
        Self::new(StyleLayer::Override)
    }

    /// Build a layer from raw entries. Ids with no declarations are dropped.
    pub fn from_entries(layer: StyleLayer, entries: impl IntoIterator<Item = (String, Declarations)>) -> Self {
        let map = entries.into_iter().filter(|(_, decls)| !decls.is_empty()).collect();
        StyleMap { layer, map }
    }

    pub fn layer(&self) -> StyleLayer {
        self.layer
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of ids with at least one declaration.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Total number of `property: value` declarations across all ids.
    pub fn declaration_count(&self) -> usize {
        self.map.values().map(BTreeMap::len).sum()
    }

    pub fn element_ids(&self) -> BTreeSet<String> {
        self.map.keys().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Declarations> {
        self.map.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Declarations)> {
        self.map.iter()
    }

    /// Set a single declaration, replacing any previous value.
    pub fn set(&mut self, id: impl Into<String>, property: impl Into<String>, value: impl Into<String>) {
        self.map.entry(id.into()).or_default().insert(property.into(), value.into());
    }

    /// Replace every declaration of `id`. An empty set removes the entry.
    pub fn update(&mut self, id: impl Into<String>, declarations: Declarations) {
        let id = id.into();
        if declarations.is_empty() {
            self.map.remove(&id);
        } else {
            self.map.insert(id, declarations);
        }
    }

    /// Delete every declaration of `id`.
    pub fn remove(&mut self, id: &str) -> Option<Declarations> {
        self.map.remove(id)
    }

    /// Delete one declaration. The id entry goes away with its last property.
    pub fn remove_property(&mut self, id: &str, property: &str) -> Option<String> {
        let decls = self.map.get_mut(id)?;
        let value = decls.remove(property);
        if decls.is_empty() {
            self.map.remove(id);
        }
        value
    }

    /// Move the entry of `old` to `new`. An existing `new` entry is overwritten.
    pub fn rename_id(&mut self, old: &str, new: &str) {
        if let Some(decls) = self.map.remove(old) {
            self.map.insert(new.to_string(), decls);
        }
    }

    /// Union of fingerprint tokens across every id.
    ///
    /// Baseline tokens are `property:value`; override tokens are bare property
    /// names.
    pub fn signature_tokens(&self) -> BTreeSet<String> {
        self.map
            .values()
            .flat_map(|decls| decls.iter())
            .map(|(property, value)| match self.layer {
                StyleLayer::Baseline => format!("{property}:{value}"),
                StyleLayer::Override => property.clone(),
            })
            .collect()
    }
}
