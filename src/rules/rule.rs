//! Rule records as they are persisted in the rule store.

use super::dedup::RuleKey;
use super::target::BodyChild;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marker for a non-blank text child in an `html_pattern`.
pub const TEXT_MARKER: &str = "text";

/// Required value for one style property: a single value or any of several.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    One(String),
    AnyOf(Vec<String>),
}

impl StyleValue {
    pub fn values(&self) -> &[String] {
        match self {
            StyleValue::One(v) => std::slice::from_ref(v),
            StyleValue::AnyOf(vs) => vs,
        }
    }
}

impl From<&str> for StyleValue {
    fn from(v: &str) -> Self {
        StyleValue::One(v.to_string())
    }
}

/// One entry of a rule's child-shape pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawPatternEntry", into = "RawPatternEntry")]
pub enum PatternEntry {
    /// A text child with non-blank content.
    Text,
    /// An element with this tag.
    Tag(String),
    /// An element whose attributes include `attrs`, and whose tag equals
    /// `tag` when one is given.
    Shape { tag: Option<String>, attrs: BTreeMap<String, String> },
}

impl PatternEntry {
    pub fn tag(tag: impl Into<String>) -> Self {
        PatternEntry::Tag(tag.into())
    }

    pub fn matches(&self, child: &BodyChild) -> bool {
        match (self, child) {
            (PatternEntry::Text, BodyChild::Text(text)) => !text.trim().is_empty(),
            (PatternEntry::Tag(want), BodyChild::Element { tag, .. }) => want == tag,
            (PatternEntry::Shape { tag: want, attrs: need }, BodyChild::Element { tag, attrs }) => {
                want.as_ref().is_none_or(|w| w == tag) && need.iter().all(|(k, v)| attrs.get(k) == Some(v))
            }
            _ => false,
        }
    }
}

/// Wire form: `"text"`, a bare tag name, or `{"tag": ..., "attrs": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawPatternEntry {
    Name(String),
    Shape {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(default)]
        attrs: BTreeMap<String, String>,
    },
}

impl From<RawPatternEntry> for PatternEntry {
    fn from(raw: RawPatternEntry) -> Self {
        match raw {
            RawPatternEntry::Name(name) if name == TEXT_MARKER => PatternEntry::Text,
            RawPatternEntry::Name(name) => PatternEntry::Tag(name),
            RawPatternEntry::Shape { tag, attrs } => PatternEntry::Shape { tag, attrs },
        }
    }
}

impl From<PatternEntry> for RawPatternEntry {
    fn from(entry: PatternEntry) -> Self {
        match entry {
            PatternEntry::Text => RawPatternEntry::Name(TEXT_MARKER.to_string()),
            PatternEntry::Tag(tag) => RawPatternEntry::Name(tag),
            PatternEntry::Shape { tag, attrs } => RawPatternEntry::Shape { tag, attrs },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleClass {
    #[serde(default)]
    pub style: Vec<(String, StyleValue)>,
    #[serde(default)]
    pub html_pattern: Vec<PatternEntry>,
}

/// A known bug class: a style requirement plus a body-level shape pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub name: String,
    pub rule_class: RuleClass,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        style: impl IntoIterator<Item = (String, StyleValue)>,
        html_pattern: impl IntoIterator<Item = PatternEntry>,
    ) -> Self {
        Rule {
            name: name.into(),
            rule_class: RuleClass { style: style.into_iter().collect(), html_pattern: html_pattern.into_iter().collect() },
        }
    }

    pub fn key(&self) -> RuleKey {
        RuleKey::of(&self.rule_class)
    }
}
