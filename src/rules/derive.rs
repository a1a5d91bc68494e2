use super::rule::{PatternEntry, Rule, StyleValue};
use crate::merge::{DIFF, Generalized, NodeData, NodeId, NodeTree};

/// Turn a generalized tree into a rule: the start anchor's agreed override
/// declarations, and the root's child shapes as the pattern.
pub fn derive_rule(name: impl Into<String>, generalized: &Generalized) -> Rule {
    Rule::new(
        name,
        start_styles(generalized),
        html_pattern(&generalized.tree, generalized.root),
    )
}

/// Pattern for the children of `node`: `text` for non-blank text, the tag
/// for elements. Blank text, `Empty` sentinels and `"diff"` tags are left out.
pub fn html_pattern(tree: &NodeTree, node: NodeId) -> Vec<PatternEntry> {
    tree.children(node)
        .iter()
        .filter_map(|&child| match tree.data(child) {
            NodeData::Text(text) if text.trim().is_empty() => None,
            NodeData::Text(_) => Some(PatternEntry::Text),
            NodeData::Element(facts) if facts.tag.is_empty() || facts.tag == DIFF => None,
            NodeData::Element(facts) => Some(PatternEntry::Tag(facts.tag.clone())),
            NodeData::Empty => None,
        })
        .collect()
}

/// Override declarations at the start anchor on which every input agreed.
pub fn start_styles(generalized: &Generalized) -> Vec<(String, StyleValue)> {
    generalized
        .start_facts()
        .map(|facts| {
            facts
                .modified_style
                .iter()
                .filter(|(_, value)| value.as_str() != DIFF)
                .map(|(property, value)| (property.clone(), StyleValue::One(value.clone())))
                .collect()
        })
        .unwrap_or_default()
}

/// Timestamp name for a freshly learned rule, seconds since the epoch with
/// millisecond precision.
pub fn default_rule_name() -> String {
    chrono::Utc::now().format("%s%.3f").to_string()
}
