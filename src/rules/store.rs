use super::dedup::RuleKey;
use super::rule::Rule;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Append-only rule collection, unique on [`RuleKey`].
///
/// On disk: `{"rules": [rule, ...]}`, pretty-printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStore {
    #[serde(default)]
    rules: Vec<Rule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `rules`, dropping later canonical duplicates.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut store = RuleStore::new();
        for rule in rules {
            store.insert(rule);
        }
        store
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, rule: &Rule) -> bool {
        let key = rule.key();
        self.rules.iter().any(|r| r.key() == key)
    }

    /// Add `rule` unless a rule with the same canonical form exists.
    /// Returns whether it was added.
    pub fn insert(&mut self, rule: Rule) -> bool {
        if self.contains(&rule) {
            tracing::debug!(rule = %rule.name, "duplicate rule skipped");
            return false;
        }
        tracing::info!(rule = %rule.name, "rule added");
        self.rules.push(rule);
        true
    }

    /// Read a store file. A missing file is an empty store; duplicates in the
    /// file are collapsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(RuleStore::new());
        }
        let text = fs::read_to_string(path)?;
        let raw: RuleStore = serde_json::from_str(&text)?;
        let before = raw.rules.len();
        let store = RuleStore::from_rules(raw.rules);
        if store.len() != before {
            tracing::warn!(path = %path.display(), dropped = before - store.len(), "duplicate rules in store file");
        }
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }

    /// Load, insert and save back. The file is only rewritten when the rule
    /// was new.
    pub fn append_to_file(path: &Path, rule: Rule) -> Result<bool> {
        let mut store = RuleStore::load(path)?;
        let added = store.insert(rule);
        if added {
            store.save(path)?;
        }
        Ok(added)
    }

    /// Distinct canonical keys held by the store.
    pub fn keys(&self) -> HashSet<RuleKey> {
        self.rules.iter().map(Rule::key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{PatternEntry, StyleValue};

    fn rule(name: &str, style: &[(&str, &str)]) -> Rule {
        Rule::new(
            name,
            style.iter().map(|(p, v)| (p.to_string(), StyleValue::from(*v))),
            vec![PatternEntry::Text, PatternEntry::tag("div")],
        )
    }

    #[test]
    fn canonical_duplicates_are_rejected() {
        let mut store = RuleStore::new();
        assert!(store.insert(rule("a", &[("display", "inline"), ("color", "red")])));
        assert!(!store.insert(rule("b", &[("color", "red"), ("display", "inline")])));
        assert_eq!(store.len(), 1);
        assert_eq!(store.rules()[0].name, "a");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuleStore::load(&dir.path().join("rules.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn append_to_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rules.json");
        assert!(RuleStore::append_to_file(&path, rule("DispNone", &[("display", "inline")])).unwrap());
        assert!(!RuleStore::append_to_file(&path, rule("Again", &[("display", "inline")])).unwrap());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"rules\": ["));
        let store = RuleStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.keys().len(), 1);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(RuleStore::load(&path).is_err());
    }
}
