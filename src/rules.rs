//! Known-bug rules: derivation, persistence and matching.
//!
//! A rule says "this override style on this body shape is a known bug":
//!
//! ```text
//! Generalized ──derive_rule──► Rule ──RuleStore::insert──► rules.json
//!                               │
//!             RuleMatcher::new ─┘
//!                   │
//! RunSubject ──MatchTarget::from_subject──► evaluate ──► RuleMatch / MatchSummary
//! ```
//!
//! ## Responsibilities by module
//!
//! - `rule.rs`: records and their JSON shape.
//! - `dedup.rs`: canonical [`RuleKey`].
//! - `store.rs`: the append-only [`RuleStore`].
//! - `derive.rs`: rules from generalized trees.
//! - `target.rs`: what a rule is matched against.
//! - `matcher.rs`: pattern window and style-source checks.

#[path = "rules/dedup.rs"]
mod dedup;
#[path = "rules/derive.rs"]
mod derive;
#[path = "rules/matcher.rs"]
mod matcher;
#[path = "rules/rule.rs"]
mod rule;
#[path = "rules/store.rs"]
mod store;
#[path = "rules/target.rs"]
mod target;

pub use dedup::RuleKey;
pub use derive::{default_rule_name, derive_rule, html_pattern, start_styles};
pub use matcher::{MatchSummary, RuleMatch, RuleMatcher, pattern_matches};
pub use rule::{PatternEntry, Rule, RuleClass, StyleValue, TEXT_MARKER};
pub use store::RuleStore;
pub use target::{BodyChild, MatchTarget, style_changes_source};
