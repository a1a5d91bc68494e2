//! Evaluating rules against a [`MatchTarget`].
//!
//! Every (property, value) requirement is compiled once into two regexes,
//! one for `x.style["prop"] = "value";` and one for `x.style.prop = "value";`,
//! and checked against the target's style-change source text.

use super::rule::{PatternEntry, Rule};
use super::target::{BodyChild, MatchTarget};
use crate::error::Result;
use regex::Regex;
use std::fmt;

#[derive(Debug)]
struct StyleCheck {
    property: String,
    value: String,
    bracket: Regex,
    dot: Regex,
}

impl StyleCheck {
    fn new(property: &str, value: &str) -> Result<Self> {
        let (p, v) = (regex::escape(property), regex::escape(value));
        Ok(StyleCheck {
            property: property.to_string(),
            value: value.to_string(),
            bracket: Regex::new(&format!(r#"\.style\[\s*['"]{p}['"]\s*\]\s*=\s*['"]{v}['"]\s*;"#))?,
            dot: Regex::new(&format!(r#"\.style\.\s*{p}\s*=\s*['"]{v}['"]\s*;"#))?,
        })
    }

    fn hits(&self, source: &str) -> bool {
        self.bracket.is_match(source) || self.dot.is_match(source)
    }
}

#[derive(Debug)]
struct CompiledRule {
    rule: Rule,
    checks: Vec<StyleCheck>,
}

/// The active rule set, compiled.
#[derive(Debug)]
pub struct RuleMatcher {
    rules: Vec<CompiledRule>,
}

/// Result of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub rule: &'a Rule,
    pub pattern_found: bool,
    /// First requirement found in the style source.
    pub style_hit: Option<(&'a str, &'a str)>,
}

impl RuleMatch<'_> {
    /// Both the pattern and a style requirement were found.
    pub fn is_match(&self) -> bool {
        self.pattern_found && self.style_hit.is_some()
    }
}

impl RuleMatcher {
    pub fn new(rules: &[Rule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let mut checks = Vec::new();
                for (property, value) in &rule.rule_class.style {
                    for v in value.values() {
                        checks.push(StyleCheck::new(property, v)?);
                    }
                }
                Ok(CompiledRule { rule: rule.clone(), checks })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RuleMatcher { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule, in store order.
    pub fn evaluate<'a>(&'a self, target: &MatchTarget) -> Vec<RuleMatch<'a>> {
        self.rules
            .iter()
            .map(|compiled| {
                let pattern_found = pattern_matches(&compiled.rule.rule_class.html_pattern, target.children());
                let style_hit = compiled
                    .checks
                    .iter()
                    .find(|check| check.hits(target.style_source()))
                    .map(|check| (check.property.as_str(), check.value.as_str()));
                RuleMatch { rule: &compiled.rule, pattern_found, style_hit }
            })
            .collect()
    }

    /// First rule that fully matches.
    pub fn first_match<'a>(&'a self, target: &MatchTarget) -> Option<&'a Rule> {
        self.evaluate(target).into_iter().find(RuleMatch::is_match).map(|m| m.rule)
    }

    pub fn matches(&self, target: &MatchTarget) -> bool {
        self.first_match(target).is_some()
    }
}

/// Whether some contiguous window of `children` satisfies `pattern` entry by
/// entry. An empty pattern is the empty run and matches any body, so the
/// style requirement alone decides.
pub fn pattern_matches(pattern: &[PatternEntry], children: &[BodyChild]) -> bool {
    if pattern.is_empty() {
        return true;
    }
    if pattern.len() > children.len() {
        return false;
    }
    children.windows(pattern.len()).any(|window| pattern.iter().zip(window).all(|(entry, child)| entry.matches(child)))
}

/// Tally of rule evaluations by which half of the rule was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub pattern_and_style: usize,
    pub pattern_only: usize,
    pub style_only: usize,
    pub none: usize,
}

impl MatchSummary {
    pub fn record(&mut self, m: &RuleMatch<'_>) {
        match (m.pattern_found, m.style_hit.is_some()) {
            (true, true) => self.pattern_and_style += 1,
            (true, false) => self.pattern_only += 1,
            (false, true) => self.style_only += 1,
            (false, false) => self.none += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pattern_and_style + self.pattern_only + self.style_only + self.none
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pattern+style: {}, pattern only: {}, style only: {}, none: {}",
            self.pattern_and_style, self.pattern_only, self.style_only, self.none
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::StyleValue;

    fn children(shapes: &[&str]) -> Vec<BodyChild> {
        shapes
            .iter()
            .map(|s| if *s == "text" { BodyChild::Text("t".into()) } else { BodyChild::element(*s) })
            .collect()
    }

    fn rule(style: &[(&str, &str)]) -> Rule {
        Rule::new(
            "r",
            style.iter().map(|(p, v)| (p.to_string(), StyleValue::from(*v))),
            vec![PatternEntry::Text, PatternEntry::tag("div")],
        )
    }

    #[test]
    fn window_must_be_contiguous() {
        let pattern = [PatternEntry::Text, PatternEntry::tag("div")];
        assert!(pattern_matches(&pattern, &children(&["text", "div", "span"])));
        assert!(pattern_matches(&pattern, &children(&["span", "text", "div"])));
        assert!(!pattern_matches(&pattern, &children(&["div", "text", "span"])));
        assert!(!pattern_matches(&pattern, &children(&["text", "span", "div"])));
    }

    #[test]
    fn empty_pattern_leaves_the_decision_to_style() {
        assert!(pattern_matches(&[], &children(&["text"])));
        assert!(pattern_matches(&[], &[]));

        let bare = Rule::new("bare", vec![("display".to_string(), StyleValue::from("none"))], Vec::new());
        let matcher = RuleMatcher::new(&[bare]).unwrap();
        assert!(matcher.matches(&MatchTarget::new(children(&["span"]), "one.style[\"display\"] = \"none\";")));
        assert!(!matcher.matches(&MatchTarget::new(children(&["span"]), "one.style[\"color\"] = \"red\";")));
    }

    #[test]
    fn style_check_reads_both_assignment_forms() {
        let matcher = RuleMatcher::new(&[rule(&[("display", "inline")])]).unwrap();
        let kids = children(&["text", "div"]);

        let bracket = MatchTarget::new(kids.clone(), "one.style[\"display\"] = \"inline\";");
        let dot = MatchTarget::new(kids.clone(), "one.style.display = 'inline';");
        let other = MatchTarget::new(kids, "one.style[\"display\"] = \"inline-block\";");
        assert!(matcher.matches(&bracket));
        assert!(matcher.matches(&dot));
        assert!(!matcher.matches(&other));
    }

    #[test]
    fn values_with_regex_metacharacters_are_literal() {
        let matcher = RuleMatcher::new(&[rule(&[("width", "calc(1px + 2%)")])]).unwrap();
        let hit = MatchTarget::new(children(&["text", "div"]), "a.style[\"width\"] = \"calc(1px + 2%)\";");
        let miss = MatchTarget::new(children(&["text", "div"]), "a.style[\"width\"] = \"calc1px  2%\";");
        assert!(matcher.matches(&hit));
        assert!(!matcher.matches(&miss));
    }

    #[test]
    fn any_of_values_are_alternatives() {
        let r = Rule::new(
            "r",
            vec![("display".to_string(), StyleValue::AnyOf(vec!["flex".into(), "grid".into()]))],
            vec![PatternEntry::tag("div")],
        );
        let matcher = RuleMatcher::new(&[r]).unwrap();
        let target = MatchTarget::new(children(&["div"]), "x.style[\"display\"] = \"grid\";");
        let result = matcher.evaluate(&target);
        assert_eq!(result[0].style_hit, Some(("display", "grid")));
    }

    #[test]
    fn summary_tallies_each_half() {
        let matcher = RuleMatcher::new(&[rule(&[("display", "inline")]), rule(&[("color", "red")])]).unwrap();
        let target = MatchTarget::new(children(&["text", "div"]), "one.style[\"display\"] = \"inline\";");
        let mut summary = MatchSummary::default();
        for m in matcher.evaluate(&target) {
            summary.record(&m);
        }
        assert_eq!(summary, MatchSummary { pattern_and_style: 1, pattern_only: 1, style_only: 0, none: 0 });
        assert_eq!(summary.total(), 2);
    }
}
