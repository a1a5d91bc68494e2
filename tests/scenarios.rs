use layout_reducer::api;
use layout_reducer::merge::{NodeData, SubjectView, generalize};
use layout_reducer::model::{Element, ElementTree, RunSubject, StyleMap};
use layout_reducer::reduce::{Outcome, ReduceOptions, Reducer, ReductionStepProvider, ReductionVerdict};
use layout_reducer::rules::{BodyChild, MatchTarget, PatternEntry, Rule, RuleMatcher, RuleStore, StyleValue};
use std::collections::VecDeque;

#[test]
fn removing_a_parent_cascades_to_child_styles() {
    let tree = ElementTree::new(vec![Element::element("div", "1", vec![Element::element("div", "2", vec![])])]);
    let mut overrides = StyleMap::overrides();
    overrides.set("2", "color", "red");
    let mut subject = RunSubject::new(tree, StyleMap::baseline(), overrides);

    subject.remove_element("1");

    assert!(subject.tree().is_empty());
    assert!(subject.overrides().is_empty());
    subject.remove_element("1");
    assert!(subject.tree().is_empty());
}

fn failing_subject(start_id: &str, sibling: &str, width: &str) -> RunSubject {
    let tree = ElementTree::new(vec![
        Element::element("header", "h", vec![]),
        Element::element(
            "section",
            "s",
            vec![Element::element(sibling, "x", vec![]), Element::element("div", start_id, vec![])],
        ),
    ]);
    let mut baseline = StyleMap::baseline();
    baseline.set(start_id, "display", "block");
    let mut overrides = StyleMap::overrides();
    overrides.set(start_id, "display", "none");
    overrides.set(start_id, "width", width);
    RunSubject::new(tree, baseline, overrides)
}

#[test]
fn generalizing_two_failures_keeps_the_shared_cause() {
    let views = [
        SubjectView::from_subject(&failing_subject("7", "p", "10px")),
        SubjectView::from_subject(&failing_subject("9", "span", "20px")),
    ];
    let g = generalize(&views).unwrap();

    let start = g.start_facts().unwrap();
    assert_eq!(start.style.get("display").map(String::as_str), Some("none"));
    assert_eq!(start.modified_style.get("display").map(String::as_str), Some("none"));
    assert_eq!(start.modified_style.get("width").map(String::as_str), Some("diff"));
    assert_eq!(start.id, "diff");

    let parent = g.tree.parent(g.start).unwrap();
    assert_ne!(g.tree.data(parent), &NodeData::Empty);
    assert_eq!(g.tree.data(parent).tag(), "section");

    let siblings = g.tree.children(parent);
    assert_eq!(g.tree.data(siblings[0]), &NodeData::Empty);
}

struct Scripted(VecDeque<RunSubject>);

impl ReductionStepProvider for Scripted {
    fn next(&mut self, _current: &RunSubject) -> Option<RunSubject> {
        self.0.pop_front()
    }
}

#[test]
fn three_accepted_candidates_cost_four_oracle_calls() {
    let ids = ["1", "2", "3", "4"];
    let full = RunSubject::from_tree(ElementTree::new(ids.iter().map(|id| Element::element("div", *id, vec![])).collect()));
    let mut candidates = VecDeque::new();
    let mut current = full.clone();
    for id in &ids[1..] {
        current.remove_element(id);
        candidates.push_back(current.clone());
    }
    let third = candidates[2].clone();

    let mut provider = Scripted(candidates);
    let mut calls = 0;
    let mut oracle = |_: &RunSubject| -> layout_reducer::Result<Outcome> {
        calls += 1;
        Ok(Outcome::Crash)
    };
    let reduction = Reducer::new(&mut provider, &mut oracle).run_with_metrics(full).unwrap();

    assert_eq!(reduction.subject, third);
    assert_eq!(reduction.metrics.oracle_calls, 4);
    assert_eq!(reduction.metrics.accepted(), 3);
    assert_eq!(reduction.verdict, ReductionVerdict::Minimal);
    assert_eq!(calls, 4);
}

#[test]
fn pattern_window_matches_only_in_order() {
    let rule = Rule::new(
        "TextThenDiv",
        vec![("display".to_string(), StyleValue::from("none"))],
        vec![PatternEntry::Text, PatternEntry::tag("div")],
    );
    let matcher = RuleMatcher::new(&[rule]).unwrap();
    let script = "one.style[\"display\"] = \"none\";";

    let hit = MatchTarget::new(
        vec![BodyChild::Text("a".into()), BodyChild::element("div"), BodyChild::element("span")],
        script,
    );
    let miss = MatchTarget::new(
        vec![BodyChild::element("div"), BodyChild::Text("a".into()), BodyChild::element("span")],
        script,
    );
    assert!(matcher.matches(&hit));
    assert!(!matcher.matches(&miss));
}

#[test]
fn learned_rule_skips_the_next_occurrence() {
    let dir = tempfile::tempdir().unwrap();
    let rules_path = dir.path().join("rules.json");

    let rule = api::learn_rule(
        &[failing_subject("7", "p", "10px"), failing_subject("9", "p", "20px")],
        Some("SectionDisplayNone"),
    )
    .unwrap();
    assert!(RuleStore::append_to_file(&rules_path, rule).unwrap());

    let store = RuleStore::load(&rules_path).unwrap();
    let matcher = RuleMatcher::new(store.rules()).unwrap();
    let mut calls = 0;
    let mut oracle = |_: &RunSubject| -> layout_reducer::Result<Outcome> {
        calls += 1;
        Ok(Outcome::LayoutBug(vec!["#11 height".into()]))
    };
    let triage =
        api::triage(failing_subject("11", "p", "30px"), &mut oracle, Some(&matcher), &ReduceOptions::default())
            .unwrap();

    match triage {
        api::Triage::KnownBug { rule, .. } => assert_eq!(rule, "SectionDisplayNone"),
        api::Triage::Reduced { .. } => panic!("a learned rule should have matched"),
    }
    assert_eq!(calls, 1);
}

fn hidden_under(parent_tag: &str, start_id: &str) -> RunSubject {
    let tree = ElementTree::new(vec![Element::element(
        parent_tag,
        "p",
        vec![Element::element("div", start_id, vec![])],
    )]);
    let mut overrides = StyleMap::overrides();
    overrides.set(start_id, "display", "none");
    RunSubject::new(tree, StyleMap::baseline(), overrides)
}

#[test]
fn rule_learned_across_diverging_parents_matches_its_inputs() {
    let inputs = [hidden_under("section", "4"), hidden_under("article", "5")];
    let rule = api::learn_rule(&inputs, Some("HiddenAnywhere")).unwrap();
    assert!(rule.rule_class.html_pattern.is_empty());
    assert_eq!(rule.rule_class.style, vec![("display".to_string(), StyleValue::from("none"))]);

    let matcher = RuleMatcher::new(&[rule]).unwrap();
    for input in &inputs {
        assert!(matcher.matches(&MatchTarget::from_subject(input)));
    }
}
