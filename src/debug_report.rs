use layout_reducer::api::{CheckReport, Triage};
use layout_reducer::merge::{DiffMask, Generalized, NodeData, NodeId};
use layout_reducer::model::{Element, RunSubject};
use layout_reducer::reduce::{Outcome, Reduction};
use layout_reducer::rules::{MatchSummary, Rule, RuleMatch};
use std::path::Path;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

use ansi::Palette;

fn section(palette: &Palette, title: &str) {
    println!("\n{}", palette.paint(format!("━━━ {title} ━━━"), ansi::GRAY));
}

fn outcome_label(outcome: &Outcome, palette: &Palette) -> String {
    match outcome {
        Outcome::Pass => palette.paint(outcome.label(), ansi::GREEN),
        Outcome::LayoutBug(_) => palette.paint(outcome.label(), ansi::YELLOW),
        Outcome::Crash => palette.paint(outcome.label(), ansi::RED),
        Outcome::Timeout => palette.dim(outcome.label()),
    }
}

pub fn print_subject(path: &Path, subject: &RunSubject, color: bool) {
    let palette = Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Subject: {}", path.display()), ansi::CYAN)));

    section(&palette, "Summary");
    println!("  size:      {}", palette.paint(subject.size().to_string(), ansi::GREEN));
    println!("  signature: {}", palette.paint(subject.signature(), ansi::BLUE));

    section(&palette, "Tree");
    if subject.tree().is_empty() {
        println!("{}", palette.dim("  (empty)"));
    }
    for node in subject.tree().roots() {
        print_element(subject, node, 1, &palette);
    }

    section(&palette, "Overrides");
    if subject.overrides().is_empty() {
        println!("{}", palette.dim("  (none)"));
    }
    for (id, decls) in subject.overrides().iter() {
        let pairs: Vec<String> = decls.iter().map(|(p, v)| format!("{p}: {v}")).collect();
        println!("  {} {}", palette.paint(format!("#{id}"), ansi::CYAN), pairs.join("; "));
    }
    println!();
}

fn print_element(subject: &RunSubject, node: &Element, depth: usize, palette: &Palette) {
    let indent = "  ".repeat(depth);
    match node {
        Element::Text(leaf) => println!("{indent}{}", palette.dim(format!("{:?}", leaf.text))),
        Element::Element(el) => {
            let marker = if subject.overrides().contains(&el.id) { palette.paint(" *", ansi::YELLOW) } else { String::new() };
            println!("{indent}{}{}{marker}", el.tag, palette.dim(format!("#{}", el.id)));
            for child in &el.children {
                print_element(subject, child, depth + 1, palette);
            }
        }
    }
}

pub fn print_matches(matches: &[RuleMatch<'_>], summary: &MatchSummary, color: bool) {
    let palette = Palette::new(color);
    section(&palette, "Known-bug rules");
    if matches.is_empty() {
        println!("{}", palette.dim("  No rules loaded"));
    }
    for m in matches {
        let verdict = if m.is_match() { palette.paint("MATCH", ansi::GREEN) } else { palette.dim("miss") };
        let style = match m.style_hit {
            Some((p, v)) => format!("{p}: {v}"),
            None => "-".to_string(),
        };
        println!(
            "  {} {} {} pattern={} style={}",
            verdict,
            palette.bold(&m.rule.name),
            palette.dim("│"),
            m.pattern_found,
            style
        );
    }
    println!("  {}", palette.dim(summary.to_string()));
}

pub fn print_triage(triage: &Triage, color: bool) {
    match triage {
        Triage::KnownBug { rule, outcome, summary } => {
            let palette = Palette::new(color);
            section(&palette, "Triage");
            println!(
                "  {} matched rule {}; re-test: {}",
                palette.paint("skipped", ansi::YELLOW),
                palette.bold(rule),
                outcome_label(outcome, &palette)
            );
            println!("  {}", palette.dim(summary.to_string()));
            println!();
        }
        Triage::Reduced { reduction, .. } => print_reduction(reduction, color),
    }
}

pub fn print_reduction(reduction: &Reduction, color: bool) {
    let palette = Palette::new(color);
    let metrics = &reduction.metrics;

    section(&palette, "Reduction");
    for (idx, step) in metrics.steps.iter().enumerate() {
        let status = if step.accepted { palette.paint("ACCEPTED", ansi::GREEN) } else { palette.dim("REJECTED") };
        println!(
            "  {} {} {} {}",
            palette.paint(format!("STEP {idx:06}"), ansi::GRAY),
            status,
            outcome_label(&step.outcome, &palette),
            palette.dim(format!("{} ({:?})", step.candidate_size, step.duration)),
        );
    }
    if metrics.budget_exhausted {
        println!("  {}", palette.paint("oracle budget exhausted", ansi::YELLOW));
    }
    if metrics.provider_violation {
        println!("  {}", palette.paint("provider proposed a non-shrinking candidate", ansi::RED));
    }

    section(&palette, "Result");
    println!("  final:   {}", outcome_label(&reduction.outcome, &palette));
    let verdict = if reduction.verdict.is_reportable() {
        palette.paint(reduction.verdict.describe(), ansi::GREEN)
    } else {
        palette.paint(reduction.verdict.describe(), ansi::YELLOW)
    };
    println!("  verdict: {verdict}");
    println!(
        "  size:    {} → {}",
        palette.dim(metrics.initial_size.to_string()),
        palette.bold(reduction.subject.size().to_string())
    );

    section(&palette, "Timing");
    println!(
        "  Total: {}  │  Oracle calls: {}  │  Accepted: {}  │  Rejected: {}",
        palette.paint(format!("{:?}", metrics.total), ansi::GREEN),
        palette.paint(metrics.oracle_calls.to_string(), ansi::CYAN),
        metrics.accepted(),
        palette.dim(metrics.rejected().to_string()),
    );
    println!();
}

pub fn print_generalized(generalized: &Generalized, inputs: usize, color: bool) {
    let palette = Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Generalized {inputs} subjects"), ansi::CYAN)));
    section(&palette, "Tree");
    print_node(generalized, generalized.root, 1, &palette);
}

fn print_node(g: &Generalized, id: NodeId, depth: usize, palette: &Palette) {
    let indent = "  ".repeat(depth);
    let data = g.tree.data(id);
    let mask = data.diff_mask();
    let anchor = if id == g.start { palette.paint(" ◀ start", ansi::YELLOW) } else { String::new() };
    match data {
        NodeData::Empty => println!("{indent}{}", palette.paint("∅ empty", ansi::RED)),
        NodeData::Text(text) => {
            let shown = palette.dim(format!("{text:?}"));
            if mask.contains(DiffMask::TEXT) {
                println!("{indent}{}", palette.paint("text: diff", ansi::RED));
            } else {
                println!("{indent}{shown}");
            }
        }
        NodeData::Element(facts) => {
            let id_label = if mask.contains(DiffMask::ID) {
                palette.paint("#diff", ansi::RED)
            } else {
                palette.dim(format!("#{}", facts.id))
            };
            println!("{indent}{}{id_label}{anchor}", facts.tag);
            if !facts.modified_style.is_empty() {
                let pairs: Vec<String> = facts
                    .modified_style
                    .iter()
                    .map(|(p, v)| {
                        if mask.contains(DiffMask::MODIFIED_STYLE) && v == "diff" {
                            palette.paint(format!("{p}: diff"), ansi::RED)
                        } else {
                            palette.paint(format!("{p}: {v}"), ansi::GREEN)
                        }
                    })
                    .collect();
                println!("{indent}  {} {}", palette.dim("override:"), pairs.join("; "));
            }
        }
    }
    for &child in g.tree.children(id) {
        print_node(g, child, depth + 1, palette);
    }
}

pub fn print_rule(rule: &Rule, stored: Option<(&Path, bool)>, color: bool) {
    let palette = Palette::new(color);
    section(&palette, "Rule");
    match serde_json::to_string_pretty(rule) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("  {}", palette.paint(format!("cannot display rule: {err}"), ansi::RED)),
    }
    if let Some((path, added)) = stored {
        let status =
            if added { palette.paint("added to", ansi::GREEN) } else { palette.dim("already present in") };
        println!("  {status} {}", path.display());
    }
    println!();
}

pub fn print_check(report: &CheckReport, color: bool) {
    let palette = Palette::new(color);
    section(&palette, "Files");
    for file in &report.files {
        let status = match &file.result {
            Ok(Some(rule)) => palette.paint(format!("match ({rule})"), ansi::GREEN),
            Ok(None) => palette.dim("no match"),
            Err(err) => palette.paint(format!("ERROR: {err}"), ansi::RED),
        };
        println!("  {} {status}", file.path.display());
    }

    section(&palette, "Final Results");
    println!("  positive matches: {}", palette.paint(report.positives.to_string(), ansi::GREEN));
    println!("  negative matches: {}", palette.paint(report.negatives.to_string(), ansi::BLUE));
    if report.errors > 0 {
        println!("  errors:           {}", palette.paint(report.errors.to_string(), ansi::RED));
    }
    println!("  {}", palette.dim(report.summary.to_string()));
    println!();
}
