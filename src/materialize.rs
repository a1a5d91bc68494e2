//! Turning a subject into a loadable document.
//!
//! The page layout follows the generated test pages: the forest goes straight
//! into `<body>` with baseline styles inline, and every override becomes an
//! assignment inside `makeStyleChanges()`:
//!
//! ```text
//! function makeStyleChanges() {
//!     var one;
//!     one = document.getElementById("2");
//!     one.style["color"] = "red";
//! }
//! ```
//!
//! The rule matcher inspects exactly that script text, so the assignment
//! shape here and the patterns in `rules/target.rs` must agree.

use crate::error::Result;
use crate::model::{Element, ElementNode, NO_ID, RunSubject};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Id of the harness control panel some pages carry; never part of a test.
pub const DEV_CONTROLS_ID: &str = "lqc_dev_controls";

/// Converts a subject into a document an oracle can open.
pub trait Materializer {
    fn render(&mut self, subject: &RunSubject) -> Result<PathBuf>;
}

/// Writes numbered HTML files into a directory.
#[derive(Debug, Clone)]
pub struct FileMaterializer {
    dir: PathBuf,
    next_index: usize,
}

impl FileMaterializer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileMaterializer { dir: dir.into(), next_index: 0 }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Materializer for FileMaterializer {
    fn render(&mut self, subject: &RunSubject) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{:06}.html", self.next_index));
        self.next_index += 1;
        fs::write(&path, render_document(subject))?;
        Ok(path)
    }
}

/// Full HTML page for `subject`.
pub fn render_document(subject: &RunSubject) -> String {
    let mut body = String::new();
    for node in subject.tree().roots() {
        render_element(subject, node, 1, &mut body);
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<script>\n\
         function makeStyleChanges() {{\n{script}}}\n\
         </script>\n</head>\n<body>\n{body}</body>\n</html>\n",
        script = style_changes_script(subject),
        body = body,
    )
}

/// Body of `makeStyleChanges()`: one assignment per override declaration.
pub fn style_changes_script(subject: &RunSubject) -> String {
    let mut out = String::new();
    if subject.overrides().is_empty() {
        return out;
    }
    out.push_str("    var one;\n");
    for (id, decls) in subject.overrides().iter() {
        let _ = writeln!(out, "    one = document.getElementById({});", js_string(id));
        for (property, value) in decls {
            let _ = writeln!(out, "    one.style[{}] = {};", js_string(property), js_string(value));
        }
    }
    out
}

fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn render_element(subject: &RunSubject, node: &Element, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node {
        Element::Text(leaf) => {
            let _ = writeln!(out, "{indent}{}", v_htmlescape::escape(&leaf.text));
        }
        Element::Element(el) => {
            if el.id == DEV_CONTROLS_ID {
                return;
            }
            let _ = write!(out, "{indent}<{}{}>", el.tag, attributes(subject, el));
            if el.children.is_empty() {
                let _ = writeln!(out, "</{}>", el.tag);
                return;
            }
            out.push('\n');
            for child in &el.children {
                render_element(subject, child, depth + 1, out);
            }
            let _ = writeln!(out, "{indent}</{}>", el.tag);
        }
    }
}

fn attributes(subject: &RunSubject, el: &ElementNode) -> String {
    let mut out = String::new();
    if el.id != NO_ID {
        let _ = write!(out, " id=\"{}\"", v_htmlescape::escape(&el.id));
    }
    for (name, value) in &el.attrs {
        if name == "style" {
            continue;
        }
        let _ = write!(out, " {}=\"{}\"", name, v_htmlescape::escape(value));
    }
    if let Some(decls) = subject.baseline().get(&el.id) {
        let inline: Vec<String> = decls.iter().map(|(p, v)| format!("{p}: {v};")).collect();
        let _ = write!(out, " style=\"{}\"", v_htmlescape::escape(&inline.join(" ")));
    }
    out
}
