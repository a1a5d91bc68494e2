//! What a rule is matched against: the body-level children of a document
//! and the source text of its style-change routine.

use crate::materialize::{DEV_CONTROLS_ID, render_document};
use crate::model::{Element, NO_ID, RunSubject};
use std::collections::BTreeMap;

/// A visible child of `<body>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyChild {
    Text(String),
    Element { tag: String, attrs: BTreeMap<String, String> },
}

impl BodyChild {
    pub fn element(tag: impl Into<String>) -> Self {
        BodyChild::Element { tag: tag.into(), attrs: BTreeMap::new() }
    }

    fn is_blank_text(&self) -> bool {
        matches!(self, BodyChild::Text(t) if t.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTarget {
    children: Vec<BodyChild>,
    style_source: String,
}

impl MatchTarget {
    /// Whitespace-only text children are dropped.
    pub fn new(children: Vec<BodyChild>, style_source: impl Into<String>) -> Self {
        let children = children.into_iter().filter(|c| !c.is_blank_text()).collect();
        MatchTarget { children, style_source: style_source.into() }
    }

    /// Target for a subject, with the style source taken from the page the
    /// subject materializes to.
    pub fn from_subject(subject: &RunSubject) -> Self {
        let children = subject
            .tree()
            .roots()
            .iter()
            .filter_map(|node| match node {
                Element::Text(leaf) => Some(BodyChild::Text(leaf.text.clone())),
                Element::Element(el) if el.id == DEV_CONTROLS_ID => None,
                Element::Element(el) => {
                    let mut attrs = el.attrs.clone();
                    if el.id != NO_ID {
                        attrs.insert("id".to_string(), el.id.clone());
                    }
                    Some(BodyChild::Element { tag: el.tag.clone(), attrs })
                }
            })
            .collect();
        let source = style_changes_source(&render_document(subject)).unwrap_or_default();
        MatchTarget::new(children, source)
    }

    /// Target for an already parsed page: `children` are the body's
    /// children, `html` is the full page text.
    pub fn from_html_children(children: Vec<BodyChild>, html: &str) -> Self {
        MatchTarget::new(children, style_changes_source(html).unwrap_or_default())
    }

    pub fn children(&self) -> &[BodyChild] {
        &self.children
    }

    pub fn style_source(&self) -> &str {
        &self.style_source
    }
}

/// Body of `makeStyleChanges()` found in the page's scripts, if any.
pub fn style_changes_source(html: &str) -> Option<String> {
    let scripts: Vec<&str> = regex!(r"(?is)<script[^>]*>(.*?)</script>")
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();
    let js = scripts.join("\n");
    regex!(r"(?s)function\s+makeStyleChanges\s*\(\s*\)\s*\{(.*?)\}")
        .captures(&js)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
