//! Bug-class fingerprints.
//!
//! A signature is the sorted, comma-joined set of style tokens a subject
//! exercises: baseline `property:value` facts plus the names of overridden
//! properties. Directional and axis-specific property names are folded onto
//! abstract axis markers first, so `margin-left` and `margin-inline-end` land
//! on the same token.
//!
//! Substitutions are plain substring replacements applied in table order;
//! logical names (`block-start`, ...) must run before physical ones (`top`,
//! ...) or the logical names would be half-rewritten.

use std::collections::BTreeSet;

const AXIS_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("block-start", "[block]"),
    ("block-end", "[block]"),
    ("inline-start", "[inline]"),
    ("inline-end", "[inline]"),
    ("block-size", "[height]"),
    ("inline-size", "[width]"),
    ("left", "[inline]"),
    ("right", "[inline]"),
    ("top", "[block]"),
    ("bottom", "[block]"),
];

/// Fold directional names in a single token onto axis markers.
pub fn simplify_style_token(token: &str) -> String {
    AXIS_SUBSTITUTIONS.iter().fold(token.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Canonical signature string for a set of baseline and override tokens.
///
/// Only baseline tokens of the `property:value` form take part.
pub fn styles_signature(baseline_tokens: &BTreeSet<String>, override_tokens: &BTreeSet<String>) -> String {
    let tokens: BTreeSet<String> = baseline_tokens
        .iter()
        .filter(|token| token.contains(':'))
        .chain(override_tokens.iter())
        .map(|token| simplify_style_token(token))
        .collect();
    tokens.into_iter().collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn directional_names_collapse() {
        assert_eq!(simplify_style_token("margin-left"), "margin-[inline]");
        assert_eq!(simplify_style_token("margin-inline-end"), "margin-[inline]");
        assert_eq!(simplify_style_token("padding-block-start"), "padding-[block]");
        assert_eq!(simplify_style_token("max-block-size"), "max-[height]");
        assert_eq!(simplify_style_token("vertical-align:top"), "vertical-align:[block]");
    }

    #[test]
    fn signature_is_sorted_and_deduplicated() {
        let base = set(&["display:flex", "position:static"]);
        let over = set(&["left", "right", "width"]);
        assert_eq!(styles_signature(&base, &over), "[inline],display:flex,position:static,width");
    }

    #[test]
    fn baseline_tokens_without_colon_are_ignored() {
        let base = set(&["display"]);
        let over = set(&["color"]);
        assert_eq!(styles_signature(&base, &over), "color");
    }

    #[test]
    fn empty_inputs_give_empty_signature() {
        assert_eq!(styles_signature(&BTreeSet::new(), &BTreeSet::new()), "");
    }
}
