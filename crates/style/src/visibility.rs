//! Rendered-or-not resolution for the `display` property.
//!
//! A node is rendered when neither it nor any ancestor computes to
//! `display: none`. Author styles come from every `<style>` element in the
//! document, in tree order, on top of a small user-agent sheet.

use css::{parse_stylesheet, Stylesheet};
use dom::{Dom, NodeId};

use crate::cascade::{cascaded_declaration, collect_matching_rules, StyleOrigin};

/// Elements the user agent never renders, plus the `hidden` attribute.
pub const USER_AGENT_CSS: &str = "[hidden], head, script, style, template { display: none; }";

/// The stylesheets in effect for a document, ready for repeated queries.
pub struct StyleSet {
    sheets: Vec<(Stylesheet, StyleOrigin)>,
}

impl StyleSet {
    /// Parse the user-agent sheet and every `<style>` under `root`.
    pub fn collect(dom: &Dom, root: NodeId) -> Self {
        let mut sheets = vec![(parse_stylesheet(USER_AGENT_CSS), StyleOrigin::UserAgent)];
        sheets.extend(
            collect_style_text(dom, root)
                .iter()
                .map(|text| (parse_stylesheet(text), StyleOrigin::Author)),
        );
        Self { sheets }
    }

    /// The cascaded `display` keyword of an element, lowercased.
    /// `None` means nothing set it (the initial value applies).
    pub fn display(&self, dom: &Dom, node: NodeId) -> Option<String> {
        let matched = collect_matching_rules(dom, node, &self.sheets);
        cascaded_declaration(&matched, "display").and_then(|d| d.keyword())
    }

    /// Whether `node` and all its ancestors avoid `display: none`.
    pub fn is_rendered(&self, dom: &Dom, node: NodeId) -> bool {
        std::iter::once(node)
            .chain(dom.ancestors(node))
            .filter(|&n| dom.element(n).is_some())
            .all(|n| self.display(dom, n).as_deref() != Some("none"))
    }
}

/// Text of every `<style>` element under `root`, in tree order.
pub fn collect_style_text(dom: &Dom, root: NodeId) -> Vec<String> {
    dom.get_elements_by_tag(root, "style")
        .into_iter()
        .map(|s| dom.text_content(s))
        .collect()
}
