//! Selector matching: determine whether a DOM element matches a CSS selector.
//!
//! Complex selectors are matched **right-to-left**: we start with the rightmost
//! (subject) compound selector, then walk up through the DOM tree
//! following each combinator.

use css::{AttrOp, Combinator, ComplexSelector, CompoundSelector, PseudoClass, SimpleSelector};
use dom::{form, Dom, ElementData, NodeId};

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Test whether the element `node_id` matches a full complex selector.
///
/// Returns `false` if `node_id` does not refer to an element.
pub fn matches_selector(dom: &Dom, node_id: NodeId, selector: &ComplexSelector) -> bool {
    let Some((subject, first_combinator)) = selector.parts.first() else {
        return false;
    };
    if !matches_compound(dom, node_id, subject) {
        return false;
    }
    matches_from(dom, node_id, *first_combinator, &selector.parts[1..])
}

/// Match `rest` leftward from `current`, linked by `combinator`.
///
/// Descendant steps backtrack: if the nearest matching ancestor fails
/// further left, farther ones are tried.
fn matches_from(
    dom: &Dom,
    current: NodeId,
    combinator: Option<Combinator>,
    rest: &[(CompoundSelector, Option<Combinator>)],
) -> bool {
    let Some(((compound, next_combinator), tail)) = rest.split_first() else {
        return true;
    };

    match combinator {
        Some(Combinator::Descendant) => {
            let mut ancestor = parent_element(dom, current);
            while let Some(anc_id) = ancestor {
                if matches_compound(dom, anc_id, compound)
                    && matches_from(dom, anc_id, *next_combinator, tail)
                {
                    return true;
                }
                ancestor = parent_element(dom, anc_id);
            }
            false
        }
        Some(Combinator::Child) => match parent_element(dom, current) {
            Some(parent_id) if matches_compound(dom, parent_id, compound) => {
                matches_from(dom, parent_id, *next_combinator, tail)
            }
            _ => false,
        },
        // Only the leftmost part carries no combinator.
        None => false,
    }
}

/// Test whether the element `node_id` matches a compound selector (all simples must match).
pub fn matches_compound(dom: &Dom, node_id: NodeId, compound: &CompoundSelector) -> bool {
    let Some(elem) = dom.element(node_id) else {
        return false;
    };
    compound
        .simples
        .iter()
        .all(|simple| matches_simple_inner(dom, node_id, elem, simple))
}

/// Test whether the element `node_id` matches a single simple selector.
pub fn matches_simple(dom: &Dom, node_id: NodeId, simple: &SimpleSelector) -> bool {
    dom.element(node_id)
        .is_some_and(|elem| matches_simple_inner(dom, node_id, elem, simple))
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────────────────────────

fn matches_simple_inner(
    dom: &Dom,
    node_id: NodeId,
    elem: &ElementData,
    simple: &SimpleSelector,
) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(tag) => elem.tag_name.eq_ignore_ascii_case(tag),
        SimpleSelector::Id(id) => elem.id.as_deref() == Some(id.as_str()),
        SimpleSelector::Class(cls) => elem.classes.iter().any(|c| c == cls),
        SimpleSelector::Attribute { name, op, value } => {
            matches_attribute(elem, name, *op, value.as_deref())
        }
        SimpleSelector::PseudoClass(pc) => matches_pseudo_class(dom, node_id, elem, pc),
    }
}

fn matches_attribute(elem: &ElementData, name: &str, op: AttrOp, value: Option<&str>) -> bool {
    let Some(attr_val) = elem.attr(name) else {
        return false;
    };
    let Some(v) = value else {
        return op == AttrOp::Exists;
    };
    match op {
        AttrOp::Exists => true,
        AttrOp::Eq => attr_val == v,
        AttrOp::Includes => attr_val.split_whitespace().any(|word| word == v),
        AttrOp::DashMatch => {
            attr_val == v || attr_val.strip_prefix(v).is_some_and(|rest| rest.starts_with('-'))
        }
        AttrOp::Prefix => !v.is_empty() && attr_val.starts_with(v),
        AttrOp::Suffix => !v.is_empty() && attr_val.ends_with(v),
        AttrOp::Substring => !v.is_empty() && attr_val.contains(v),
    }
}

fn matches_pseudo_class(dom: &Dom, node_id: NodeId, elem: &ElementData, pc: &PseudoClass) -> bool {
    match pc {
        PseudoClass::Not(inner) => !matches_compound(dom, node_id, inner),

        // Checkedness is live form state, not the `checked` attribute.
        PseudoClass::Checked => form::input_kind(dom, node_id).is_some() && elem.checked,
        PseudoClass::Disabled => is_form_control(elem) && elem.has_attr("disabled"),
        PseudoClass::Enabled => is_form_control(elem) && !elem.has_attr("disabled"),

        PseudoClass::FirstChild => prev_sibling_element(dom, node_id).is_none(),
        PseudoClass::LastChild => next_sibling_element(dom, node_id).is_none(),
    }
}

fn is_form_control(elem: &ElementData) -> bool {
    matches!(
        elem.tag_name.as_str(),
        "input" | "button" | "select" | "textarea" | "option" | "fieldset"
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// DOM traversal helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Get the parent of `node_id` if it is an element.
fn parent_element(dom: &Dom, node_id: NodeId) -> Option<NodeId> {
    let parent_id = dom.parent(node_id)?;
    dom.nodes
        .get(parent_id)
        .filter(|p| p.is_element())
        .map(|_| parent_id)
}

/// Get the immediately preceding sibling that is an element.
fn prev_sibling_element(dom: &Dom, node_id: NodeId) -> Option<NodeId> {
    let mut cursor = dom.nodes.get(node_id)?.prev_sibling;
    while let Some(sib_id) = cursor {
        let sib = dom.nodes.get(sib_id)?;
        if sib.is_element() {
            return Some(sib_id);
        }
        cursor = sib.prev_sibling;
    }
    None
}

/// Get the immediately following sibling that is an element.
fn next_sibling_element(dom: &Dom, node_id: NodeId) -> Option<NodeId> {
    let mut cursor = dom.nodes.get(node_id)?.next_sibling;
    while let Some(sib_id) = cursor {
        let sib = dom.nodes.get(sib_id)?;
        if sib.is_element() {
            return Some(sib_id);
        }
        cursor = sib.next_sibling;
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
