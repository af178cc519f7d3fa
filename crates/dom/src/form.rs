//! Form-control state for checkable inputs.
//!
//! Checkedness lives on [`ElementData::checked`](crate::ElementData). The
//! `checked` content attribute only seeds it; user activation goes through
//! [`activate`], which applies radio-group exclusivity the way a browser
//! does: checking a radio unchecks every other radio with the same `name`
//! in the same tree.

use crate::node::NodeId;
use crate::tree::Dom;

/// The checkable input types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Radio,
    Checkbox,
}

/// Classify `node` if it is an `<input type=radio|checkbox>`.
pub fn input_kind(dom: &Dom, node: NodeId) -> Option<InputKind> {
    let elem = dom.element(node)?;
    if elem.tag_name != "input" {
        return None;
    }
    match elem.attr("type") {
        Some(t) if t.eq_ignore_ascii_case("radio") => Some(InputKind::Radio),
        Some(t) if t.eq_ignore_ascii_case("checkbox") => Some(InputKind::Checkbox),
        _ => None,
    }
}

pub fn is_checked(dom: &Dom, node: NodeId) -> bool {
    dom.element(node).is_some_and(|e| e.checked)
}

pub fn is_disabled(dom: &Dom, node: NodeId) -> bool {
    dom.has_attr(node, "disabled")
}

/// Every other radio sharing `radio`'s group: same non-empty `name`, same tree.
pub fn radio_group_members(dom: &Dom, radio: NodeId) -> Vec<NodeId> {
    let Some(name) = dom.attr(radio, "name").filter(|n| !n.is_empty()) else {
        return Vec::new();
    };
    let root = dom.root_of(radio);
    dom.descendants(root)
        .into_iter()
        .filter(|&n| {
            n != radio
                && input_kind(dom, n) == Some(InputKind::Radio)
                && dom.attr(n, "name") == Some(name)
        })
        .collect()
}

/// Set the checkedness of a checkable input.
///
/// Returns every control whose checkedness actually changed, `node` first.
/// Checking a radio unchecks the rest of its group.
pub fn set_checked(dom: &mut Dom, node: NodeId, checked: bool) -> Vec<NodeId> {
    let Some(kind) = input_kind(dom, node) else {
        return Vec::new();
    };
    let mut changed = Vec::new();
    if write_checked(dom, node, checked) {
        changed.push(node);
    }
    if kind == InputKind::Radio && checked {
        for other in radio_group_members(dom, node) {
            if write_checked(dom, other, false) {
                changed.push(other);
            }
        }
    }
    changed
}

/// Apply click activation to an input.
///
/// A radio becomes checked; a checkbox toggles. Disabled controls and
/// non-checkable nodes are ignored. Returns the controls whose checkedness
/// changed; `change` should be fired only when `node` itself is among them.
pub fn activate(dom: &mut Dom, node: NodeId) -> Vec<NodeId> {
    if is_disabled(dom, node) {
        return Vec::new();
    }
    match input_kind(dom, node) {
        Some(InputKind::Radio) => set_checked(dom, node, true),
        Some(InputKind::Checkbox) => {
            let next = !is_checked(dom, node);
            set_checked(dom, node, next)
        }
        None => Vec::new(),
    }
}

fn write_checked(dom: &mut Dom, node: NodeId, checked: bool) -> bool {
    match dom.nodes.get_mut(node).and_then(|n| n.as_element_mut()) {
        Some(elem) if elem.checked != checked => {
            elem.checked = checked;
            true
        }
        _ => false,
    }
}
