//! Filter resolver: turns one group's selection into its exclusion rule.
//!
//! For group `G` with selected values `v1..vn` the rule is
//!
//! ```css
//! [P-results] [P-G]:not([P-G="v1"])...:not([P-G="vn"]) { display: none; }
//! ```
//!
//! Each group owns one `<style P-style="G">` slot and nothing else writes to
//! it. Rules of different groups key on different attributes, so a snippet
//! is hidden as soon as any one of them excludes it. The resolver never looks
//! at snippets; the style engine does.

use css::{ComplexSelector, CompoundSelector, CssRule, Declaration, SimpleSelector};
use dom::{form, Dom, EventListener, EventTargetMap, NodeId};
use tracing::debug;

use crate::config::AttributeNames;
use crate::dispatch::SelectionChanged;
use crate::error::{Result, WidgetError};
use crate::group::find_group_element;
use crate::markup::build_slot;

/// Outcome of one recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recomputed {
    pub group: String,
    /// Selected values, sorted and deduplicated.
    pub selected: Vec<String>,
    pub rule: String,
    /// Whether the slot text differs from before.
    pub changed: bool,
}

/// Checked values of the radios and checkboxes under `group_el`, in
/// document order. An input without `value` reports `on`.
pub fn read_selection(dom: &Dom, group_el: NodeId) -> Vec<String> {
    dom.descendants(group_el)
        .into_iter()
        .filter(|&n| form::input_kind(dom, n).is_some() && form::is_checked(dom, n))
        .map(|n| dom.attr(n, "value").unwrap_or("on").to_string())
        .collect()
}

/// The exclusion rule for `group_id` given its selection.
pub fn build_rule(names: &AttributeNames, group_id: &str, selected: &[String]) -> CssRule {
    let condition = names.condition(group_id);
    let mut values: Vec<&str> = selected.iter().map(String::as_str).collect();
    values.sort_unstable();
    values.dedup();

    let mut subject = vec![SimpleSelector::has_attr(&condition)];
    subject.extend(values.into_iter().map(|v| {
        SimpleSelector::not(CompoundSelector::new(vec![SimpleSelector::attr_eq(
            &condition, v,
        )]))
    }));

    let scope = CompoundSelector::new(vec![SimpleSelector::has_attr(&names.results)]);
    CssRule {
        selectors: vec![ComplexSelector::descendant(
            scope,
            CompoundSelector::new(subject),
        )],
        declarations: vec![Declaration::new("display", "none")],
    }
}

pub fn rule_text(names: &AttributeNames, group_id: &str, selected: &[String]) -> String {
    build_rule(names, group_id, selected).to_string()
}

/// The style slot of `group_id` under `root`.
pub fn find_slot(dom: &Dom, root: NodeId, names: &AttributeNames, group_id: &str) -> Option<NodeId> {
    dom.elements_with_attr(root, &names.style)
        .into_iter()
        .find(|&n| dom.attr(n, &names.style) == Some(group_id))
}

/// Return the group's slot, creating it as the last child of the group
/// element when the markup did not provide one.
pub fn ensure_slot(
    dom: &mut Dom,
    root: NodeId,
    group_el: NodeId,
    names: &AttributeNames,
    group_id: &str,
) -> NodeId {
    if let Some(slot) = find_slot(dom, root, names, group_id) {
        return slot;
    }
    let slot = build_slot(dom, group_id, names);
    dom.append_child(group_el, slot);
    slot
}

/// Rebuild and write the exclusion rule of one group.
///
/// The slot's previous content is replaced entirely; an unchanged selection
/// leaves it byte-identical.
pub fn recompute(
    dom: &mut Dom,
    root: NodeId,
    names: &AttributeNames,
    group_id: &str,
) -> Result<Recomputed> {
    let group_el = find_group_element(dom, root, names, group_id)
        .ok_or_else(|| WidgetError::unknown_group(group_id))?;
    let slot = find_slot(dom, root, names, group_id).ok_or_else(|| {
        WidgetError::GroupSlotMissing {
            group: group_id.to_string(),
        }
    })?;

    let mut selected = read_selection(dom, group_el);
    selected.sort_unstable();
    selected.dedup();
    let rule = rule_text(names, group_id, &selected);
    let changed = dom.text_content(slot) != rule;
    if changed {
        dom.set_text_content(slot, &rule);
    }
    debug!(group = group_id, selected = ?selected, changed, "recomputed exclusion rule");

    Ok(Recomputed {
        group: group_id.to_string(),
        selected,
        rule,
        changed,
    })
}

/// Subscribe the group element to bubbling `change` events from its inputs
/// and run the first recompute.
pub fn init_group(
    dom: &mut Dom,
    listeners: &mut EventTargetMap<SelectionChanged>,
    root: NodeId,
    names: &AttributeNames,
    group_id: &str,
) -> Result<Recomputed> {
    let group_el = find_group_element(dom, root, names, group_id)
        .ok_or_else(|| WidgetError::unknown_group(group_id))?;
    if listeners.listener_count(group_el, "change") == 0 {
        listeners.add_listener(
            group_el,
            EventListener::new("change", false, SelectionChanged::new(group_id)),
        );
    }
    recompute(dom, root, names, group_id)
}
