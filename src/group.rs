//! Group registry: the canonical list of option groups a widget manages.
//!
//! Groups come either from the embedder (an explicit list, usually
//! deserialized from a page file) or from scanning the container for
//! elements carrying the group-marker attribute.

use std::collections::HashSet;
use std::fmt;

use dom::{form, Dom, InputKind, NodeId};
use serde::{Deserialize, Serialize};

use crate::config::{AttributeNames, RESERVED_SUFFIXES};
use crate::error::{Result, WidgetError};

// ─────────────────────────────────────────────────────────────────────────────
// Data model
// ─────────────────────────────────────────────────────────────────────────────

/// How many options of a group may be selected at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arity {
    /// Exactly one option (radio buttons).
    #[default]
    Single,
    /// Zero or more options (checkboxes).
    Multiple,
}

impl Arity {
    pub fn input_type(self) -> &'static str {
        match self {
            Arity::Single => "radio",
            Arity::Multiple => "checkbox",
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Arity::Single => "single",
            Arity::Multiple => "multiple",
        })
    }
}

/// One selectable value of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    /// Unique within the group; doubles as the input's `value`.
    pub id: String,
    /// Label text; empty means "use the id".
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "selected")]
    pub default: bool,
}

impl OptionItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            default: false,
        }
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn selected(mut self) -> Self {
        self.default = true;
        self
    }

    pub fn label(&self) -> &str {
        if self.title.is_empty() { &self.id } else { &self.title }
    }
}

/// A named set of options. Immutable once the widget is mounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub arity: Arity,
    /// Empty for groups discovered by scanning.
    #[serde(default)]
    pub options: Vec<OptionItem>,
}

impl OptionGroup {
    pub fn new(id: impl Into<String>, arity: Arity) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            arity,
            options: Vec::new(),
        }
    }

    pub fn single(id: impl Into<String>) -> Self {
        Self::new(id, Arity::Single)
    }

    pub fn multiple(id: impl Into<String>) -> Self {
        Self::new(id, Arity::Multiple)
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn option(mut self, option: OptionItem) -> Self {
        self.options.push(option);
        self
    }

    pub fn label(&self) -> &str {
        if self.title.is_empty() { &self.id } else { &self.title }
    }

    pub fn find_option(&self, option_id: &str) -> Option<&OptionItem> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Where a widget's groups came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSource {
    /// Supplied by the embedder; markup is generated.
    Explicit,
    /// Discovered from `P-group` markers already in the document.
    Scanned,
}

impl fmt::Display for GroupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupSource::Explicit => "explicit",
            GroupSource::Scanned => "scanned",
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Produce the canonical group list.
///
/// A non-empty `explicit` list wins and is returned in input order.
/// Otherwise every element under `scan_root` with a `P-group` attribute
/// becomes a group, in document order. The result may be empty; the caller
/// decides whether that is an error.
pub fn resolve_groups(
    dom: &Dom,
    scan_root: NodeId,
    explicit: Option<&[OptionGroup]>,
    names: &AttributeNames,
) -> (Vec<OptionGroup>, GroupSource) {
    if let Some(groups) = explicit.filter(|g| !g.is_empty()) {
        return (groups.to_vec(), GroupSource::Explicit);
    }
    let scanned = dom
        .elements_with_attr(scan_root, &names.group)
        .into_iter()
        .filter_map(|el| scan_group(dom, el, names))
        .collect();
    (scanned, GroupSource::Scanned)
}

fn scan_group(dom: &Dom, el: NodeId, names: &AttributeNames) -> Option<OptionGroup> {
    let id = dom.attr(el, &names.group)?.to_string();
    let arity = match dom
        .descendants(el)
        .into_iter()
        .find_map(|n| form::input_kind(dom, n))
    {
        Some(InputKind::Checkbox) => Arity::Multiple,
        _ => Arity::Single,
    };
    let title = dom
        .get_elements_by_tag(el, "legend")
        .first()
        .map(|&legend| dom.text_content(legend).trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| id.clone());
    Some(OptionGroup {
        id,
        title,
        arity,
        options: Vec::new(),
    })
}

/// `true` for ids usable inside an attribute name and a CSS identifier.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Reject group lists the widget cannot render unambiguously.
///
/// Group ids end up inside attribute names, which compare ASCII
/// case-insensitively, so `OS` and `os` collide and `Results` is as
/// reserved as `results`. Generated input ids (`P-G-O`) must also stay
/// unique across groups.
pub fn validate_groups(groups: &[OptionGroup]) -> Result<()> {
    let mut seen = HashSet::new();
    let mut input_ids = HashSet::new();
    for group in groups {
        if !is_valid_id(&group.id) {
            return Err(WidgetError::invalid(format!(
                "group id `{}` must match [A-Za-z0-9_-]+",
                group.id
            )));
        }
        let folded = group.id.to_ascii_lowercase();
        if RESERVED_SUFFIXES.contains(&folded.as_str()) {
            return Err(WidgetError::invalid(format!(
                "group id `{}` is reserved",
                group.id
            )));
        }
        if !seen.insert(folded) {
            return Err(WidgetError::invalid(format!(
                "duplicate group id `{}`",
                group.id
            )));
        }
        let mut options = HashSet::new();
        for option in &group.options {
            if option.id.is_empty() {
                return Err(WidgetError::invalid(format!(
                    "group `{}` has an option with an empty id",
                    group.id
                )));
            }
            if !options.insert(option.id.as_str()) {
                return Err(WidgetError::invalid(format!(
                    "group `{}` lists option `{}` twice",
                    group.id, option.id
                )));
            }
            if !input_ids.insert(format!("{}-{}", group.id, option.id)) {
                return Err(WidgetError::invalid(format!(
                    "option `{}` of group `{}` would reuse another option's input id",
                    option.id, group.id
                )));
            }
        }
    }
    Ok(())
}

/// The element carrying `P-group="G"` under `root`.
pub fn find_group_element(
    dom: &Dom,
    root: NodeId,
    names: &AttributeNames,
    group_id: &str,
) -> Option<NodeId> {
    dom.elements_with_attr(root, &names.group)
        .into_iter()
        .find(|&n| dom.attr(n, &names.group) == Some(group_id))
}
