use serde::{Deserialize, Serialize};

use crate::error::{Result, WidgetError};
use crate::group::OptionGroup;

pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "snippet";

/// Attribute suffixes the widget uses for its own markers. A group id may
/// not take one of these, or its condition attribute would collide.
pub const RESERVED_SUFFIXES: &[&str] = &["group", "results", "style", "base"];

/// Widget options, fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Do not run the initial recompute on mount; the embedder calls
    /// [`Widget::init`](crate::Widget::init) when it is ready.
    #[serde(default, alias = "skipAutoInit")]
    pub skip_auto_init: bool,

    /// Prefix of every marker attribute and class name.
    #[serde(default = "default_prefix", alias = "attributePrefix")]
    pub attribute_prefix: String,

    /// Mount an empty widget instead of failing when no groups resolve.
    #[serde(default, alias = "degradeSilently")]
    pub degrade_silently: bool,
}

fn default_prefix() -> String {
    DEFAULT_ATTRIBUTE_PREFIX.to_string()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            skip_auto_init: false,
            attribute_prefix: default_prefix(),
            degrade_silently: false,
        }
    }
}

impl WidgetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_skip_auto_init(mut self, skip: bool) -> Self {
        self.skip_auto_init = skip;
        self
    }

    #[must_use]
    pub fn with_attribute_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attribute_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_degrade_silently(mut self, degrade: bool) -> Self {
        self.degrade_silently = degrade;
        self
    }

    /// Validate the prefix and derive every attribute and class name from it.
    ///
    /// The prefix must start with an ASCII letter and continue with ASCII
    /// letters, digits, `-` or `_`, so derived names are valid both as HTML
    /// attribute names and as CSS identifiers.
    pub fn attribute_names(&self) -> Result<AttributeNames> {
        let prefix = self.attribute_prefix.as_str();
        let mut chars = prefix.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(WidgetError::invalid(format!(
                "attribute prefix `{prefix}` must match [A-Za-z][A-Za-z0-9_-]*"
            )));
        }
        Ok(AttributeNames::new(&prefix.to_ascii_lowercase()))
    }
}

/// Attribute and class names derived from the prefix `P`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeNames {
    pub prefix: String,
    /// `P-group`, value is the group id.
    pub group: String,
    /// `P-results`, marks the element holding the snippets.
    pub results: String,
    /// `P-style`, on a group's `<style>` slot; value is the group id.
    pub style: String,
    /// `P-base`, on the default widget stylesheet.
    pub base: String,
    pub group_class: String,
    pub title_class: String,
    pub option_class: String,
}

impl AttributeNames {
    pub fn new(prefix: &str) -> Self {
        let name = |suffix: &str| format!("{prefix}-{suffix}");
        Self {
            prefix: prefix.to_string(),
            group: name("group"),
            results: name("results"),
            style: name("style"),
            base: name("base"),
            group_class: name("group"),
            title_class: name("title"),
            option_class: name("option"),
        }
    }

    /// `P-G`: the condition attribute a snippet uses for group `G`.
    pub fn condition(&self, group_id: &str) -> String {
        format!("{}-{}", self.prefix, group_id)
    }

    /// `name` of the inputs generated for group `G`.
    pub fn input_name(&self, group_id: &str) -> String {
        self.condition(group_id)
    }

    /// `id` of the input generated for option `O` of group `G`.
    pub fn input_id(&self, group_id: &str, option_id: &str) -> String {
        format!("{}-{}-{}", self.prefix, group_id, option_id)
    }

    /// The group id a condition attribute refers to, if `attr` is one.
    pub fn condition_group<'a>(&self, attr: &'a str) -> Option<&'a str> {
        let rest = attr
            .strip_prefix(self.prefix.as_str())
            .and_then(|r| r.strip_prefix('-'))?;
        let reserved = RESERVED_SUFFIXES.iter().any(|r| r.eq_ignore_ascii_case(rest));
        (!rest.is_empty() && !reserved).then_some(rest)
    }
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self::new(DEFAULT_ATTRIBUTE_PREFIX)
    }
}

/// A page file: widget options plus the explicit group list.
///
/// ```json
/// { "options": { "attribute_prefix": "snippet" },
///   "groups": [ { "id": "os", "arity": "single", "options": [ { "id": "mac", "default": true } ] } ] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageConfig {
    #[serde(default)]
    pub options: WidgetConfig,
    #[serde(default)]
    pub groups: Vec<OptionGroup>,
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
