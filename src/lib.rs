//! Snippet switch: option groups that show or hide pre-authored snippets.
//!
//! Each group (operating system, language version, ...) keeps one CSS
//! exclusion rule in its own `<style>` slot. A snippet names the values it
//! applies to through condition attributes such as `snippet-os="mac"`; it
//! is visible only while every group it names has that value selected.
//! Selection changes rewrite a single slot and never touch the snippets.
//!
//! ```
//! use snippet_switch::{OptionGroup, OptionItem, Widget, WidgetConfig};
//!
//! let (mut dom, doc) = html::parse_document(
//!     r#"<div id="docs"><pre snippet-os="mac">brew install x</pre></div>"#,
//! );
//! let groups = [OptionGroup::single("os")
//!     .option(OptionItem::new("mac"))
//!     .option(OptionItem::new("linux"))];
//! let mut widget =
//!     Widget::mount_by_id(&mut dom, doc, "docs", Some(&groups), WidgetConfig::default())?;
//! assert_eq!(widget.visible_snippets(&dom).len(), 1);
//! widget.select(&mut dom, "os", "linux")?;
//! assert!(widget.visible_snippets(&dom).is_empty());
//! # Ok::<(), snippet_switch::WidgetError>(())
//! ```

pub mod config;
pub mod container;
pub mod dispatch;
pub mod error;
pub mod group;
pub mod logging;
pub mod markup;
pub mod resolver;
pub mod widget;

pub use config::{AttributeNames, PageConfig, WidgetConfig, DEFAULT_ATTRIBUTE_PREFIX};
pub use dispatch::{Dispatcher, SelectionChanged};
pub use error::{Result, WidgetError};
pub use group::{resolve_groups, validate_groups, Arity, GroupSource, OptionGroup, OptionItem};
pub use resolver::{build_rule, rule_text, Recomputed};
pub use widget::Widget;
