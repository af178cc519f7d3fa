//! # Style Engine
//!
//! Selector matching, cascade resolution, and `display`-based visibility.
//! Zero external dependencies beyond sibling workspace crates.

pub mod matching;
pub mod cascade;
pub mod visibility;

pub use matching::{matches_selector, matches_compound, matches_simple};
pub use cascade::{cascaded_declaration, collect_matching_rules, MatchedRule, StyleOrigin};
pub use visibility::{collect_style_text, StyleSet, USER_AGENT_CSS};
