//! CSS crate: tokenizer, selector engine and stylesheet parser.
//!
//! Stylesheets parse into an AST that also serializes back to CSS text, so
//! callers can build rules programmatically and write them into a page.
//! Zero external dependencies.

pub mod token;
pub mod selector;
pub mod parser;

pub use token::{CssToken, CssTokenizer};
pub use selector::{
    Combinator, SimpleSelector, CompoundSelector, ComplexSelector,
    AttrOp, PseudoClass, Specificity, compute_specificity, parse_selector_list,
};
pub use parser::{CssRule, Declaration, Stylesheet, parse_stylesheet};
