//! HTML crate: fragment tokenizer, tree builder and serializer.
//!
//! Parses widget markup into a [`dom::Dom`] tree and writes trees back out
//! as markup. Covers the subset a page fragment uses: elements, attributes,
//! text, comments, void elements and raw-text `<style>` / `<script>`.
//! Zero external dependencies.

pub mod token;
pub mod tokenizer;
pub mod tree_builder;
pub mod serialize;

pub use token::HtmlToken;
pub use tokenizer::Tokenizer;
pub use tree_builder::{TreeBuilder, parse_document, parse_fragment_into};
pub use serialize::{serialize, serialize_children};
