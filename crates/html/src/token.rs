//! HTML token types produced by the tokenizer.

/// A single token emitted by the HTML tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlToken {
    /// A `<!DOCTYPE …>` token. Only the name is kept.
    Doctype { name: String },
    /// A start tag like `<input type="radio" checked>`.
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    /// An end tag like `</fieldset>`.
    EndTag { name: String },
    /// A comment like `<!-- text -->`.
    Comment(String),
    /// A single character of text content.
    Character(char),
    /// End of file.
    EOF,
}
