//! WHATWG-inspired HTML tokenizer state machine.
//!
//! Converts a stream of characters into [`HtmlToken`]s. Covers tags,
//! attributes in all three value syntaxes, comments, doctypes, raw text and
//! the common character references.

use crate::token::HtmlToken;

// ---------------------------------------------------------------------------
// Tokenizer states
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    TagOpen,
    EndTagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    MarkupDeclarationOpen,
    Comment,
    BogusComment,
    Doctype,
    RawText,
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// HTML tokenizer – call [`next_token`](Tokenizer::next_token) repeatedly
/// until you receive [`HtmlToken::EOF`].
pub struct Tokenizer {
    input: Vec<char>,
    pos: usize,
    state: State,

    current_tag_name: String,
    current_tag_is_end: bool,
    current_tag_self_closing: bool,
    current_attrs: Vec<(String, String)>,
    current_attr_name: String,
    current_attr_value: String,
    current_comment: String,

    // Raw-text end tag (for <style>, <script>)
    rawtext_end_tag: String,

    pending: Vec<HtmlToken>,
    done: bool,
}

impl Tokenizer {
    /// Create a new tokenizer for the given HTML source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            state: State::Data,
            current_tag_name: String::new(),
            current_tag_is_end: false,
            current_tag_self_closing: false,
            current_attrs: Vec::new(),
            current_attr_name: String::new(),
            current_attr_value: String::new(),
            current_comment: String::new(),
            rawtext_end_tag: String::new(),
            pending: Vec::new(),
            done: false,
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Check if the upcoming characters (case-insensitive) match `s`.
    /// Does NOT consume them.
    fn lookahead_ci(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, expected)| {
            self.input
                .get(self.pos + i)
                .is_some_and(|c| c.eq_ignore_ascii_case(&expected))
        })
    }

    fn start_new_tag(&mut self, is_end: bool) {
        self.current_tag_name.clear();
        self.current_tag_is_end = is_end;
        self.current_tag_self_closing = false;
        self.current_attrs.clear();
        self.current_attr_name.clear();
        self.current_attr_value.clear();
    }

    fn finish_attr(&mut self) {
        let name = std::mem::take(&mut self.current_attr_name);
        let value = std::mem::take(&mut self.current_attr_value);
        // First occurrence wins; later duplicates are dropped.
        if !name.is_empty() && !self.current_attrs.iter().any(|(n, _)| *n == name) {
            self.current_attrs.push((name, value));
        }
    }

    fn emit_current_tag(&mut self) -> HtmlToken {
        self.finish_attr();
        self.state = State::Data;
        if self.current_tag_is_end {
            HtmlToken::EndTag {
                name: std::mem::take(&mut self.current_tag_name),
            }
        } else {
            HtmlToken::StartTag {
                name: std::mem::take(&mut self.current_tag_name),
                attrs: std::mem::take(&mut self.current_attrs),
                self_closing: self.current_tag_self_closing,
            }
        }
    }

    fn eof(&mut self) -> HtmlToken {
        self.done = true;
        HtmlToken::EOF
    }

    /// Switch the tokenizer into raw-text mode. All characters are emitted as
    /// `Character` tokens until `</tag_name` (case-insensitive) is seen.
    pub fn switch_to_rawtext(&mut self, tag_name: &str) {
        self.rawtext_end_tag = tag_name.to_ascii_lowercase();
        self.state = State::RawText;
    }

    /// Decode a character reference; the leading `&` is already consumed.
    /// Unknown references are returned verbatim.
    fn consume_char_ref(&mut self) -> String {
        if self.peek() == Some('#') {
            let start = self.pos;
            self.pos += 1;
            let hex = matches!(self.peek(), Some('x') | Some('X'));
            if hex {
                self.pos += 1;
            }
            let digits_start = self.pos;
            while self
                .peek()
                .is_some_and(|c| if hex { c.is_ascii_hexdigit() } else { c.is_ascii_digit() })
            {
                self.pos += 1;
            }
            let digits: String = self.input[digits_start..self.pos].iter().collect();
            let code = u32::from_str_radix(&digits, if hex { 16 } else { 10 }).ok();
            if let Some(c) = code.and_then(char::from_u32) {
                if self.peek() == Some(';') {
                    self.pos += 1;
                }
                return c.to_string();
            }
            self.pos = start;
            return "&".to_string();
        }

        const NAMED: &[(&str, char)] = &[
            ("amp;", '&'),
            ("lt;", '<'),
            ("gt;", '>'),
            ("quot;", '"'),
            ("apos;", '\''),
            ("nbsp;", '\u{A0}'),
        ];
        for (name, ch) in NAMED {
            if self.lookahead_ci(name) {
                self.pos += name.len();
                return ch.to_string();
            }
        }
        "&".to_string()
    }

    // -----------------------------------------------------------------------
    // Public interface
    // -----------------------------------------------------------------------

    /// Return the next HTML token, or `HtmlToken::EOF` when done.
    pub fn next_token(&mut self) -> HtmlToken {
        loop {
            if !self.pending.is_empty() {
                return self.pending.remove(0);
            }
            if self.done {
                return HtmlToken::EOF;
            }

            match self.state {
                State::Data => match self.consume() {
                    Some('&') => {
                        let decoded = self.consume_char_ref();
                        self.pending.extend(decoded.chars().map(HtmlToken::Character));
                    }
                    Some('<') => self.state = State::TagOpen,
                    Some('\0') => return HtmlToken::Character('\u{FFFD}'),
                    Some(c) => return HtmlToken::Character(c),
                    None => return self.eof(),
                },

                State::TagOpen => match self.peek() {
                    Some('!') => {
                        self.consume();
                        self.state = State::MarkupDeclarationOpen;
                    }
                    Some('/') => {
                        self.consume();
                        self.state = State::EndTagOpen;
                    }
                    Some(c) if c.is_ascii_alphabetic() => {
                        self.start_new_tag(false);
                        self.state = State::TagName;
                    }
                    Some('?') => {
                        self.current_comment.clear();
                        self.state = State::BogusComment;
                    }
                    _ => {
                        self.state = State::Data;
                        return HtmlToken::Character('<');
                    }
                },

                State::EndTagOpen => match self.peek() {
                    Some(c) if c.is_ascii_alphabetic() => {
                        self.start_new_tag(true);
                        self.state = State::TagName;
                    }
                    Some('>') => {
                        self.consume();
                        self.state = State::Data;
                    }
                    None => {
                        self.pending.push(HtmlToken::Character('/'));
                        self.done = true;
                        return HtmlToken::Character('<');
                    }
                    _ => {
                        self.current_comment.clear();
                        self.state = State::BogusComment;
                    }
                },

                State::TagName => match self.consume() {
                    Some('\t' | '\n' | '\x0C' | ' ') => self.state = State::BeforeAttributeName,
                    Some('/') => self.state = State::SelfClosingStartTag,
                    Some('>') => return self.emit_current_tag(),
                    Some(c) => self.current_tag_name.push(c.to_ascii_lowercase()),
                    None => return self.eof(),
                },

                State::BeforeAttributeName => match self.peek() {
                    Some('\t' | '\n' | '\x0C' | ' ') => {
                        self.consume();
                    }
                    Some('/' | '>') | None => self.state = State::AfterAttributeName,
                    _ => {
                        self.current_attr_name.clear();
                        self.current_attr_value.clear();
                        self.state = State::AttributeName;
                    }
                },

                State::AttributeName => match self.peek() {
                    Some('\t' | '\n' | '\x0C' | ' ' | '/' | '>') | None => {
                        self.state = State::AfterAttributeName;
                    }
                    Some('=') => {
                        self.consume();
                        self.state = State::BeforeAttributeValue;
                    }
                    Some(c) => {
                        self.consume();
                        self.current_attr_name.push(c.to_ascii_lowercase());
                    }
                },

                State::AfterAttributeName => match self.peek() {
                    Some('\t' | '\n' | '\x0C' | ' ') => {
                        self.consume();
                    }
                    Some('/') => {
                        self.consume();
                        self.finish_attr();
                        self.state = State::SelfClosingStartTag;
                    }
                    Some('=') => {
                        self.consume();
                        self.state = State::BeforeAttributeValue;
                    }
                    Some('>') => {
                        self.consume();
                        return self.emit_current_tag();
                    }
                    None => return self.eof(),
                    _ => {
                        self.finish_attr();
                        self.state = State::AttributeName;
                    }
                },

                State::BeforeAttributeValue => match self.peek() {
                    Some('\t' | '\n' | '\x0C' | ' ') => {
                        self.consume();
                    }
                    Some('"') => {
                        self.consume();
                        self.state = State::AttributeValueDoubleQuoted;
                    }
                    Some('\'') => {
                        self.consume();
                        self.state = State::AttributeValueSingleQuoted;
                    }
                    Some('>') => {
                        self.consume();
                        return self.emit_current_tag();
                    }
                    _ => self.state = State::AttributeValueUnquoted,
                },

                State::AttributeValueDoubleQuoted | State::AttributeValueSingleQuoted => {
                    let quote = if self.state == State::AttributeValueDoubleQuoted {
                        '"'
                    } else {
                        '\''
                    };
                    match self.consume() {
                        Some(c) if c == quote => {
                            self.finish_attr();
                            self.state = State::AfterAttributeValueQuoted;
                        }
                        Some('&') => {
                            let decoded = self.consume_char_ref();
                            self.current_attr_value.push_str(&decoded);
                        }
                        Some(c) => self.current_attr_value.push(c),
                        None => return self.eof(),
                    }
                }

                State::AttributeValueUnquoted => match self.peek() {
                    Some('\t' | '\n' | '\x0C' | ' ') => {
                        self.consume();
                        self.finish_attr();
                        self.state = State::BeforeAttributeName;
                    }
                    Some('>') => {
                        self.consume();
                        return self.emit_current_tag();
                    }
                    Some('&') => {
                        self.consume();
                        let decoded = self.consume_char_ref();
                        self.current_attr_value.push_str(&decoded);
                    }
                    Some(c) => {
                        self.consume();
                        self.current_attr_value.push(c);
                    }
                    None => return self.eof(),
                },

                State::AfterAttributeValueQuoted => match self.peek() {
                    Some('\t' | '\n' | '\x0C' | ' ') => {
                        self.consume();
                        self.state = State::BeforeAttributeName;
                    }
                    Some('/') => {
                        self.consume();
                        self.state = State::SelfClosingStartTag;
                    }
                    Some('>') => {
                        self.consume();
                        return self.emit_current_tag();
                    }
                    None => return self.eof(),
                    _ => self.state = State::BeforeAttributeName,
                },

                State::SelfClosingStartTag => match self.peek() {
                    Some('>') => {
                        self.consume();
                        self.current_tag_self_closing = true;
                        return self.emit_current_tag();
                    }
                    None => return self.eof(),
                    _ => self.state = State::BeforeAttributeName,
                },

                State::MarkupDeclarationOpen => {
                    if self.lookahead_ci("--") {
                        self.pos += 2;
                        self.current_comment.clear();
                        self.state = State::Comment;
                    } else if self.lookahead_ci("doctype") {
                        self.pos += "doctype".len();
                        self.current_comment.clear();
                        self.state = State::Doctype;
                    } else {
                        self.current_comment.clear();
                        self.state = State::BogusComment;
                    }
                }

                State::Comment => {
                    if self.lookahead_ci("-->") {
                        self.pos += 3;
                        self.state = State::Data;
                        return HtmlToken::Comment(std::mem::take(&mut self.current_comment));
                    }
                    match self.consume() {
                        Some(c) => self.current_comment.push(c),
                        None => {
                            self.done = true;
                            return HtmlToken::Comment(std::mem::take(&mut self.current_comment));
                        }
                    }
                }

                State::BogusComment => match self.consume() {
                    Some('>') => {
                        self.state = State::Data;
                        return HtmlToken::Comment(std::mem::take(&mut self.current_comment));
                    }
                    Some(c) => self.current_comment.push(c),
                    None => {
                        self.done = true;
                        return HtmlToken::Comment(std::mem::take(&mut self.current_comment));
                    }
                },

                State::Doctype => match self.consume() {
                    Some('>') | None => {
                        self.state = State::Data;
                        let name = std::mem::take(&mut self.current_comment)
                            .trim()
                            .to_ascii_lowercase();
                        return HtmlToken::Doctype { name };
                    }
                    Some(c) => self.current_comment.push(c),
                },

                State::RawText => {
                    if self.peek() == Some('<') && self.at_rawtext_end() {
                        self.pos += 2 + self.rawtext_end_tag.len();
                        while let Some(c) = self.consume() {
                            if c == '>' {
                                break;
                            }
                        }
                        self.state = State::Data;
                        return HtmlToken::EndTag {
                            name: std::mem::take(&mut self.rawtext_end_tag),
                        };
                    }
                    match self.consume() {
                        Some(c) => return HtmlToken::Character(c),
                        None => return self.eof(),
                    }
                }
            }
        }
    }

    /// `true` when the input at `pos` is `</` + the raw-text end tag name,
    /// followed by a tag-name terminator.
    fn at_rawtext_end(&self) -> bool {
        if self.input.get(self.pos + 1) != Some(&'/') || self.rawtext_end_tag.is_empty() {
            return false;
        }
        let name_start = self.pos + 2;
        let matched = self.rawtext_end_tag.chars().enumerate().all(|(i, expected)| {
            self.input
                .get(name_start + i)
                .is_some_and(|c| c.to_ascii_lowercase() == expected)
        });
        let after = self.input.get(name_start + self.rawtext_end_tag.len()).copied();
        matched && matches!(after, None | Some('>' | '/' | ' ' | '\t' | '\n' | '\x0C'))
    }

    /// Tokenize everything, returning all tokens including the final EOF.
    pub fn tokenize_all(&mut self) -> Vec<HtmlToken> {
        let mut out = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok == HtmlToken::EOF;
            out.push(tok);
            if is_eof {
                break;
            }
        }
        out
    }
}

// ===========================================================================
// Tests
// ===========================================================================
