use std::fmt;

use crate::selector::{parse_selector_list_from_tokens, ComplexSelector};
use crate::token::{CssToken, CssTokenizer};

/// A CSS declaration (property: value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, e.g. `display`, lowercased.
    pub name: String,
    /// Value text with whitespace runs collapsed, e.g. `none`, `1px solid`.
    pub value: String,
    /// Whether `!important` was specified.
    pub important: bool,
}

impl Declaration {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
            important: false,
        }
    }

    /// The value as a single keyword, lowercased, if it is one.
    pub fn keyword(&self) -> Option<String> {
        let v = self.value.trim();
        (!v.is_empty() && !v.contains(char::is_whitespace)).then(|| v.to_ascii_lowercase())
    }
}

/// A CSS style rule: selectors + declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    /// The selector list for this rule.
    pub selectors: Vec<ComplexSelector>,
    /// The declarations in the rule body.
    pub declarations: Vec<Declaration>,
}

/// A parsed CSS stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// All rules in the stylesheet, in source order.
    pub rules: Vec<CssRule>,
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        f.write_str(";")
    }
}

impl fmt::Display for CssRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sel) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{sel}")?;
        }
        f.write_str(" {")?;
        for decl in &self.declarations {
            write!(f, " {decl}")?;
        }
        f.write_str(" }")
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

/// Parse a complete CSS stylesheet from a string.
///
/// Invalid rules and declarations are dropped, never fatal.
pub fn parse_stylesheet(input: &str) -> Stylesheet {
    let tokens = CssTokenizer::new(input).tokenize_all();
    Stylesheet {
        rules: parse_rules(&tokens),
    }
}

/// Parse a list of CSS rules from a token stream.
fn parse_rules(tokens: &[CssToken]) -> Vec<CssRule> {
    let mut rules = Vec::new();
    let mut pos = 0;

    loop {
        while tokens.get(pos) == Some(&CssToken::Whitespace) {
            pos += 1;
        }
        if pos >= tokens.len() {
            break;
        }

        // Conditional group rules are flattened: every condition is treated
        // as true. Other at-rules are skipped.
        if let CssToken::AtKeyword(name) = &tokens[pos] {
            match name.to_ascii_lowercase().as_str() {
                "media" | "supports" | "layer" | "container" => {
                    while pos < tokens.len() && tokens[pos] != CssToken::LBrace {
                        pos += 1;
                    }
                    if pos < tokens.len() {
                        let end = skip_block(tokens, pos);
                        let inner_end = if tokens.get(end - 1) == Some(&CssToken::RBrace) {
                            end - 1
                        } else {
                            end
                        };
                        rules.extend(parse_rules(&tokens[pos + 1..inner_end]));
                        pos = end;
                    }
                }
                _ => pos = skip_at_rule(tokens, pos),
            }
            continue;
        }

        match parse_qualified_rule(tokens, pos) {
            Ok((rule, new_pos)) => {
                rules.push(rule);
                pos = new_pos;
            }
            Err(new_pos) => pos = new_pos,
        }
    }

    rules
}

/// Skip an at-rule (consume until matching `;` or `{ ... }`).
fn skip_at_rule(tokens: &[CssToken], start: usize) -> usize {
    let mut pos = start + 1; // skip @keyword
    while let Some(tok) = tokens.get(pos) {
        match tok {
            CssToken::Semicolon => return pos + 1,
            CssToken::LBrace => return skip_block(tokens, pos),
            _ => pos += 1,
        }
    }
    pos
}

/// Skip a `{ ... }` block, handling nested blocks. Returns the position
/// after the closing `}`.
fn skip_block(tokens: &[CssToken], start: usize) -> usize {
    let mut pos = start + 1; // skip '{'
    let mut depth = 1;
    while pos < tokens.len() && depth > 0 {
        match &tokens[pos] {
            CssToken::LBrace => depth += 1,
            CssToken::RBrace => depth -= 1,
            _ => {}
        }
        pos += 1;
    }
    pos
}

/// Parse a qualified rule: `selectors { declarations }`.
///
/// On an invalid prelude the whole rule including its block is skipped and
/// the error carries the resume position.
fn parse_qualified_rule(tokens: &[CssToken], start: usize) -> Result<(CssRule, usize), usize> {
    let mut pos = start;
    while pos < tokens.len() && tokens[pos] != CssToken::LBrace {
        pos += 1;
    }
    if pos >= tokens.len() {
        return Err(pos);
    }

    let block_end = skip_block(tokens, pos);
    let Some(selectors) = parse_selector_list_from_tokens(trim_ws(&tokens[start..pos])) else {
        return Err(block_end);
    };

    let body_end = if tokens.get(block_end - 1) == Some(&CssToken::RBrace) {
        block_end - 1
    } else {
        block_end
    };
    let declarations = parse_declaration_block(&tokens[pos + 1..body_end]);

    Ok((
        CssRule {
            selectors,
            declarations,
        },
        block_end,
    ))
}

fn trim_ws(mut tokens: &[CssToken]) -> &[CssToken] {
    while tokens.first() == Some(&CssToken::Whitespace) {
        tokens = &tokens[1..];
    }
    while tokens.last() == Some(&CssToken::Whitespace) {
        tokens = &tokens[..tokens.len() - 1];
    }
    tokens
}

/// Parse a declaration block (the content between `{` and `}`).
pub fn parse_declaration_block(tokens: &[CssToken]) -> Vec<Declaration> {
    tokens
        .split(|t| *t == CssToken::Semicolon)
        .filter_map(parse_declaration)
        .collect()
}

/// Parse a single declaration: `property: value [!important]`.
fn parse_declaration(tokens: &[CssToken]) -> Option<Declaration> {
    let tokens = trim_ws(tokens);
    let name = match tokens.first()? {
        CssToken::Ident(name) => name.to_ascii_lowercase(),
        _ => return None,
    };
    let rest = trim_ws(&tokens[1..]);
    if rest.first() != Some(&CssToken::Colon) {
        return None;
    }
    let (value_tokens, important) = check_important(trim_ws(&rest[1..]));
    if value_tokens.is_empty() {
        return None;
    }

    let mut value = String::new();
    for tok in value_tokens {
        value.push_str(&tok.to_string());
    }
    Some(Declaration {
        name,
        value,
        important,
    })
}

/// Check if the value tokens end with `!important`, and strip it if so.
fn check_important(tokens: &[CssToken]) -> (&[CssToken], bool) {
    let Some(CssToken::Ident(last)) = tokens.last() else {
        return (tokens, false);
    };
    if !last.eq_ignore_ascii_case("important") {
        return (tokens, false);
    }
    let before = trim_ws(&tokens[..tokens.len() - 1]);
    match before.last() {
        Some(CssToken::Delim('!')) => (trim_ws(&before[..before.len() - 1]), true),
        _ => (tokens, false),
    }
}
