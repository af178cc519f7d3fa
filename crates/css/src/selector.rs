use std::fmt;

use crate::token::{write_quoted, CssToken, CssTokenizer};

/// Combinator between compound selectors in a complex selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: ancestor descendant
    Descendant,
    /// `>`: parent > child
    Child,
}

/// Attribute selector operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// `[attr]`
    Exists,
    /// `[attr=val]`
    Eq,
    /// `[attr~=val]`
    Includes,
    /// `[attr|=val]`
    DashMatch,
    /// `[attr^=val]`
    Prefix,
    /// `[attr$=val]`
    Suffix,
    /// `[attr*=val]`
    Substring,
}

/// Pseudo-class selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// `:not(...)` containing a compound selector.
    Not(Box<CompoundSelector>),
    FirstChild,
    LastChild,
    Checked,
    Enabled,
    Disabled,
}

/// A single simple selector component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// Type selector, e.g. `div`, `p`.
    Type(String),
    /// Universal selector `*`.
    Universal,
    /// ID selector `#foo`.
    Id(String),
    /// Class selector `.bar`.
    Class(String),
    /// Attribute selector `[name op value]`.
    Attribute {
        name: String,
        op: AttrOp,
        value: Option<String>,
    },
    PseudoClass(PseudoClass),
}

impl SimpleSelector {
    /// `[name]`
    pub fn has_attr(name: &str) -> Self {
        SimpleSelector::Attribute {
            name: name.to_ascii_lowercase(),
            op: AttrOp::Exists,
            value: None,
        }
    }

    /// `[name="value"]`
    pub fn attr_eq(name: &str, value: &str) -> Self {
        SimpleSelector::Attribute {
            name: name.to_ascii_lowercase(),
            op: AttrOp::Eq,
            value: Some(value.to_string()),
        }
    }

    /// `:not(inner)`
    pub fn not(inner: CompoundSelector) -> Self {
        SimpleSelector::PseudoClass(PseudoClass::Not(Box::new(inner)))
    }
}

/// A compound selector is a sequence of simple selectors
/// without any combinator between them (e.g. `div.foo#bar`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub fn new(simples: Vec<SimpleSelector>) -> Self {
        Self { simples }
    }
}

/// A complex selector is a chain of compound selectors separated by combinators.
/// Stored right-to-left for efficient matching: `parts[0]` is the rightmost
/// (subject) compound selector.
///
/// Each element is `(compound_selector, optional_combinator_to_the_left)`.
/// The last element's combinator is always `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub parts: Vec<(CompoundSelector, Option<Combinator>)>,
}

impl ComplexSelector {
    /// Build from left-to-right source order: `[(A, None), (B, Some(c))]`
    /// means `A c B`.
    pub fn from_ltr(mut parts_ltr: Vec<(CompoundSelector, Option<Combinator>)>) -> Self {
        // Each LTR combinator links an element to the one before it; reversed,
        // it links to the next element in RTL traversal order.
        parts_ltr.reverse();
        Self { parts: parts_ltr }
    }

    /// `scope descendant`
    pub fn descendant(scope: CompoundSelector, subject: CompoundSelector) -> Self {
        Self {
            parts: vec![(subject, Some(Combinator::Descendant)), (scope, None)],
        }
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
        })
    }
}

impl fmt::Display for AttrOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttrOp::Exists => "",
            AttrOp::Eq => "=",
            AttrOp::Includes => "~=",
            AttrOp::DashMatch => "|=",
            AttrOp::Prefix => "^=",
            AttrOp::Suffix => "$=",
            AttrOp::Substring => "*=",
        })
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleSelector::Type(name) => f.write_str(name),
            SimpleSelector::Universal => f.write_str("*"),
            SimpleSelector::Id(id) => write!(f, "#{id}"),
            SimpleSelector::Class(class) => write!(f, ".{class}"),
            SimpleSelector::Attribute { name, op, value } => {
                write!(f, "[{name}")?;
                if let Some(value) = value {
                    write!(f, "{op}")?;
                    write_quoted(f, value)?;
                }
                f.write_str("]")
            }
            SimpleSelector::PseudoClass(pc) => match pc {
                PseudoClass::Not(inner) => write!(f, ":not({inner})"),
                PseudoClass::FirstChild => f.write_str(":first-child"),
                PseudoClass::LastChild => f.write_str(":last-child"),
                PseudoClass::Checked => f.write_str(":checked"),
                PseudoClass::Enabled => f.write_str(":enabled"),
                PseudoClass::Disabled => f.write_str(":disabled"),
            },
        }
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.simples.is_empty() {
            return f.write_str("*");
        }
        self.simples.iter().try_for_each(|s| write!(f, "{s}"))
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Stored RTL; write LTR.
        for (compound, comb) in self.parts.iter().rev() {
            if let Some(comb) = comb {
                write!(f, "{comb}")?;
            }
            write!(f, "{compound}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Specificity
// ---------------------------------------------------------------------------

/// CSS specificity as a triple `(a, b, c)`:
///   - `a`: count of ID selectors
///   - `b`: count of class selectors, attribute selectors, and pseudo-classes
///   - `c`: count of type selectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Specificity {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    /// Add two specificities component-wise.
    pub fn add(self, other: Specificity) -> Specificity {
        Specificity {
            a: self.a + other.a,
            b: self.b + other.b,
            c: self.c + other.c,
        }
    }
}

/// Compute the specificity of a complex selector.
pub fn compute_specificity(selector: &ComplexSelector) -> Specificity {
    selector
        .parts
        .iter()
        .fold(Specificity::default(), |acc, (c, _)| acc.add(compound_specificity(c)))
}

fn compound_specificity(compound: &CompoundSelector) -> Specificity {
    compound
        .simples
        .iter()
        .fold(Specificity::default(), |acc, s| acc.add(simple_specificity(s)))
}

fn simple_specificity(simple: &SimpleSelector) -> Specificity {
    match simple {
        SimpleSelector::Id(_) => Specificity::new(1, 0, 0),
        SimpleSelector::Class(_) | SimpleSelector::Attribute { .. } => Specificity::new(0, 1, 0),
        // :not() uses the specificity of its argument
        SimpleSelector::PseudoClass(PseudoClass::Not(inner)) => compound_specificity(inner),
        SimpleSelector::PseudoClass(_) => Specificity::new(0, 1, 0),
        SimpleSelector::Type(_) => Specificity::new(0, 0, 1),
        SimpleSelector::Universal => Specificity::default(),
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a selector list from a CSS selector string.
///
/// Returns `None` when any selector in the list is invalid or uses
/// unsupported syntax; a rule with such a prelude is dropped entirely.
pub fn parse_selector_list(input: &str) -> Option<Vec<ComplexSelector>> {
    let tokens = CssTokenizer::new(input).tokenize_all();
    parse_selector_list_from_tokens(&tokens)
}

/// Parse a selector list from a slice of tokens. All tokens must be consumed.
pub fn parse_selector_list_from_tokens(tokens: &[CssToken]) -> Option<Vec<ComplexSelector>> {
    let mut selectors = Vec::new();
    let mut pos = skip_ws(tokens, 0);
    loop {
        let (selector, new_pos) = parse_complex_selector(tokens, pos)?;
        selectors.push(selector);
        pos = skip_ws(tokens, new_pos);
        match tokens.get(pos) {
            None => return Some(selectors),
            Some(CssToken::Comma) => pos = skip_ws(tokens, pos + 1),
            Some(_) => return None,
        }
    }
}

fn skip_ws(tokens: &[CssToken], mut pos: usize) -> usize {
    while tokens.get(pos) == Some(&CssToken::Whitespace) {
        pos += 1;
    }
    pos
}

/// Parse a single complex selector from tokens starting at `pos`.
fn parse_complex_selector(tokens: &[CssToken], start: usize) -> Option<(ComplexSelector, usize)> {
    let (first, mut pos) = parse_compound_selector(tokens, start)?;
    let mut parts_ltr = vec![(first, None)];

    loop {
        let after_ws = skip_ws(tokens, pos);
        let had_whitespace = after_ws > pos;
        let combinator = match tokens.get(after_ws) {
            None | Some(CssToken::Comma) => break,
            Some(CssToken::Delim('>')) => Combinator::Child,
            Some(_) if had_whitespace => Combinator::Descendant,
            Some(_) => return None,
        };
        pos = if combinator == Combinator::Descendant {
            after_ws
        } else {
            skip_ws(tokens, after_ws + 1)
        };
        let (compound, new_pos) = parse_compound_selector(tokens, pos)?;
        parts_ltr.push((compound, Some(combinator)));
        pos = new_pos;
    }

    Some((ComplexSelector::from_ltr(parts_ltr), pos))
}

/// Parse a compound selector (sequence of simple selectors without
/// combinators). An empty compound is an error.
fn parse_compound_selector(tokens: &[CssToken], start: usize) -> Option<(CompoundSelector, usize)> {
    let mut simples = Vec::new();
    let mut pos = start;

    loop {
        match tokens.get(pos) {
            Some(CssToken::Ident(name)) if simples.is_empty() => {
                simples.push(SimpleSelector::Type(name.to_ascii_lowercase()));
                pos += 1;
            }
            Some(CssToken::Delim('*')) if simples.is_empty() => {
                simples.push(SimpleSelector::Universal);
                pos += 1;
            }
            Some(CssToken::Hash(value)) => {
                simples.push(SimpleSelector::Id(value.clone()));
                pos += 1;
            }
            Some(CssToken::Delim('.')) => match tokens.get(pos + 1) {
                Some(CssToken::Ident(name)) => {
                    simples.push(SimpleSelector::Class(name.clone()));
                    pos += 2;
                }
                _ => return None,
            },
            Some(CssToken::LBracket) => {
                let (sel, new_pos) = parse_attribute_selector(tokens, pos + 1)?;
                simples.push(sel);
                pos = new_pos;
            }
            Some(CssToken::Colon) => {
                let (pc, new_pos) = parse_pseudo_class(tokens, pos + 1)?;
                simples.push(SimpleSelector::PseudoClass(pc));
                pos = new_pos;
            }
            _ => break,
        }
    }

    if simples.is_empty() {
        return None;
    }
    Some((CompoundSelector { simples }, pos))
}

fn parse_pseudo_class(tokens: &[CssToken], pos: usize) -> Option<(PseudoClass, usize)> {
    match tokens.get(pos)? {
        CssToken::Ident(name) => {
            let pc = match name.to_ascii_lowercase().as_str() {
                "first-child" => PseudoClass::FirstChild,
                "last-child" => PseudoClass::LastChild,
                "checked" => PseudoClass::Checked,
                "enabled" => PseudoClass::Enabled,
                "disabled" => PseudoClass::Disabled,
                _ => return None,
            };
            Some((pc, pos + 1))
        }
        CssToken::Function(name) if name.eq_ignore_ascii_case("not") => {
            let start = skip_ws(tokens, pos + 1);
            let (inner, end) = parse_compound_selector(tokens, start)?;
            let end = skip_ws(tokens, end);
            if tokens.get(end) != Some(&CssToken::RParen) {
                return None;
            }
            Some((PseudoClass::Not(Box::new(inner)), end + 1))
        }
        _ => None,
    }
}

/// Parse an attribute selector body; `start` is just past the `[`.
fn parse_attribute_selector(tokens: &[CssToken], start: usize) -> Option<(SimpleSelector, usize)> {
    let mut pos = skip_ws(tokens, start);
    let name = match tokens.get(pos)? {
        CssToken::Ident(n) => n.to_ascii_lowercase(),
        _ => return None,
    };
    pos = skip_ws(tokens, pos + 1);

    if tokens.get(pos) == Some(&CssToken::RBracket) {
        return Some((
            SimpleSelector::Attribute {
                name,
                op: AttrOp::Exists,
                value: None,
            },
            pos + 1,
        ));
    }

    let op = match tokens.get(pos)? {
        CssToken::Delim('=') => AttrOp::Eq,
        CssToken::Delim(c) if tokens.get(pos + 1) == Some(&CssToken::Delim('=')) => {
            pos += 1;
            match c {
                '~' => AttrOp::Includes,
                '|' => AttrOp::DashMatch,
                '^' => AttrOp::Prefix,
                '$' => AttrOp::Suffix,
                '*' => AttrOp::Substring,
                _ => return None,
            }
        }
        _ => return None,
    };
    pos = skip_ws(tokens, pos + 1);

    let value = match tokens.get(pos)? {
        CssToken::Ident(v) | CssToken::String(v) | CssToken::Numeric(v) => v.clone(),
        _ => return None,
    };
    pos = skip_ws(tokens, pos + 1);

    if tokens.get(pos) != Some(&CssToken::RBracket) {
        return None;
    }
    Some((
        SimpleSelector::Attribute {
            name,
            op,
            value: Some(value),
        },
        pos + 1,
    ))
}
