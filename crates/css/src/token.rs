/// CSS token types, after CSS Syntax Level 3 with numerics kept as source
/// text (`10px`, `50%`) since nothing here does arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssToken {
    Ident(String),
    Function(String),
    AtKeyword(String),
    Hash(String),
    String(String),
    Numeric(String),
    Whitespace,
    Colon,
    Semicolon,
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Delim(char),
    EOF,
}

impl std::fmt::Display for CssToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CssToken::Ident(s) | CssToken::Numeric(s) => f.write_str(s),
            CssToken::Function(name) => write!(f, "{name}("),
            CssToken::AtKeyword(name) => write!(f, "@{name}"),
            CssToken::Hash(value) => write!(f, "#{value}"),
            CssToken::String(s) => write_quoted(f, s),
            CssToken::Whitespace => f.write_str(" "),
            CssToken::Colon => f.write_str(":"),
            CssToken::Semicolon => f.write_str(";"),
            CssToken::Comma => f.write_str(","),
            CssToken::LBracket => f.write_str("["),
            CssToken::RBracket => f.write_str("]"),
            CssToken::LParen => f.write_str("("),
            CssToken::RParen => f.write_str(")"),
            CssToken::LBrace => f.write_str("{"),
            CssToken::RBrace => f.write_str("}"),
            CssToken::Delim(c) => write!(f, "{c}"),
            CssToken::EOF => Ok(()),
        }
    }
}

/// Write `s` as a double-quoted CSS string; `"` and `\` are escaped.
pub fn write_quoted(f: &mut impl std::fmt::Write, s: &str) -> std::fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' | '\\' => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            // A raw newline would end the string; use the hex escape.
            '\n' => f.write_str("\\a ")?,
            _ => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// A CSS tokenizer that processes an input string into a stream of `CssToken`s.
pub struct CssTokenizer {
    input: Vec<char>,
    pos: usize,
}

impl CssTokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    /// Tokenize the entire input into a vector of tokens (excluding EOF).
    pub fn tokenize_all(&mut self) -> Vec<CssToken> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            if tok == CssToken::EOF {
                break;
            }
            tokens.push(tok);
        }
        tokens
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> CssToken {
        self.consume_comments();

        let Some(ch) = self.peek() else {
            return CssToken::EOF;
        };

        if is_whitespace(ch) {
            self.consume_whitespace();
            return CssToken::Whitespace;
        }

        if ch == '"' || ch == '\'' {
            return self.consume_string(ch);
        }

        if ch == '#' {
            self.pos += 1;
            if self.peek().is_some_and(is_name_char) || self.starts_valid_escape_at(self.pos) {
                return CssToken::Hash(self.consume_name());
            }
            return CssToken::Delim('#');
        }

        if ch.is_ascii_digit() || ((ch == '+' || ch == '-' || ch == '.') && self.starts_number())
        {
            return self.consume_numeric();
        }

        // `<!--` and `-->` are legacy HTML-comment guards; treat them as
        // whitespace.
        if self.matches_ahead("<!--") {
            self.pos += 4;
            return CssToken::Whitespace;
        }
        if self.matches_ahead("-->") {
            self.pos += 3;
            return CssToken::Whitespace;
        }

        if ch == '@' {
            self.pos += 1;
            if self.would_start_ident_at(self.pos) {
                return CssToken::AtKeyword(self.consume_name());
            }
            return CssToken::Delim('@');
        }

        if self.would_start_ident_at(self.pos) {
            return self.consume_ident_like();
        }

        self.pos += 1;
        match ch {
            ':' => CssToken::Colon,
            ';' => CssToken::Semicolon,
            ',' => CssToken::Comma,
            '[' => CssToken::LBracket,
            ']' => CssToken::RBracket,
            '(' => CssToken::LParen,
            ')' => CssToken::RParen,
            '{' => CssToken::LBrace,
            '}' => CssToken::RBrace,
            _ => CssToken::Delim(ch),
        }
    }

    // --- Helper methods ---

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, idx: usize) -> Option<char> {
        self.input.get(idx).copied()
    }

    fn matches_ahead(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(self.pos + i) == Some(c))
    }

    fn consume_comments(&mut self) {
        while self.matches_ahead("/*") {
            self.pos += 2;
            loop {
                if self.pos + 1 >= self.input.len() {
                    self.pos = self.input.len();
                    return;
                }
                if self.matches_ahead("*/") {
                    self.pos += 2;
                    break;
                }
                self.pos += 1;
            }
        }
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
    }

    fn consume_string(&mut self, quote: char) -> CssToken {
        self.pos += 1; // opening quote
        let mut value = String::new();
        while let Some(ch) = self.peek() {
            self.pos += 1;
            if ch == quote {
                break;
            }
            match ch {
                '\\' => match self.peek() {
                    None => break,
                    Some('\n') => self.pos += 1,
                    Some(_) => value.push(self.consume_escape()),
                },
                // Unescaped newline ends the string (parse error).
                '\n' => break,
                _ => value.push(ch),
            }
        }
        CssToken::String(value)
    }

    /// Consume an escape; the backslash is already consumed.
    fn consume_escape(&mut self) -> char {
        let Some(ch) = self.peek() else {
            return '\u{FFFD}';
        };
        self.pos += 1;
        if !ch.is_ascii_hexdigit() {
            return ch;
        }
        let mut hex = String::from(ch);
        while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            hex.push(self.input[self.pos]);
            self.pos += 1;
        }
        if self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or('\u{FFFD}')
    }

    fn starts_valid_escape_at(&self, idx: usize) -> bool {
        self.peek_at(idx) == Some('\\') && self.peek_at(idx + 1).is_some_and(|c| c != '\n')
    }

    fn would_start_ident_at(&self, start: usize) -> bool {
        match self.peek_at(start) {
            Some(c) if is_name_start_char(c) => true,
            Some('-') => match self.peek_at(start + 1) {
                Some(n) if is_name_start_char(n) || n == '-' => true,
                Some('\\') => self.starts_valid_escape_at(start + 1),
                _ => false,
            },
            Some('\\') => self.starts_valid_escape_at(start),
            _ => false,
        }
    }

    fn starts_number(&self) -> bool {
        let digit_at = |i: usize| self.peek_at(i).is_some_and(|c| c.is_ascii_digit());
        match self.peek() {
            Some(c) if c.is_ascii_digit() => true,
            Some('+' | '-') => {
                digit_at(self.pos + 1)
                    || (self.peek_at(self.pos + 1) == Some('.') && digit_at(self.pos + 2))
            }
            Some('.') => digit_at(self.pos + 1),
            _ => false,
        }
    }

    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if is_name_char(ch) {
                name.push(ch);
                self.pos += 1;
            } else if self.starts_valid_escape_at(self.pos) {
                self.pos += 1;
                name.push(self.consume_escape());
            } else {
                break;
            }
        }
        name
    }

    /// Number plus any unit or `%`, kept verbatim.
    fn consume_numeric(&mut self) -> CssToken {
        let mut repr = String::new();
        if let Some(sign @ ('+' | '-')) = self.peek() {
            repr.push(sign);
            self.pos += 1;
        }
        while let Some(c) = self.peek().filter(|c| c.is_ascii_digit() || *c == '.') {
            repr.push(c);
            self.pos += 1;
        }
        if self.would_start_ident_at(self.pos) {
            repr.push_str(&self.consume_name());
        } else if self.peek() == Some('%') {
            repr.push('%');
            self.pos += 1;
        }
        CssToken::Numeric(repr)
    }

    fn consume_ident_like(&mut self) -> CssToken {
        let name = self.consume_name();
        if self.peek() == Some('(') {
            self.pos += 1;
            return CssToken::Function(name);
        }
        CssToken::Ident(name)
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

fn is_name_start_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || !ch.is_ascii()
}

fn is_name_char(ch: char) -> bool {
    is_name_start_char(ch) || ch.is_ascii_digit() || ch == '-'
}
