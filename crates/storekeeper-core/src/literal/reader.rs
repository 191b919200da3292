//! Parses a literal document back into a mapping.
//!
//! This is the loader side of the format produced by [`super::writer`].  It
//! accepts a little more than the writer emits, so hand-edited files load too:
//!
//! - an optional `<?php` open tag and `?>` close tag;
//! - whitespace and `//`, `#`, `/* ... */` comments between any two tokens;
//! - single- or double-quoted keys, or bare integer keys;
//! - `[ ... ]` and `array( ... )` mapping literals, with or without a trailing
//!   comma after the last entry;
//! - case-insensitive `true`, `false`, `null`, plus `INF`, `-INF`, `NAN`.
//!
//! Entries without a `key =>` prefix (plain lists) are rejected.  Mappings
//! may nest at most [`MAX_DEPTH`] levels deep, counting the top-level one.
//!
//! All error offsets are byte offsets into the input text.

use thiserror::Error;

use crate::domain::value::{Map, Value};

/// Deepest mapping nesting the reader accepts.
pub const MAX_DEPTH: usize = 128;

/// Errors produced while parsing a literal document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LiteralError {
    /// The input ended where more tokens were required.
    #[error("unexpected end of input at byte {offset}: expected {expected}")]
    UnexpectedEnd {
        offset: usize,
        expected: &'static str,
    },

    /// A character that cannot start or continue the expected construct.
    #[error("unexpected {found:?} at byte {offset}: expected {expected}")]
    UnexpectedChar {
        found: char,
        offset: usize,
        expected: &'static str,
    },

    /// A bare word that is not a known constant.
    #[error("unknown token '{token}' at byte {offset}")]
    UnknownToken { token: String, offset: usize },

    /// Numeric text that is not a valid integer or float.
    #[error("invalid number '{text}' at byte {offset}")]
    InvalidNumber { text: String, offset: usize },

    /// A quoted string with no closing quote.
    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString { offset: usize },

    /// A `/*` comment with no closing `*/`.
    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },

    /// A mapping entry without a `key =>` prefix.
    #[error("entry at byte {offset} has no key: positional entries are not supported")]
    PositionalEntry { offset: usize },

    /// A key that is neither a string nor an integer.
    #[error("invalid {kind} key at byte {offset}: keys must be strings or integers")]
    InvalidKey { kind: &'static str, offset: usize },

    /// Mappings nested deeper than [`MAX_DEPTH`].
    #[error("mapping at byte {offset} is nested deeper than {} levels", MAX_DEPTH)]
    TooDeep { offset: usize },

    /// Non-trivia text after the end of the document or value.
    #[error("unexpected trailing content at byte {offset}")]
    TrailingContent { offset: usize },
}

/// Parses a complete document (`<?php return [ ... ];`) into its top-level mapping.
///
/// # Errors
///
/// Returns a [`LiteralError`] describing the first syntax problem found.
///
/// # Examples
///
/// ```rust
/// use storekeeper_core::{parse_document, Value};
///
/// let map = parse_document("<?php return ['debug' => true, 'db' => ['port' => 5432]];").unwrap();
/// assert_eq!(map["debug"], Value::Bool(true));
/// assert_eq!(map["db"].as_map().unwrap()["port"], Value::Int(5432));
/// ```
pub fn parse_document(text: &str) -> Result<Map, LiteralError> {
    let mut parser = Parser::new(text);

    parser.skip_trivia()?;
    parser.eat_keyword("<?php");
    parser.skip_trivia()?;
    if !parser.eat_keyword("return") {
        return Err(parser.error_here("'return'"));
    }
    parser.skip_trivia()?;
    let map = parser.parse_mapping()?;
    parser.skip_trivia()?;
    parser.eat(";");
    parser.skip_trivia()?;
    parser.eat("?>");
    parser.finish()?;

    Ok(map)
}

/// Parses a single value literal such as `'text'`, `42`, `true`, or `['a' => 1]`.
///
/// # Errors
///
/// Returns a [`LiteralError`] if `text` is not exactly one value literal.
pub fn parse_value(text: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser::new(text);
    let value = parser.parse_value()?;
    parser.finish()?;
    Ok(value)
}

// ── Parser ────────────────────────────────────────────────────────────────────

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consumes `keyword` (ASCII case-insensitive) if it is not followed by
    /// another identifier character.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        let matches = rest
            .get(..keyword.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
            && !rest[keyword.len()..].starts_with(is_ident_char);
        if matches {
            self.pos += keyword.len();
        }
        matches
    }

    fn error_here(&self, expected: &'static str) -> LiteralError {
        match self.peek() {
            Some(found) => LiteralError::UnexpectedChar {
                found,
                offset: self.pos,
                expected,
            },
            None => LiteralError::UnexpectedEnd {
                offset: self.pos,
                expected,
            },
        }
    }

    fn finish(&mut self) -> Result<(), LiteralError> {
        self.skip_trivia()?;
        if self.pos < self.src.len() {
            return Err(LiteralError::TrailingContent { offset: self.pos });
        }
        Ok(())
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), LiteralError> {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if self.eat("//") || self.eat("#") {
                let line_len = self.rest().find('\n').unwrap_or(self.rest().len());
                self.pos += line_len;
            } else if self.rest().starts_with("/*") {
                let start = self.pos;
                match self.rest()[2..].find("*/") {
                    Some(end) => self.pos += 2 + end + 2,
                    None => return Err(LiteralError::UnterminatedComment { offset: start }),
                }
            } else {
                return Ok(());
            }
        }
    }

    /// Parses `[ ... ]` or `array( ... )`.
    fn parse_mapping(&mut self) -> Result<Map, LiteralError> {
        let start = self.pos;
        if self.eat("[") {
            return self.parse_nested(start, ']');
        }
        if self.eat_keyword("array") {
            self.skip_trivia()?;
            if self.eat("(") {
                return self.parse_nested(start, ')');
            }
        }
        Err(self.error_here("a mapping literal"))
    }

    /// Parses the entries of a mapping whose opening bracket is at `offset`,
    /// one level deeper than the caller.
    fn parse_nested(&mut self, offset: usize, close: char) -> Result<Map, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep { offset });
        }
        self.depth += 1;
        let entries = self.parse_entries(close);
        self.depth -= 1;
        entries
    }

    fn parse_entries(&mut self, close: char) -> Result<Map, LiteralError> {
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(close) {
                self.bump();
                return Ok(map);
            }

            let entry_offset = self.pos;
            let key = self.parse_value()?;
            self.skip_trivia()?;
            if !self.eat("=>") {
                return Err(LiteralError::PositionalEntry {
                    offset: entry_offset,
                });
            }
            let key = match key {
                Value::String(s) => s,
                Value::Int(i) => i.to_string(),
                other => {
                    return Err(LiteralError::InvalidKey {
                        kind: other.kind(),
                        offset: entry_offset,
                    })
                }
            };
            let value = self.parse_value()?;
            // Repeated keys: the last one wins, at the first one's position.
            map.insert(key, value);

            self.skip_trivia()?;
            if self.eat(",") {
                continue;
            }
            if self.peek() == Some(close) {
                self.bump();
                return Ok(map);
            }
            return Err(self.error_here("',' or a closing bracket"));
        }
    }

    fn parse_value(&mut self) -> Result<Value, LiteralError> {
        self.skip_trivia()?;
        match self.peek() {
            Some('[') => self.parse_mapping().map(Value::Map),
            Some('\'') => self.parse_single_quoted().map(Value::String),
            Some('"') => self.parse_double_quoted().map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
                self.parse_number()
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.parse_word(),
            _ => Err(self.error_here("a value")),
        }
    }

    fn parse_single_quoted(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralError::UnterminatedString { offset: start }),
                Some('\'') => return Ok(out),
                Some('\\') => match self.peek() {
                    Some(escaped @ ('\'' | '\\')) => {
                        self.bump();
                        out.push(escaped);
                    }
                    _ => out.push('\\'),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_double_quoted(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralError::UnterminatedString { offset: start }),
                Some('"') => return Ok(out),
                Some('\\') => {
                    let escaped = match self.peek() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some(c @ ('\\' | '"' | '$')) => c,
                        _ => {
                            out.push('\\');
                            continue;
                        }
                    };
                    self.bump();
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let negative = self.eat("-");
        if !negative {
            self.eat("+");
        }
        if self.eat_keyword("inf") {
            let inf = if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
            return Ok(Value::Float(inf));
        }

        let mut is_float = false;
        self.eat_digits();
        if self.eat(".") {
            is_float = true;
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if !self.eat("-") {
                self.eat("+");
            }
            self.eat_digits();
        }

        let text: String = self.src[start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        let invalid = || LiteralError::InvalidNumber {
            text: self.src[start..self.pos].to_string(),
            offset: start,
        };

        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Value::Int(i));
            }
        }
        // Integers that overflow i64 load as floats.
        if text.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(x) = text.parse::<f64>() {
                return Ok(Value::Float(x));
            }
        }
        Err(invalid())
    }

    fn eat_digits(&mut self) {
        let len = self
            .rest()
            .find(|c: char| !(c.is_ascii_digit() || c == '_'))
            .unwrap_or(self.rest().len());
        self.pos += len;
    }

    fn parse_word(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let len = self
            .rest()
            .find(|c: char| !is_ident_char(c))
            .unwrap_or(self.rest().len());
        let word = &self.src[start..start + len];

        if word.eq_ignore_ascii_case("array") {
            return self.parse_mapping().map(Value::Map);
        }
        self.pos += len;

        match word.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            "inf" => Ok(Value::Float(f64::INFINITY)),
            "nan" => Ok(Value::Float(f64::NAN)),
            _ => Err(LiteralError::UnknownToken {
                token: word.to_string(),
                offset: start,
            }),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ── Tests ─────────────────────────────────────────────────────────────────────
