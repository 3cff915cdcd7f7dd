//! Parser for pretty-printer tag payloads.
//!
//! Document code attaches tags to regions of pretty-printed output as small
//! s-expression payloads. This crate turns such a payload into a [`Tag`]: a
//! name plus an ordered list of `(key, value)` attributes.
//!
//! # Example
//!
//! ```rust
//! use markout_tags::{parse, TagError};
//!
//! let tag = parse("br").unwrap();
//! assert_eq!(tag.name(), "br");
//! assert!(tag.is_bare());
//!
//! let tag = parse(r#"(p ((id "1") (title foo)))"#).unwrap();
//! assert_eq!(tag.get("id"), Some(r#""1""#));
//! assert_eq!(tag.get("title"), Some("foo"));
//!
//! assert_eq!(parse("(p (badarg))"), Err(TagError::MalformedArg));
//! ```
//!
//! # Grammar
//!
//! ```text
//! TAG   := ATOM | "(" ATOM ARG* ")"
//! ARG   := "(" ATOM ATOM ")"
//! ATOM  := bare token | double-quoted string
//! ```
//!
//! The arguments may also be grouped in one extra list, `(name ((k v) ...))`.
//! Quoted atoms keep their quotes in the parsed tag; use [`unquote`] to get
//! the inner text.

mod error;

pub use error::{Result, TagError};

use std::borrow::Cow;
use std::fmt;
use std::iter::Peekable;
use std::str::FromStr;

/// A parsed tag: name plus ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    name: String,
    attributes: Vec<(String, String)>,
}

impl Tag {
    /// Creates a tag with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute, keeping insertion order.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in the order they were written.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Returns the raw value of the first attribute named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True when the tag was written as a bare atom or has no attributes.
    pub fn is_bare(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attributes.is_empty() {
            return f.write_str(&self.name);
        }
        write!(f, "({}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " ({} {})", key, value)?;
        }
        f.write_str(")")
    }
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Parses a tag payload.
///
/// Fails with [`TagError::MalformedTag`] when the payload is not a bare atom
/// or a list headed by an atom, and with [`TagError::MalformedArg`] when an
/// attribute is not a `(key value)` pair of atoms.
pub fn parse(payload: &str) -> Result<Tag> {
    let mut reader = Reader::new(payload);
    let sexp = reader.read()?;
    if reader.tokens.next().is_some() {
        return Err(TagError::MalformedTag);
    }

    match sexp {
        Sexp::Atom(name) => Ok(Tag::new(name)),
        Sexp::List(items) => match items.split_first() {
            Some((Sexp::Atom(name), rest)) => {
                let mut tag = Tag::new(*name);
                for arg in arg_items(rest) {
                    match arg {
                        Sexp::List(pair) => match pair.as_slice() {
                            [Sexp::Atom(key), Sexp::Atom(value)] => {
                                tag = tag.attribute(*key, *value);
                            }
                            _ => return Err(TagError::MalformedArg),
                        },
                        Sexp::Atom(_) => return Err(TagError::MalformedArg),
                    }
                }
                Ok(tag)
            }
            _ => Err(TagError::MalformedTag),
        },
    }
}

/// Picks the argument elements out of a list tail.
///
/// A tail that is exactly one list of lists (or `()`) is the grouped form;
/// anything else is the flat form.
fn arg_items<'s, 'a>(rest: &'s [Sexp<'a>]) -> &'s [Sexp<'a>] {
    match rest {
        [Sexp::List(inner)] if inner.iter().all(|s| matches!(s, Sexp::List(_))) => inner,
        _ => rest,
    }
}

/// Returns true if `value` is a double-quoted atom.
pub fn is_quoted(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('"') && value.ends_with('"')
}

/// Strips the quotes from a quoted atom and resolves `\"` and `\\`.
///
/// Bare atoms are returned unchanged.
pub fn unquote(value: &str) -> Cow<'_, str> {
    if !is_quoted(value) {
        return Cow::Borrowed(value);
    }
    let inner = &value[1..value.len() - 1];
    if !inner.contains('\\') {
        return Cow::Borrowed(inner);
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Nested list structure read from the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Sexp<'a> {
    Atom(&'a str),
    List(Vec<Sexp<'a>>),
}

/// Recursive-descent reader over [`Tokenizer`].
struct Reader<'a> {
    tokens: Peekable<Tokenizer<'a>>,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            tokens: Tokenizer::new(input).peekable(),
        }
    }

    fn read(&mut self) -> Result<Sexp<'a>> {
        match self.tokens.next() {
            Some(Token::Bare(atom)) | Some(Token::Quoted(atom)) => Ok(Sexp::Atom(atom)),
            Some(Token::Open) => {
                let mut items = Vec::new();
                loop {
                    match self.tokens.peek() {
                        Some(Token::Close) => {
                            self.tokens.next();
                            return Ok(Sexp::List(items));
                        }
                        None => return Err(TagError::MalformedTag),
                        Some(_) => items.push(self.read()?),
                    }
                }
            }
            Some(Token::Close) | Some(Token::Unterminated(_)) | None => {
                Err(TagError::MalformedTag)
            }
        }
    }
}

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// `(`
    Open,
    /// `)`
    Close,
    /// Run of characters up to whitespace, a parenthesis or a quote.
    Bare(&'a str),
    /// Double-quoted string, quotes included.
    Quoted(&'a str),
    /// Quoted string missing its closing quote.
    Unterminated(&'a str),
}

/// Tokenizer for tag payloads.
struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn is_delimiter(c: char) -> bool {
        c.is_whitespace() || c == '(' || c == ')' || c == '"'
    }

    /// Byte length of the quoted string at the start of `s`, if terminated.
    fn quoted_len(s: &str) -> Option<usize> {
        let mut escaped = false;
        for (i, c) in s.char_indices().skip(1) {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => return Some(i + 1),
                _ => {}
            }
        }
        None
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = &self.input[self.pos..];
        let trimmed = remaining.trim_start();
        self.pos += remaining.len() - trimmed.len();

        let first = trimmed.chars().next()?;
        match first {
            '(' => {
                self.pos += 1;
                Some(Token::Open)
            }
            ')' => {
                self.pos += 1;
                Some(Token::Close)
            }
            '"' => match Self::quoted_len(trimmed) {
                Some(len) => {
                    self.pos += len;
                    Some(Token::Quoted(&trimmed[..len]))
                }
                None => {
                    self.pos = self.input.len();
                    Some(Token::Unterminated(trimmed))
                }
            },
            _ => {
                let len = trimmed.find(Self::is_delimiter).unwrap_or(trimmed.len());
                self.pos += len;
                Some(Token::Bare(&trimmed[..len]))
            }
        }
    }
}
