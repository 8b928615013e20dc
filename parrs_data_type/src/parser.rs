//! Data type string parser.
//!
//! Primitive data types are a name (`int32`), `?`, or a typestr with an optional byte order (`<i4`, `>f8`, `|u1`, `=c16`, `S8`).
//! An unprefixed typestr is little endian and `=` is the native byte order.
//!
//! Structured data types are a bracketed list of `(name, type)` fields:
//! ```text
//! structured := '[' field ( sep field )* sep? ']'
//! field      := '(' text ',' text ','? ')' | text ',' text
//! sep        := ',' | ';'
//! text       := quoted string | bare word
//! ```
//! so both `[('a', 'int32'), ('b', '>f8')]` and `[a, int32; b, >f8]` are accepted.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::{
    DataTypeKind, Endianness, InvalidDataTypeError, PrimitiveDataType, StructField,
    StructuredDataType,
};

/// A data type parse error.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("failed to parse data type {input:?}: {kind}")]
pub struct DataTypeParseError {
    input: String,
    kind: DataTypeParseErrorKind,
}

impl DataTypeParseError {
    pub(crate) fn new(input: &str, kind: DataTypeParseErrorKind) -> Self {
        Self {
            input: input.to_string(),
            kind,
        }
    }

    /// Returns the string that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the kind of parse error.
    #[must_use]
    pub const fn kind(&self) -> &DataTypeParseErrorKind {
        &self.kind
    }
}

/// The kind of a [`DataTypeParseError`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DataTypeParseErrorKind {
    /// Not a known data type name or typestr.
    #[error("unknown data type {0:?}")]
    UnknownDataType(String),
    /// The data type is well formed but invalid.
    #[error(transparent)]
    InvalidDataType(#[from] InvalidDataTypeError),
    /// An unexpected token.
    #[error("expected {expected}, found {found:?}")]
    UnexpectedToken {
        /// What the parser expected.
        expected: &'static str,
        /// The token found.
        found: String,
    },
    /// The input ended early.
    #[error("expected {expected}, found end of input")]
    UnexpectedEnd {
        /// What the parser expected.
        expected: &'static str,
    },
    /// A quoted string is missing its closing quote.
    #[error("unterminated string")]
    UnterminatedString,
    /// A field of a structured data type is itself structured.
    #[error("nested structured data type in field {0:?}")]
    NestedStructure(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Token {
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Text(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LBracket => f.write_str("["),
            Self::RBracket => f.write_str("]"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::Comma => f.write_str(","),
            Self::Semicolon => f.write_str(";"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

const DELIMITERS: &[char] = &['[', ']', '(', ')', ',', ';', '\'', '"'];

fn tokenize(input: &str) -> Result<Vec<Token>, DataTypeParseErrorKind> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '[' | ']' | '(' | ')' | ',' | ';' => {
                chars.next();
                tokens.push(match c {
                    '[' => Token::LBracket,
                    ']' => Token::RBracket,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    _ => Token::Semicolon,
                });
            }
            '\'' | '"' => {
                chars.next();
                tokens.push(Token::Text(quoted(&mut chars, c)?));
            }
            _ => {
                let mut end = input.len();
                while let Some(&(index, c)) = chars.peek() {
                    if c.is_whitespace() || DELIMITERS.contains(&c) {
                        end = index;
                        break;
                    }
                    chars.next();
                }
                tokens.push(Token::Text(input[start..end].to_string()));
            }
        }
    }
    Ok(tokens)
}

fn quoted(
    chars: &mut Peekable<CharIndices<'_>>,
    quote: char,
) -> Result<String, DataTypeParseErrorKind> {
    let mut text = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => text.push(escaped),
                None => break,
            },
            c if c == quote => return Ok(text),
            c => text.push(c),
        }
    }
    Err(DataTypeParseErrorKind::UnterminatedString)
}

struct Parser {
    tokens: Peekable<std::vec::IntoIter<Token>>,
}

impl Parser {
    fn next(&mut self, expected: &'static str) -> Result<Token, DataTypeParseErrorKind> {
        self.tokens
            .next()
            .ok_or(DataTypeParseErrorKind::UnexpectedEnd { expected })
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<(), DataTypeParseErrorKind> {
        let found = self.next(expected)?;
        if &found == token {
            Ok(())
        } else {
            Err(DataTypeParseErrorKind::UnexpectedToken {
                expected,
                found: found.to_string(),
            })
        }
    }

    fn text(&mut self, expected: &'static str) -> Result<String, DataTypeParseErrorKind> {
        match self.next(expected)? {
            Token::Text(text) => Ok(text),
            token => Err(DataTypeParseErrorKind::UnexpectedToken {
                expected,
                found: token.to_string(),
            }),
        }
    }

    fn field(&mut self) -> Result<StructField, DataTypeParseErrorKind> {
        let parenthesised = self.tokens.next_if_eq(&Token::LParen).is_some();
        let name = self.text("field name")?;
        self.expect(&Token::Comma, "','")?;
        let data_type = self.text("field data type")?;
        if data_type.contains('[') {
            return Err(DataTypeParseErrorKind::NestedStructure(name));
        }
        let data_type = parse_primitive(&data_type)?;
        if parenthesised {
            self.tokens.next_if_eq(&Token::Comma);
            self.expect(&Token::RParen, "')'")?;
        }
        Ok(StructField::new(name, data_type))
    }

    fn structured(&mut self) -> Result<StructuredDataType, DataTypeParseErrorKind> {
        self.expect(&Token::LBracket, "'['")?;
        let mut fields = Vec::new();
        loop {
            if self.tokens.next_if_eq(&Token::RBracket).is_some() {
                break;
            }
            fields.push(self.field()?);
            match self.next("',', ';' or ']'")? {
                Token::Comma | Token::Semicolon => {}
                Token::RBracket => break,
                token => {
                    return Err(DataTypeParseErrorKind::UnexpectedToken {
                        expected: "',', ';' or ']'",
                        found: token.to_string(),
                    })
                }
            }
        }
        if let Some(token) = self.tokens.next() {
            return Err(DataTypeParseErrorKind::UnexpectedToken {
                expected: "end of input",
                found: token.to_string(),
            });
        }
        Ok(StructuredDataType::new(fields)?)
    }
}

/// Parse a structured data type string.
pub(crate) fn parse_structured(input: &str) -> Result<StructuredDataType, DataTypeParseErrorKind> {
    let tokens = tokenize(input)?;
    Parser {
        tokens: tokens.into_iter().peekable(),
    }
    .structured()
}

/// Parse a primitive data type string.
pub(crate) fn parse_primitive(input: &str) -> Result<PrimitiveDataType, DataTypeParseErrorKind> {
    let input = input.trim();
    if let Some(data_type) = PrimitiveDataType::from_name(input) {
        return Ok(data_type);
    }
    if input == "?" {
        return Ok(PrimitiveDataType::new(DataTypeKind::Bool, 1, Endianness::Little)?);
    }

    let unknown = || DataTypeParseErrorKind::UnknownDataType(input.to_string());
    let mut chars = input.chars();
    let (endianness, rest) = match chars.next() {
        Some('<' | '|') => (Endianness::Little, chars.as_str()),
        Some('>') => (Endianness::Big, chars.as_str()),
        Some('=') => (Endianness::native(), chars.as_str()),
        Some(_) => (Endianness::Little, input),
        None => return Err(unknown()),
    };
    let mut chars = rest.chars();
    let kind = chars
        .next()
        .and_then(DataTypeKind::from_typestr_char)
        .ok_or_else(unknown)?;
    let size = chars.as_str();
    if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
        return Err(unknown());
    }
    let size: usize = size.parse().map_err(|_| unknown())?;
    Ok(PrimitiveDataType::new(kind, size, endianness)?)
}
