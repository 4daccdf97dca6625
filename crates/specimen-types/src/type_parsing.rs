//! Type string parsing.
//!
//! Supports:
//! - Primitive types: `bool`, `char`, `string`, `u8`, `i32`, `i64`, `u32`, `u64`,
//!   `f32`, `f64`, `handle`
//! - Named and generic types: `Widget`, `Map<string, List<i32>>`
//! - Arrays and pointers as suffixes: `i32[]`, `Widget[,]`, `handle*`
//!
//! Names listed as generic parameters parse to [`TypeRef::Param`].
//!
//! # Examples
//!
//! ```
//! use specimen_types::type_parsing::{parse_type_ref, parse_type_ref_with_params};
//!
//! let t = parse_type_ref("List<Widget>[]").unwrap();
//! assert_eq!(t.to_string(), "List<Widget>[]");
//!
//! let open = parse_type_ref_with_params("Pair<K, V>", &["K", "V"]).unwrap();
//! assert!(open.is_open());
//! ```

use crate::types::{Primitive, TypeRef};
use std::fmt;

/// Failure to parse a type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParseError {
    pub input: String,
    pub position: usize,
    pub message: String,
}

impl fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot parse type '{}' at offset {}: {}",
            self.input, self.position, self.message
        )
    }
}

impl std::error::Error for TypeParseError {}

/// Parse a closed or open type string with no generic parameters in scope.
pub fn parse_type_ref(input: &str) -> Result<TypeRef, TypeParseError> {
    parse_type_ref_with_params::<&str>(input, &[])
}

/// Parse a type string, treating the given names as generic parameters.
pub fn parse_type_ref_with_params<S: AsRef<str>>(
    input: &str,
    params: &[S],
) -> Result<TypeRef, TypeParseError> {
    let mut parser = Parser {
        input,
        chars: input.char_indices().collect(),
        pos: 0,
        params: params.iter().map(|p| p.as_ref().to_string()).collect(),
    };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos < parser.chars.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

/// Split a comma-separated type list respecting nested angle brackets.
///
/// Given "A, B<C, D>, E", returns ["A", "B<C, D>", "E"].
pub fn split_type_params(s: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' | '[' => depth += 1,
            '>' | ']' => depth -= 1,
            ',' if depth == 0 => {
                result.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if start < s.len() {
        let last = s[start..].trim();
        if !last.is_empty() {
            result.push(last);
        }
    }

    result
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    params: Vec<String>,
}

impl Parser<'_> {
    fn parse_type(&mut self) -> Result<TypeRef, TypeParseError> {
        self.skip_ws();
        let name = self.parse_ident()?;
        self.skip_ws();

        let mut ty = if self.peek() == Some('<') {
            self.pos += 1;
            let mut args = vec![self.parse_type()?];
            loop {
                self.skip_ws();
                match self.peek() {
                    Some(',') => {
                        self.pos += 1;
                        args.push(self.parse_type()?);
                    }
                    Some('>') => {
                        self.pos += 1;
                        break;
                    }
                    _ => return Err(self.error("expected ',' or '>'")),
                }
            }
            TypeRef::Named { name, args }
        } else if let Some(p) = Primitive::from_name(&name) {
            TypeRef::Primitive(p)
        } else if self.params.contains(&name) {
            TypeRef::Param(name)
        } else {
            TypeRef::Named {
                name,
                args: Vec::new(),
            }
        };

        loop {
            self.skip_ws();
            match self.peek() {
                Some('[') => {
                    self.pos += 1;
                    let mut rank = 1;
                    loop {
                        self.skip_ws();
                        match self.peek() {
                            Some(',') => {
                                rank += 1;
                                self.pos += 1;
                            }
                            Some(']') => {
                                self.pos += 1;
                                break;
                            }
                            _ => return Err(self.error("expected ',' or ']'")),
                        }
                    }
                    ty = TypeRef::array_of_rank(ty, rank);
                }
                Some('*') => {
                    self.pos += 1;
                    ty = TypeRef::pointer(ty);
                }
                _ => break,
            }
        }

        Ok(ty)
    }

    fn parse_ident(&mut self) -> Result<String, TypeParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let valid = if self.pos == start {
                c.is_alphabetic() || c == '_'
            } else {
                c.is_alphanumeric() || c == '_' || c == ':' || c == '.'
            };
            if !valid {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a type name"));
        }
        Ok(self.chars[start..self.pos].iter().map(|(_, c)| c).collect())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self, message: &str) -> TypeParseError {
        let position = self
            .chars
            .get(self.pos)
            .map(|(i, _)| *i)
            .unwrap_or(self.input.len());
        TypeParseError {
            input: self.input.to_string(),
            position,
            message: message.to_string(),
        }
    }
}
