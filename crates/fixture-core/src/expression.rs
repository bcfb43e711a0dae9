//! Path expressions
//!
//! [`ArbitraryExpression`] parses paths such as `$.orders[2].id`, `items[*]`
//! or `*` and turns them into a [`NodeResolver`] chain starting at the root.
//!
//! # Grammar
//!
//! ```text
//! expression := "$" step* | first step*
//! first      := name | index
//! step       := "." name | index
//! name       := identifier | "*"
//! index      := "[" digits "]" | "[*]"
//! ```

use crate::resolver::{IdentityNodeResolver, NodeResolver, PropertyNameNodeResolver, RootNodeResolver};
use fixture_api::{FixtureError, Result};
use std::fmt;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Field by name
    Name(String),
    /// Element by index
    Index(usize),
    /// Every field of an object
    Wildcard,
    /// Every element of a container
    AllElements,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, ".{name}"),
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Wildcard => f.write_str(".*"),
            Self::AllElements => f.write_str("[*]"),
        }
    }
}

/// Parsed path expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArbitraryExpression {
    segments: Vec<Segment>,
}

impl ArbitraryExpression {
    /// Expression selecting the root
    #[must_use]
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    /// Parse `input`
    ///
    /// # Errors
    /// Returns `InvalidExpression` on malformed paths
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input).parse()
    }

    /// Steps below the root
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Resolver chain selecting the nodes this path addresses
    #[must_use]
    pub fn to_node_resolver(&self) -> Box<dyn NodeResolver> {
        let root: Box<dyn NodeResolver> = Box::new(RootNodeResolver);
        if self.segments.is_empty() {
            return Box::new(IdentityNodeResolver::new(root));
        }

        self.segments.iter().fold(root, |previous, segment| {
            let step = match segment {
                Segment::Name(name) => PropertyNameNodeResolver::new(previous, name.clone()),
                Segment::Index(index) => PropertyNameNodeResolver::new(previous, format!("[{index}]")),
                Segment::Wildcard | Segment::AllElements => PropertyNameNodeResolver::wildcard(previous),
            };
            Box::new(step) as Box<dyn NodeResolver>
        })
    }
}

impl FromStr for ArbitraryExpression {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ArbitraryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.trim().chars().peekable(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> FixtureError {
        FixtureError::invalid_expression(self.input, reason)
    }

    fn parse(mut self) -> Result<ArbitraryExpression> {
        if self.chars.peek().is_none() {
            return Err(self.error("empty expression"));
        }

        let mut segments = Vec::new();
        // a bare name is only allowed as the first step
        let mut first = true;
        if self.chars.peek() == Some(&'$') {
            self.chars.next();
            first = false;
        }

        while let Some(&c) = self.chars.peek() {
            match c {
                '[' => {
                    self.chars.next();
                    segments.push(self.index()?);
                }
                '.' if !first => {
                    self.chars.next();
                    segments.push(self.name()?);
                }
                '.' => return Err(self.error("leading '.'")),
                _ if first => segments.push(self.name()?),
                other => return Err(self.error(format!("expected '.' or '[' before '{other}'"))),
            }
            first = false;
        }

        Ok(ArbitraryExpression { segments })
    }

    fn name(&mut self) -> Result<Segment> {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' || c == '*' {
                name.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        match name.as_str() {
            "" => match self.chars.peek().copied() {
                Some(c) => Err(self.error(format!("unexpected '{c}'"))),
                None => Err(self.error("missing name after '.'")),
            },
            "*" => Ok(Segment::Wildcard),
            _ if name.contains('*') => Err(self.error(format!("'*' must stand alone, found `{name}`"))),
            _ => Ok(Segment::Name(name)),
        }
    }

    fn index(&mut self) -> Result<Segment> {
        let mut inner = String::new();
        loop {
            match self.chars.next() {
                Some(']') => break,
                Some(c) => inner.push(c),
                None => return Err(self.error("unclosed '['")),
            }
        }

        let inner = inner.trim();
        if inner == "*" {
            return Ok(Segment::AllElements);
        }
        inner
            .parse::<usize>()
            .map(Segment::Index)
            .map_err(|_| self.error(format!("invalid index `{inner}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segments(input: &str) -> Vec<Segment> {
        ArbitraryExpression::parse(input).unwrap().segments().to_vec()
    }

    #[test]
    fn parses_names_and_indices() {
        assert_eq!(
            segments("$.orders[2].id"),
            vec![
                Segment::Name("orders".into()),
                Segment::Index(2),
                Segment::Name("id".into()),
            ]
        );
        assert_eq!(segments("orders[2].id"), segments("$.orders[2].id"));
        assert_eq!(segments("items[*]"), vec![Segment::Name("items".into()), Segment::AllElements]);
        assert_eq!(segments("*"), vec![Segment::Wildcard]);
        assert_eq!(segments("[0]"), vec![Segment::Index(0)]);
        assert!(segments("$").is_empty());
    }

    #[test]
    fn display_is_canonical() {
        let expression: ArbitraryExpression = "a.b[3].*".parse().unwrap();
        assert_eq!(expression.to_string(), "$.a.b[3].*");
        assert_eq!(ArbitraryExpression::root().to_string(), "$");
    }

    #[test]
    fn rejects_malformed_paths() {
        for input in ["", "a..b", ".a", "a.", "a[1", "a[x]", "$a", "a*b", "a b"] {
            let err = ArbitraryExpression::parse(input).unwrap_err();
            assert!(
                matches!(err, FixtureError::InvalidExpression { .. }),
                "{input} gave {err:?}"
            );
        }
    }
}
