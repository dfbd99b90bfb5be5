//! A small CSS selector engine.
//!
//! Heuristics throughout the extractor are written as plain selector strings
//! (`[class*="btn"]`, `header nav`, `section:first-of-type`). This module
//! compiles them with the `cssparser` tokenizer and matches them against any
//! tree that implements [`SelectorElement`].
//!
//! Supported syntax:
//!
//! - type, universal, `#id` and `.class` selectors
//! - attribute selectors: `[a]`, `[a=v]`, `[a~=v]`, `[a|=v]`, `[a^=v]`,
//!   `[a$=v]`, `[a*=v]`, with an optional `i` flag
//! - pseudo-classes `:root`, `:first-child`, `:last-child`, `:first-of-type`
//! - descendant (whitespace) and child (`>`) combinators
//! - comma-separated selector lists
//!
//! Anything else fails to compile with a [`SelectorError`].

use std::borrow::Cow;

use cssparser::{ParseError, Parser, ParserInput, Token};

use crate::error::SelectorError;

/// Read access to an element for selector matching.
///
/// Implementations are expected to be cheap handles (an index plus a
/// reference to the owning tree), hence `Clone` and by-value navigation.
pub trait SelectorElement: Clone {
    /// Lowercase tag name.
    fn local_name(&self) -> &str;
    fn id(&self) -> Option<&str>;
    fn has_class(&self, name: &str) -> bool;
    /// Attribute value; `class` must return the full space-separated list.
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>>;
    fn parent(&self) -> Option<Self>;
    fn prev_sibling(&self) -> Option<Self>;
    fn next_sibling(&self) -> Option<Self>;
    fn is_root(&self) -> bool;
}

/// A compiled, comma-separated selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    source: String,
    selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Compiles a selector list.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut input = ParserInput::new(source);
        let mut parser = Parser::new(&mut input);
        let mut selectors = Vec::new();
        let mut builder = ComplexBuilder::default();

        loop {
            let token = match parser.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };
            match token {
                Token::WhiteSpace(_) | Token::Comment(_) => builder.end_compound(),
                Token::Comma => selectors.push(builder.finish(source)?),
                Token::Delim('>') => builder.combinator(Combinator::Child, source)?,
                Token::Ident(name) => {
                    builder.start_type(source)?.tag = Some(name.to_ascii_lowercase());
                }
                Token::Delim('*') => {
                    builder.start_type(source)?;
                }
                Token::IDHash(id) => builder.compound().ids.push(id.to_string()),
                Token::Delim('.') => {
                    let class = parser
                        .expect_ident_cloned()
                        .map_err(|_| SelectorError::Syntax(source.to_string()))?;
                    builder.compound().classes.push(class.to_string());
                }
                Token::SquareBracketBlock => {
                    let attr = parser
                        .parse_nested_block(|p| parse_attribute(p))
                        .map_err(|_| SelectorError::Syntax(source.to_string()))?;
                    builder.compound().attributes.push(attr);
                }
                Token::Colon => {
                    let name = parser
                        .expect_ident_cloned()
                        .map_err(|_| SelectorError::Syntax(source.to_string()))?;
                    let pseudo = Pseudo::from_name(&name).ok_or_else(|| {
                        SelectorError::UnsupportedPseudo {
                            name: name.to_string(),
                            selector: source.to_string(),
                        }
                    })?;
                    builder.compound().pseudos.push(pseudo);
                }
                _ => return Err(SelectorError::Syntax(source.to_string())),
            }
        }
        selectors.push(builder.finish(source)?);

        Ok(SelectorList {
            source: source.to_string(),
            selectors,
        })
    }

    /// The text this list was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when any selector in the list matches `element`.
    pub fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        self.selectors.iter().any(|s| s.matches(element))
    }

    /// The element itself or its nearest ancestor that matches.
    pub fn closest<E: SelectorElement>(&self, element: &E) -> Option<E> {
        let mut current = Some(element.clone());
        while let Some(el) = current {
            if self.matches(&el) {
                return Some(el);
            }
            current = el.parent();
        }
        None
    }
}

impl std::str::FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SelectorList::parse(s)
    }
}

// ─── Selector structure ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Compounds stored left to right; `combinators[i]` joins compound `i` and
/// `i + 1`.
#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

impl ComplexSelector {
    fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        self.matches_at(self.compounds.len() - 1, element)
    }

    fn matches_at<E: SelectorElement>(&self, index: usize, element: &E) -> bool {
        if !self.compounds[index].matches(element) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => element
                .parent()
                .is_some_and(|parent| self.matches_at(index - 1, &parent)),
            Combinator::Descendant => {
                let mut ancestor = element.parent();
                while let Some(el) = ancestor {
                    if self.matches_at(index - 1, &el) {
                        return true;
                    }
                    ancestor = el.parent();
                }
                false
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeSelector>,
    pseudos: Vec<Pseudo>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.ids.is_empty()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.pseudos.is_empty()
    }

    fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        if let Some(tag) = &self.tag {
            if !element.local_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if !self.ids.iter().all(|id| element.id() == Some(id.as_str())) {
            return false;
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        if !self.attributes.iter().all(|attr| attr.matches(element)) {
            return false;
        }
        self.pseudos.iter().all(|pseudo| pseudo.matches(element))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeOp {
    Exists,
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Debug, Clone, PartialEq)]
struct AttributeSelector {
    name: String,
    op: AttributeOp,
    value: String,
    case_insensitive: bool,
}

impl AttributeSelector {
    fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        let Some(actual) = element.attribute(&self.name) else {
            return false;
        };
        let (actual, expected) = if self.case_insensitive {
            (
                Cow::Owned(actual.to_ascii_lowercase()),
                Cow::Owned(self.value.to_ascii_lowercase()),
            )
        } else {
            (actual, Cow::Borrowed(self.value.as_str()))
        };
        let expected = expected.as_ref();

        match self.op {
            AttributeOp::Exists => true,
            AttributeOp::Equals => actual == expected,
            AttributeOp::Includes => {
                !expected.is_empty() && actual.split_whitespace().any(|word| word == expected)
            }
            AttributeOp::DashMatch => {
                actual == expected || actual.starts_with(&format!("{}-", expected))
            }
            AttributeOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
            AttributeOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
            AttributeOp::Substring => !expected.is_empty() && actual.contains(expected),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pseudo {
    Root,
    FirstChild,
    LastChild,
    FirstOfType,
}

impl Pseudo {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "root" => Some(Pseudo::Root),
            "first-child" => Some(Pseudo::FirstChild),
            "last-child" => Some(Pseudo::LastChild),
            "first-of-type" => Some(Pseudo::FirstOfType),
            _ => None,
        }
    }

    fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        match self {
            Pseudo::Root => element.is_root(),
            Pseudo::FirstChild => element.prev_sibling().is_none(),
            Pseudo::LastChild => element.next_sibling().is_none(),
            Pseudo::FirstOfType => {
                let mut sibling = element.prev_sibling();
                while let Some(el) = sibling {
                    if el.local_name() == element.local_name() {
                        return false;
                    }
                    sibling = el.prev_sibling();
                }
                true
            }
        }
    }
}

// ─── Parsing helpers ────────────────────────────────────────────────────────

#[derive(Default)]
struct ComplexBuilder {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
    current: Option<Compound>,
    pending: Option<Combinator>,
}

impl ComplexBuilder {
    /// The compound under construction, opened on first use.
    fn compound(&mut self) -> &mut Compound {
        if self.current.is_none() {
            if !self.compounds.is_empty() {
                let combinator = self.pending.take().unwrap_or(Combinator::Descendant);
                self.combinators.push(combinator);
            }
            self.current = Some(Compound::default());
        }
        self.current.get_or_insert_with(Compound::default)
    }

    /// Type and universal selectors must open a compound.
    fn start_type(&mut self, source: &str) -> Result<&mut Compound, SelectorError> {
        if self.current.as_ref().is_some_and(|c| !c.is_empty()) {
            return Err(SelectorError::Syntax(source.to_string()));
        }
        Ok(self.compound())
    }

    fn end_compound(&mut self) {
        if let Some(compound) = self.current.take() {
            self.compounds.push(compound);
        }
    }

    fn combinator(&mut self, combinator: Combinator, source: &str) -> Result<(), SelectorError> {
        self.end_compound();
        if self.compounds.is_empty() || self.pending.is_some() {
            return Err(SelectorError::Syntax(source.to_string()));
        }
        self.pending = Some(combinator);
        Ok(())
    }

    fn finish(&mut self, source: &str) -> Result<ComplexSelector, SelectorError> {
        self.end_compound();
        let builder = std::mem::take(self);
        if builder.compounds.is_empty() {
            return Err(SelectorError::Empty(source.to_string()));
        }
        if builder.pending.is_some() {
            return Err(SelectorError::Syntax(source.to_string()));
        }
        Ok(ComplexSelector {
            compounds: builder.compounds,
            combinators: builder.combinators,
        })
    }
}

fn parse_attribute<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<AttributeSelector, ParseError<'i, ()>> {
    let name = input.expect_ident()?.to_ascii_lowercase();
    if input.is_exhausted() {
        return Ok(AttributeSelector {
            name,
            op: AttributeOp::Exists,
            value: String::new(),
            case_insensitive: false,
        });
    }

    let op = match input.next()?.clone() {
        Token::Delim('=') => AttributeOp::Equals,
        Token::IncludeMatch => AttributeOp::Includes,
        Token::DashMatch => AttributeOp::DashMatch,
        Token::PrefixMatch => AttributeOp::Prefix,
        Token::SuffixMatch => AttributeOp::Suffix,
        Token::SubstringMatch => AttributeOp::Substring,
        _ => return Err(input.new_custom_error(())),
    };

    let value = match input.next()?.clone() {
        Token::Ident(v) | Token::QuotedString(v) => v.to_string(),
        _ => return Err(input.new_custom_error(())),
    };

    let case_insensitive = input
        .try_parse(|p| p.expect_ident_matching("i"))
        .is_ok();

    Ok(AttributeSelector {
        name,
        op,
        value,
        case_insensitive,
    })
}
