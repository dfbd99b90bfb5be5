//! Error types for CSS value parsing.

use thiserror::Error;

/// Errors produced when a color string cannot be turned into RGB.
///
/// Callers treat both variants the same way: the value is dropped from its
/// candidate set rather than replaced with a guess.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// A syntactically valid CSS color this crate does not convert
    /// (`oklch()`, `hsl()`, `var()`, `currentColor`, `transparent`, ...).
    #[error("unsupported color format: {0}")]
    Unsupported(String),

    /// A hex or `rgb()` value that does not parse.
    #[error("malformed color value: {0}")]
    Malformed(String),
}

/// Errors produced when compiling a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector (or one entry of a selector list) is empty.
    #[error("empty selector in `{0}`")]
    Empty(String),

    /// The selector could not be tokenized into a supported form.
    #[error("invalid selector `{0}`")]
    Syntax(String),

    /// A pseudo-class outside the supported structural subset.
    #[error("unsupported pseudo-class `:{name}` in `{selector}`")]
    UnsupportedPseudo { name: String, selector: String },
}
