//! Structural context of an observation.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::document::ElementRef;
use crate::selectors::SelectorSet;

/// Where in the page structure a style value was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Heading,
    Button,
    Link,
    Navigation,
    Body,
    Card,
    Page,
    Surface,
}

/// Coarse groups used by the intentionality heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextGroup {
    Interactive,
    Navigation,
    Content,
    Heading,
}

impl Context {
    pub fn as_str(self) -> &'static str {
        match self {
            Context::Heading => "heading",
            Context::Button => "button",
            Context::Link => "link",
            Context::Navigation => "navigation",
            Context::Body => "body",
            Context::Card => "card",
            Context::Page => "page",
            Context::Surface => "surface",
        }
    }

    /// Page, surface and body contexts belong to no group.
    pub fn group(self) -> Option<ContextGroup> {
        match self {
            Context::Button | Context::Link => Some(ContextGroup::Interactive),
            Context::Navigation => Some(ContextGroup::Navigation),
            Context::Card => Some(ContextGroup::Content),
            Context::Heading => Some(ContextGroup::Heading),
            Context::Body | Context::Page | Context::Surface => None,
        }
    }
}

static BUTTON: Lazy<SelectorSet> = Lazy::new(|| {
    SelectorSet::compile([
        "button",
        r#"input[type="button" i], input[type="submit" i]"#,
        r#"[role="button"]"#,
        r#"[class*="btn"], [class*="button"]"#,
    ])
});

static LINK: Lazy<SelectorSet> = Lazy::new(|| SelectorSet::compile(["a"]));

static HEADING: Lazy<SelectorSet> = Lazy::new(|| SelectorSet::compile(["h1, h2, h3, h4, h5, h6"]));

static NAVIGATION: Lazy<SelectorSet> = Lazy::new(|| {
    SelectorSet::compile([
        "nav",
        r#"[role="navigation"]"#,
        r#"[class*="nav"], [class*="menu"]"#,
    ])
});

static CARD: Lazy<SelectorSet> =
    Lazy::new(|| SelectorSet::compile([r#"article, [class*="card"], [class*="panel"]"#]));

static PAGE: Lazy<SelectorSet> =
    Lazy::new(|| SelectorSet::compile(["html, body, main, header, footer"]));

static SURFACE: Lazy<SelectorSet> = Lazy::new(|| {
    SelectorSet::compile([
        "section, aside",
        r#"[class*="container"], [class*="content"], [class*="hero"]"#,
    ])
});

/// Decides the context of `element`.
///
/// Button, link, heading, navigation and card apply when the element or an
/// ancestor matches; page and surface only for the element itself. The first
/// match in that order wins, falling back to body.
pub fn classify(element: &ElementRef<'_>) -> Context {
    if BUTTON.matches_self_or_ancestor(element) {
        Context::Button
    } else if LINK.matches_self_or_ancestor(element) {
        Context::Link
    } else if HEADING.matches_self_or_ancestor(element) {
        Context::Heading
    } else if NAVIGATION.matches_self_or_ancestor(element) {
        Context::Navigation
    } else if CARD.matches_self_or_ancestor(element) {
        Context::Card
    } else if PAGE.matches(element) {
        Context::Page
    } else if SURFACE.matches(element) {
        Context::Surface
    } else {
        Context::Body
    }
}
