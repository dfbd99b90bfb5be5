//! Compiled selector groups used by the heuristics.
//!
//! Heuristic tables are plain strings so they can be overridden from config.
//! Compilation is lenient: a selector that fails to compile is logged and
//! dropped, so it simply never matches.

use themesnatch_css::{SelectorElement, SelectorList};
use tracing::debug;

/// An ordered group of compiled selectors.
#[derive(Debug, Clone, Default)]
pub struct SelectorSet {
    lists: Vec<SelectorList>,
}

impl SelectorSet {
    pub fn compile<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lists = selectors
            .into_iter()
            .filter_map(|source| match SelectorList::parse(source.as_ref()) {
                Ok(list) => Some(list),
                Err(err) => {
                    debug!(selector = source.as_ref(), error = %err, "ignoring selector");
                    None
                }
            })
            .collect();
        SelectorSet { lists }
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// True when any selector matches `element` itself.
    pub fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        self.lists.iter().any(|list| list.matches(element))
    }

    /// True when `element` or one of its ancestors matches.
    pub fn matches_self_or_ancestor<E: SelectorElement>(&self, element: &E) -> bool {
        self.lists.iter().any(|list| list.closest(element).is_some())
    }
}

/// Elements worth reading styles from: headings, text containers, controls,
/// landmarks, and class-name heuristics.
pub(crate) const KEY_ELEMENTS: &[&str] = &[
    "h1, h2, h3, h4, h5, h6",
    "p, span, div, a",
    "button, input, select, textarea",
    "nav, header, footer, main, section, article",
    r#"[class*="btn"], [class*="button"]"#,
    r#"[class*="card"], [class*="panel"]"#,
    r#"[class*="nav"], [class*="menu"]"#,
    r#"[class*="header"], [class*="hero"]"#,
    r#"[class*="content"], [class*="container"]"#,
];

/// Elements that carry design intent once ads and media are excluded.
pub(crate) const DESIGN_RELEVANT: &[&str] = &[
    "h1, h2, h3, h4, h5, h6",
    "p, span, div",
    "button, input, select, textarea",
    "nav, header, footer, main, section, article",
    r#"[class*="btn"], [class*="button"]"#,
    r#"[class*="card"], [class*="panel"]"#,
    r#"[class*="nav"], [class*="menu"]"#,
];

pub(crate) const NON_CONTENT: &[&str] = &["script, style, meta, link, title, head"];

/// Containers whose descendants are never sampled.
pub(crate) const OPAQUE_CONTAINERS: &[&str] = &["script, style, noscript, iframe"];
