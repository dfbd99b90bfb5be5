//! Recurring UI component detection.
//!
//! Six independent rules, one per [`ComponentKind`], each pairing a selector
//! group with a qualifying predicate. Matches are grouped by visual signature
//! so a hundred identical buttons become one pattern with frequency 100.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use themesnatch_css::{is_transparent, parse_length};
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::document::{Document, ElementRef};
use crate::selectors::SelectorSet;
use crate::theme::{ComponentKind, ComponentPattern, StyleSignature};

/// One entry of the strategy table.
struct ComponentRule {
    kind: ComponentKind,
    selectors: &'static [&'static str],
    qualifies: fn(&ElementRef<'_>, &ExtractionConfig) -> bool,
}

const RULES: [ComponentRule; 6] = [
    ComponentRule {
        kind: ComponentKind::Button,
        selectors: &[
            "button",
            r#"input[type="button" i], input[type="submit" i]"#,
            r#"[role="button"]"#,
            r#"[class*="btn"], [class*="button"]"#,
        ],
        qualifies: always,
    },
    ComponentRule {
        kind: ComponentKind::Card,
        selectors: &[
            r#"[class*="card"], [class*="panel"], [class*="tile"]"#,
            "article",
            r#"[class*="box"]"#,
        ],
        qualifies: card_like,
    },
    ComponentRule {
        kind: ComponentKind::Form,
        selectors: &[r#"form, [class*="form"]"#],
        qualifies: always,
    },
    ComponentRule {
        kind: ComponentKind::Nav,
        selectors: &[
            "nav",
            r#"[role="navigation"]"#,
            r#"[class*="nav"], [class*="menu"]"#,
        ],
        qualifies: always,
    },
    ComponentRule {
        kind: ComponentKind::Hero,
        selectors: &[
            r#"[class*="hero"], [class*="banner"], [class*="jumbotron"]"#,
            r#"header[class*="main"]"#,
            "section:first-of-type",
        ],
        qualifies: hero_like,
    },
    ComponentRule {
        kind: ComponentKind::Container,
        selectors: &[
            r#"[class*="container"], [class*="wrapper"], [class*="content"]"#,
            "main",
            r#"[class*="layout"]"#,
        ],
        qualifies: container_like,
    },
];

static COMPILED: Lazy<Vec<SelectorSet>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|rule| SelectorSet::compile(rule.selectors))
        .collect()
});

/// Scans `doc` with every rule and returns the most frequent patterns.
pub fn detect_components(doc: &Document, config: &ExtractionConfig) -> Vec<ComponentPattern> {
    let mut patterns: Vec<ComponentPattern> = Vec::new();
    let mut index: HashMap<(ComponentKind, StyleSignature), usize> = HashMap::new();

    for (rule, selectors) in RULES.iter().zip(COMPILED.iter()) {
        let mut matched = 0usize;
        for element in doc.elements() {
            if !element.is_visible() || !selectors.matches(&element) {
                continue;
            }
            if !(rule.qualifies)(&element, config) {
                continue;
            }
            matched += 1;

            let styles = signature(&element);
            let key = (rule.kind, dedup_key(&styles));
            match index.get(&key) {
                Some(&i) => patterns[i].frequency += 1,
                None => {
                    index.insert(key, patterns.len());
                    patterns.push(ComponentPattern {
                        kind: rule.kind,
                        selector: element.selector(),
                        styles,
                        frequency: 1,
                    });
                }
            }
        }
        debug!(kind = %rule.kind, matched, "component rule finished");
    }

    patterns.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    patterns.truncate(config.max_components);
    patterns
}

/// Reads the normalized style signature of `element`.
pub fn signature(element: &ElementRef<'_>) -> StyleSignature {
    StyleSignature {
        border_radius: non_default(element.style("border-radius"), is_zero_length),
        box_shadow: non_default(element.style("box-shadow"), |v| v == "none"),
        border: non_default(element.style("border"), |v| !has_visible_border(v)),
        background_color: non_default(element.style("background-color"), is_transparent),
        padding: non_default(element.style("padding"), is_zero_length),
        margin: non_default(element.style("margin"), is_zero_length),
    }
}

/// Only radius, shadow and background take part in grouping.
fn dedup_key(styles: &StyleSignature) -> StyleSignature {
    StyleSignature {
        border_radius: styles.border_radius.clone(),
        box_shadow: styles.box_shadow.clone(),
        background_color: styles.background_color.clone(),
        ..Default::default()
    }
}

fn non_default(value: &str, is_default: impl Fn(&str) -> bool) -> Option<String> {
    let value = value.trim();
    (!value.is_empty() && !is_default(value)).then(|| value.to_string())
}

/// True when every whitespace-separated token is a zero length.
fn is_zero_length(value: &str) -> bool {
    value
        .split_whitespace()
        .all(|token| parse_length(token) == Some(0.0))
}

/// A border shorthand with a positive width and a painted style.
pub fn has_visible_border(border: &str) -> bool {
    const HIDDEN: [&str; 2] = ["none", "hidden"];
    const PAINTED: [&str; 8] = [
        "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
    ];

    let mut width = None;
    let mut style = None;
    for token in border.split_whitespace() {
        let lower = token.to_ascii_lowercase();
        if width.is_none() {
            if let Some(px) = parse_length(token) {
                width = Some(px);
                continue;
            }
            if matches!(lower.as_str(), "thin" | "medium" | "thick") {
                width = Some(1.0);
                continue;
            }
        }
        if HIDDEN.contains(&lower.as_str()) || PAINTED.contains(&lower.as_str()) {
            style = Some(lower);
        }
    }

    // Omitted width defaults to `medium`.
    let width = width.unwrap_or(1.0);
    matches!(style, Some(s) if width > 0.0 && !HIDDEN.contains(&s.as_str()))
}

fn always(_: &ElementRef<'_>, _: &ExtractionConfig) -> bool {
    true
}

fn card_like(element: &ElementRef<'_>, _: &ExtractionConfig) -> bool {
    let radius = element.style("border-radius").trim();
    let shadow = element.style("box-shadow").trim();
    (!radius.is_empty() && !is_zero_length(radius))
        || (!shadow.is_empty() && shadow != "none")
        || has_visible_border(element.style("border"))
}

fn hero_like(element: &ElementRef<'_>, config: &ExtractionConfig) -> bool {
    let rect = element.rect();
    rect.height > config.hero_min_height && rect.width > config.hero_min_width
}

fn container_like(element: &ElementRef<'_>, _: &ExtractionConfig) -> bool {
    let max_width = element.style("max-width").trim();
    (!max_width.is_empty() && max_width != "none") || element.style("margin").contains("auto")
}
