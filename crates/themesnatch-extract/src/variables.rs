//! Colors declared as global custom properties.
//!
//! Authors who define `--brand-primary: #3366ff` on `:root` have told us the
//! palette outright, so these colors skip the frequency heuristics entirely.
//! Declarations come from every readable stylesheet, in document order,
//! followed by the custom properties in the root element's computed style,
//! which override the stylesheet values.

use themesnatch_css::{
    global_custom_properties, parse_color_alpha, resolve_custom_properties, CustomProperty,
};
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::document::Document;
use crate::theme::{ColorCandidate, ColorCategory};

/// Every global custom property of `doc`, with `var()` aliases resolved.
pub fn collect_custom_properties(doc: &Document) -> Vec<CustomProperty> {
    let mut declared = Vec::new();
    for (index, sheet) in doc.stylesheets().iter().enumerate() {
        match &sheet.text {
            Some(text) => declared.extend(global_custom_properties(text)),
            None => debug!(
                index,
                href = sheet.href.as_deref().unwrap_or("<inline>"),
                "skipping unreadable stylesheet"
            ),
        }
    }

    if let Some(root) = doc.root() {
        declared.extend(
            root.styles()
                .filter(|(name, _)| name.starts_with("--"))
                .map(|(name, value)| CustomProperty::new(name, value.trim())),
        );
    }

    resolve_custom_properties(&declared)
}

/// Color candidates for every custom property whose value is a color.
pub fn variable_colors(doc: &Document, config: &ExtractionConfig) -> Vec<ColorCandidate> {
    collect_custom_properties(doc)
        .into_iter()
        .filter_map(|property| match parse_color_alpha(&property.value) {
            Ok(color) if color.is_transparent() => None,
            Ok(color) => Some(ColorCandidate::from_variable(
                &property.name,
                color.rgb,
                variable_category(&property.name),
                config.variable_priority,
            )),
            Err(_) => None,
        })
        .collect()
}

/// Category implied by a custom property name.
pub fn variable_category(name: &str) -> ColorCategory {
    let name = name.to_ascii_lowercase();
    if name.contains("background") || name.contains("bg") {
        ColorCategory::Background
    } else if ["text", "foreground", "fg"].iter().any(|k| name.contains(k)) {
        ColorCategory::Text
    } else if name.contains("border") {
        ColorCategory::Border
    } else {
        ColorCategory::Accent
    }
}

/// Puts variable colors ahead of inferred ones.
///
/// An inferred candidate with exactly the same color as a variable is folded
/// into the first such variable, which keeps its name and weight.
pub fn merge_variable_colors(
    inferred: Vec<ColorCandidate>,
    mut variables: Vec<ColorCandidate>,
) -> Vec<ColorCandidate> {
    let mut rest = Vec::with_capacity(inferred.len());
    for candidate in inferred {
        match variables.iter_mut().find(|v| v.rgb == candidate.rgb) {
            Some(variable) => {
                debug!(
                    color = candidate.value.as_str(),
                    variable = variable.source_variable_name.as_deref().unwrap_or_default(),
                    "inferred color matches a custom property"
                );
                variable.merge_provenance(&candidate);
            }
            None => rest.push(candidate),
        }
    }

    variables.extend(rest);
    variables.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    variables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::document::{DocumentSnapshot, ElementData, StylesheetData};
    use themesnatch_css::Rgb;

    fn doc(sheets: Vec<Option<&str>>, root: ElementData) -> Document {
        Document::new(DocumentSnapshot {
            elements: vec![root],
            stylesheets: sheets
                .into_iter()
                .map(|text| StylesheetData {
                    href: None,
                    text: text.map(str::to_string),
                })
                .collect(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_collects_from_sheets_and_root() {
        let doc = doc(
            vec![
                Some(":root { --brand: #3366ff; --gap: 8px; }"),
                None,
                Some("body { --accent: var(--brand); } .card { --ignored: red; }"),
            ],
            ElementData::new("html").with_style("--gap", " 12px"),
        );
        let props = collect_custom_properties(&doc);
        let pairs: Vec<(&str, &str)> = props
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("--brand", "#3366ff"), ("--gap", "12px"), ("--accent", "#3366ff")]
        );
    }

    #[test]
    fn test_variable_colors() {
        let doc = doc(
            vec![Some(
                ":root { --brand-primary: #3366ff; --bg: rgb(250, 250, 250); --radius: 4px; \
                 --overlay: rgba(0, 0, 0, 0); --tint: oklch(0.7 0.1 200); }",
            )],
            ElementData::new("html"),
        );
        let colors = variable_colors(&doc, &ExtractionConfig::default());
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0].value, "#3366ff");
        assert_eq!(colors[0].source_variable_name.as_deref(), Some("brand-primary"));
        assert_eq!(colors[0].frequency, 1000);
        assert_eq!(colors[0].category, ColorCategory::Accent);
        assert_eq!(colors[1].category, ColorCategory::Background);
    }

    #[test]
    fn test_category_keywords() {
        assert_eq!(variable_category("--surface-bg"), ColorCategory::Background);
        assert_eq!(variable_category("--color-fg"), ColorCategory::Text);
        assert_eq!(variable_category("--border-subtle"), ColorCategory::Border);
        assert_eq!(variable_category("--brand"), ColorCategory::Accent);
    }

    #[test]
    fn test_merge_folds_duplicates() {
        let variable =
            ColorCandidate::from_variable("--brand", Rgb::new(51, 102, 255), ColorCategory::Accent, 1000);
        let mut same = ColorCandidate::new(Rgb::new(51, 102, 255), ColorCategory::Text);
        same.observe(".btn", 4, Context::Button);
        same.observe(".btn", 4, Context::Button);
        let mut other = ColorCandidate::new(Rgb::new(200, 30, 30), ColorCategory::Text);
        other.observe("p", 5, Context::Body);

        let merged = merge_variable_colors(vec![same, other], vec![variable]);
        assert_eq!(merged.len(), 2);
        assert!(merged[0].is_variable());
        assert_eq!(merged[0].frequency, 1000);
        assert!(merged[0].contexts.contains(&Context::Button));
        assert_eq!(merged[0].elements, vec![":root", ".btn"]);
        assert_eq!(merged[1].value, "#c81e1e");
    }
}
