//! Frequency tables built from sampled elements.
//!
//! One [`Aggregation`] is created per extraction run, fed every sampled
//! element, and consumed by [`Aggregation::finish`]. Nothing is shared
//! between runs.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use themesnatch_css::{
    cluster, parse_color_alpha, parse_length_with_root, quantize, shadow_colors, ColorError, Rgb,
    SpacingKind,
};
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::context::{classify, Context};
use crate::document::ElementRef;
use crate::selectors::SelectorSet;
use crate::theme::{ColorCandidate, ColorCategory, FontCandidate, FontCategory, SpacingCandidate};

/// Color properties read from every element, with the category they record.
const COLOR_PROPERTIES: [(&str, ColorCategory); 9] = [
    ("color", ColorCategory::Text),
    ("background-color", ColorCategory::Background),
    ("border-color", ColorCategory::Border),
    ("border-top-color", ColorCategory::Border),
    ("border-right-color", ColorCategory::Border),
    ("border-bottom-color", ColorCategory::Border),
    ("border-left-color", ColorCategory::Border),
    ("box-shadow", ColorCategory::Accent),
    ("text-shadow", ColorCategory::Accent),
];

static HEADING_FONT: Lazy<SelectorSet> =
    Lazy::new(|| SelectorSet::compile(["h1, h2, h3, h4, h5, h6"]));

static BODY_FONT: Lazy<SelectorSet> =
    Lazy::new(|| SelectorSet::compile(["p, div, span, article, section"]));

/// Ranked candidates produced by one aggregation.
#[derive(Debug, Clone, Default)]
pub struct Aggregated {
    pub colors: Vec<ColorCandidate>,
    pub fonts: Vec<FontCandidate>,
    pub spacing: Vec<SpacingCandidate>,
}

/// Per-run frequency state.
#[derive(Debug)]
pub struct Aggregation<'c> {
    config: &'c ExtractionConfig,
    colors: Vec<ColorCandidate>,
    color_index: HashMap<Rgb, usize>,
    fonts: Vec<FontCandidate>,
    font_index: HashMap<(String, String, String), usize>,
    spacing: Vec<SpacingCandidate>,
    spacing_index: HashMap<(SpacingKind, String), usize>,
}

impl<'c> Aggregation<'c> {
    pub fn new(config: &'c ExtractionConfig) -> Self {
        Aggregation {
            config,
            colors: Vec::new(),
            color_index: HashMap::new(),
            fonts: Vec::new(),
            font_index: HashMap::new(),
            spacing: Vec::new(),
            spacing_index: HashMap::new(),
        }
    }

    /// Records every color, font and spacing value of `element`.
    pub fn observe(&mut self, element: &ElementRef<'_>) {
        let context = classify(element);
        let selector = element.selector();

        for (property, category) in COLOR_PROPERTIES {
            let value = element.style(property).trim();
            if value.is_empty() || value == "none" {
                continue;
            }
            if property.ends_with("shadow") {
                for color in shadow_colors(value) {
                    if !color.is_transparent() {
                        self.record_color(color.rgb, category, &selector, element.index(), context);
                    }
                }
            } else {
                match parse_color_alpha(value) {
                    Ok(color) if color.is_transparent() => {}
                    Ok(color) => {
                        self.record_color(color.rgb, category, &selector, element.index(), context)
                    }
                    Err(ColorError::Unsupported(_)) if value.eq_ignore_ascii_case("transparent") => {}
                    Err(err) => debug!(property, error = %err, "dropping color value"),
                }
            }
        }

        self.observe_font(element, &selector, context);
        for kind in [SpacingKind::Margin, SpacingKind::Padding] {
            self.observe_spacing(element, kind, &selector);
        }
    }

    fn record_color(
        &mut self,
        rgb: Rgb,
        category: ColorCategory,
        selector: &str,
        source: usize,
        context: Context,
    ) {
        let brightness = rgb.brightness();
        if brightness > self.config.max_color_brightness
            || brightness < self.config.min_color_brightness
        {
            return;
        }

        let index = *self.color_index.entry(rgb).or_insert_with(|| {
            self.colors.push(ColorCandidate::new(rgb, category));
            self.colors.len() - 1
        });
        self.colors[index].observe(selector, source, context);
    }

    fn observe_font(&mut self, element: &ElementRef<'_>, selector: &str, context: Context) {
        let raw = element.style("font-family");
        let stack: Vec<String> = raw
            .split(',')
            .map(|family| family.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string())
            .filter(|family| !family.is_empty())
            .collect();
        let Some(family) = stack.first().cloned() else {
            return;
        };

        let weight = element.style("font-weight").trim().to_string();
        let size = element.style("font-size").trim().to_string();
        let key = (family.clone(), weight.clone(), size.clone());

        let index = match self.font_index.get(&key) {
            Some(index) => *index,
            None => {
                self.fonts.push(FontCandidate {
                    family,
                    stack,
                    weight,
                    size,
                    line_height: element.style("line-height").trim().to_string(),
                    frequency: 0,
                    contexts: Default::default(),
                    category: font_category(element),
                    elements: Vec::new(),
                    role: None,
                });
                self.font_index.insert(key, self.fonts.len() - 1);
                self.fonts.len() - 1
            }
        };

        let font = &mut self.fonts[index];
        font.frequency += 1;
        font.contexts.insert(context);
        if !font.elements.iter().any(|e| e == selector) {
            font.elements.push(selector.to_string());
        }
    }

    fn observe_spacing(&mut self, element: &ElementRef<'_>, kind: SpacingKind, selector: &str) {
        for token in element.style(kind.as_str()).split_whitespace() {
            let Some(pixels) = parse_length_with_root(token, self.config.root_font_px) else {
                continue;
            };
            if pixels <= 0.0 || pixels >= self.config.max_spacing_px {
                continue;
            }

            let key = (kind, token.to_string());
            let index = match self.spacing_index.get(&key) {
                Some(index) => *index,
                None => {
                    self.spacing.push(SpacingCandidate {
                        kind,
                        raw_value: token.to_string(),
                        pixels,
                        frequency: 0,
                        elements: Vec::new(),
                        scale_label: format!("{}-{}", kind.prefix(), quantize(pixels)),
                    });
                    self.spacing_index.insert(key, self.spacing.len() - 1);
                    self.spacing.len() - 1
                }
            };

            let candidate = &mut self.spacing[index];
            candidate.frequency += 1;
            if !candidate.elements.iter().any(|e| e == selector) {
                candidate.elements.push(selector.to_string());
            }
        }
    }

    /// Clusters and ranks the tables, applying the configured caps.
    pub fn finish(self) -> Aggregated {
        let raw_colors = self.colors.len();
        let mut colors = cluster(self.colors, self.config.cluster_threshold);
        colors.truncate(self.config.max_colors);

        let mut fonts = self.fonts;
        fonts.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        fonts.truncate(self.config.max_fonts);

        let mut spacing = self.spacing;
        spacing.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        spacing.truncate(self.config.max_spacing);

        debug!(
            raw_colors,
            colors = colors.len(),
            fonts = fonts.len(),
            spacing = spacing.len(),
            "aggregation finished"
        );
        Aggregated {
            colors,
            fonts,
            spacing,
        }
    }
}

fn font_category(element: &ElementRef<'_>) -> FontCategory {
    if HEADING_FONT.matches(element) {
        FontCategory::Heading
    } else if BODY_FONT.matches(element) {
        FontCategory::Body
    } else {
        FontCategory::Accent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DocumentSnapshot, ElementData};

    fn visible(tag: &str, parent: usize) -> ElementData {
        ElementData::new(tag).with_parent(parent).with_rect(100.0, 20.0)
    }

    fn aggregate(elements: Vec<ElementData>) -> Aggregated {
        let config = ExtractionConfig::default();
        let doc = Document::new(DocumentSnapshot {
            elements,
            ..Default::default()
        })
        .unwrap();
        let mut aggregation = Aggregation::new(&config);
        for el in doc.elements() {
            aggregation.observe(&el);
        }
        aggregation.finish()
    }

    // =========================================================================
    // Colors
    // =========================================================================

    #[test]
    fn test_colors_counted_by_value() {
        let result = aggregate(vec![
            ElementData::new("html"),
            visible("p", 0).with_style("color", "rgb(51, 102, 255)"),
            visible("p", 0).with_style("color", "#3366ff"),
            visible("h1", 0).with_style("background-color", "rgb(200, 30, 30)"),
        ]);
        assert_eq!(result.colors.len(), 2);
        assert_eq!(result.colors[0].value, "#3366ff");
        assert_eq!(result.colors[0].frequency, 2);
        assert_eq!(result.colors[0].category, ColorCategory::Text);
        assert_eq!(result.colors[1].category, ColorCategory::Background);
        assert!(result.colors[1].contexts.contains(&Context::Heading));
    }

    #[test]
    fn test_rejected_colors() {
        let result = aggregate(vec![
            ElementData::new("html"),
            visible("p", 0)
                .with_style("color", "rgb(0, 0, 0)")
                .with_style("background-color", "rgba(0, 0, 0, 0)")
                .with_style("border-color", "oklch(0.7 0.1 200)")
                .with_style("border-top-color", "transparent")
                .with_style("border-left-color", "rgb(255, 255, 255)")
                .with_style("box-shadow", "none"),
        ]);
        assert!(result.colors.is_empty());
    }

    #[test]
    fn test_brightness_bounds_are_exclusive() {
        let result = aggregate(vec![
            ElementData::new("html"),
            visible("p", 0).with_style("color", "rgb(250, 250, 250)"),
            visible("p", 0).with_style("color", "rgb(251, 251, 251)"),
            visible("p", 0).with_style("color", "rgb(10, 10, 10)"),
            visible("p", 0).with_style("color", "rgb(9, 9, 9)"),
        ]);
        let mut values: Vec<&str> = result.colors.iter().map(|c| c.value.as_str()).collect();
        values.sort();
        assert_eq!(values, vec!["#0a0a0a", "#fafafa"]);
    }

    #[test]
    fn test_shadow_colors_recorded_independently() {
        let result = aggregate(vec![
            ElementData::new("html"),
            visible("div", 0).with_style(
                "box-shadow",
                "rgba(200, 30, 30, 0.2) 0px 1px 2px 0px, rgb(51, 102, 255) 0px 0px 0px 3px",
            ),
        ]);
        let values: Vec<&str> = result.colors.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values.len(), 2);
        assert!(values.contains(&"#c81e1e"));
        assert!(values.contains(&"#3366ff"));
        assert!(result
            .colors
            .iter()
            .all(|c| c.category == ColorCategory::Accent));
    }

    #[test]
    fn test_near_duplicates_cluster() {
        let result = aggregate(vec![
            ElementData::new("html"),
            visible("p", 0).with_style("color", "rgb(51, 102, 255)"),
            visible("p", 0).with_style("color", "rgb(51, 102, 255)"),
            visible("p", 0).with_style("color", "rgb(55, 100, 250)"),
        ]);
        assert_eq!(result.colors.len(), 1);
        assert_eq!(result.colors[0].value, "#3366ff");
        assert_eq!(result.colors[0].frequency, 3);
    }

    // =========================================================================
    // Fonts
    // =========================================================================

    #[test]
    fn test_fonts_keyed_by_family_weight_size() {
        let font = |tag: &str, weight: &str| {
            visible(tag, 0)
                .with_style("font-family", "\"Inter\", system-ui, sans-serif")
                .with_style("font-weight", weight)
                .with_style("font-size", "16px")
                .with_style("line-height", "24px")
        };
        let result = aggregate(vec![
            ElementData::new("html"),
            font("p", "400"),
            font("p", "400"),
            font("h2", "700"),
        ]);
        assert_eq!(result.fonts.len(), 2);
        let body = &result.fonts[0];
        assert_eq!(body.family, "Inter");
        assert_eq!(body.stack, vec!["Inter", "system-ui", "sans-serif"]);
        assert_eq!(body.frequency, 2);
        assert_eq!(body.category, FontCategory::Body);
        assert_eq!(body.line_height, "24px");
        assert_eq!(result.fonts[1].category, FontCategory::Heading);
    }

    #[test]
    fn test_empty_family_is_skipped() {
        let result = aggregate(vec![
            ElementData::new("html"),
            visible("p", 0).with_style("font-family", " , "),
        ]);
        assert!(result.fonts.is_empty());
    }

    // =========================================================================
    // Spacing
    // =========================================================================

    #[test]
    fn test_spacing_tokens_split_and_bounded() {
        let result = aggregate(vec![
            ElementData::new("html"),
            visible("div", 0)
                .with_style("padding", "16px 24px")
                .with_style("margin", "0px auto 250px 1rem"),
            visible("div", 0).with_style("padding", "16px"),
        ]);
        let labels: Vec<(&str, u32, &str)> = result
            .spacing
            .iter()
            .map(|s| (s.raw_value.as_str(), s.frequency, s.scale_label.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![("16px", 2, "p-4"), ("1rem", 1, "m-4"), ("24px", 1, "p-6")]
        );
        assert!(result
            .spacing
            .iter()
            .all(|s| s.pixels > 0.0 && s.pixels < 200.0));
    }
}
