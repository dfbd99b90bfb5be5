//! The token set shared by every export format.
//!
//! Each format is a different rendering of the same tokens, so a theme
//! exported as a config object and as custom properties always agrees on
//! names and values.

use std::cmp::Ordering;

use serde::Serialize;
use themesnatch_css::{parse_length, tonal_scale, TonalScale};
use themesnatch_extract::ThemeSnapshot;

use crate::format::ExportOptions;
use crate::names::{name_colors, name_fonts};

/// Font-size scale labels, smallest first.
pub const FONT_SIZE_SCALE: [&str; 9] = ["xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl"];

#[derive(Debug, Clone, PartialEq)]
pub struct ColorToken {
    pub name: String,
    pub value: String,
    /// Present when tonal scales are enabled.
    pub scale: Option<TonalScale>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontToken {
    pub name: String,
    pub stack: Vec<String>,
    pub weight: String,
    pub size: String,
}

impl FontToken {
    /// The stack as a CSS `font-family` value.
    pub fn family_value(&self) -> String {
        self.stack
            .iter()
            .map(|family| {
                if family.contains(char::is_whitespace) {
                    format!("\"{}\"", family)
                } else {
                    family.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A flat `name: value` pair as emitted by the sheet formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub name: String,
    pub value: String,
}

impl Token {
    fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Token {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A titled group of flat tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSet {
    pub colors: Vec<ColorToken>,
    pub fonts: Vec<FontToken>,
    /// (scale label, size), ascending.
    pub font_sizes: Vec<(&'static str, String)>,
    /// (`spacing-N`, value), by rank.
    pub spacing: Vec<(String, String)>,
    /// (`radius-N`, value), first-seen order.
    pub radii: Vec<(String, String)>,
    /// (`shadow-N`, value), first-seen order.
    pub shadows: Vec<(String, String)>,
}

impl TokenSet {
    pub fn from_theme(theme: &ThemeSnapshot, options: &ExportOptions) -> Self {
        let colors = name_colors(&theme.colors)
            .into_iter()
            .map(|color| ColorToken {
                scale: options.tonal_scale.then(|| tonal_scale(color.rgb)),
                name: color.name,
                value: color.value,
            })
            .collect();

        let fonts = name_fonts(&theme.fonts)
            .into_iter()
            .map(|named| FontToken {
                name: named.name,
                stack: if named.font.stack.is_empty() {
                    vec![named.font.family.clone()]
                } else {
                    named.font.stack.clone()
                },
                weight: named.font.weight,
                size: named.font.size,
            })
            .collect();

        TokenSet {
            colors,
            fonts,
            font_sizes: font_sizes(theme),
            spacing: numbered("spacing", theme.spacing.iter().map(|s| s.raw_value.as_str())),
            radii: numbered(
                "radius",
                theme
                    .components
                    .iter()
                    .filter_map(|c| c.styles.border_radius.as_deref()),
            ),
            shadows: numbered(
                "shadow",
                theme
                    .components
                    .iter()
                    .filter_map(|c| c.styles.box_shadow.as_deref()),
            ),
        }
    }

    /// The flat form used by the sheet formats, grouped into sections.
    /// Empty sections are left out.
    pub fn sections(&self) -> Vec<Section> {
        let mut colors = Vec::new();
        for color in &self.colors {
            colors.push(Token::new(&color.name, &color.value));
            if let Some(scale) = &color.scale {
                for (step, rgb) in scale.iter() {
                    colors.push(Token::new(format!("{}-{}", color.name, step), rgb.to_hex()));
                }
            }
        }

        let mut typography = Vec::new();
        for font in &self.fonts {
            typography.push(Token::new(format!("font-{}", font.name), font.family_value()));
            if !font.weight.is_empty() {
                typography.push(Token::new(format!("font-{}-weight", font.name), &font.weight));
            }
            if !font.size.is_empty() {
                typography.push(Token::new(format!("font-{}-size", font.name), &font.size));
            }
        }
        for (label, size) in &self.font_sizes {
            typography.push(Token::new(format!("text-{}", label), size));
        }

        let pairs = |items: &[(String, String)]| -> Vec<Token> {
            items.iter().map(|(name, value)| Token::new(name, value)).collect()
        };

        [
            Section { title: "Colors", tokens: colors },
            Section { title: "Typography", tokens: typography },
            Section { title: "Spacing", tokens: pairs(&self.spacing) },
            Section { title: "Radii", tokens: pairs(&self.radii) },
            Section { title: "Shadows", tokens: pairs(&self.shadows) },
        ]
        .into_iter()
        .filter(|section| !section.tokens.is_empty())
        .collect()
    }
}

/// Unique font sizes, ascending, labelled along [`FONT_SIZE_SCALE`].
fn font_sizes(theme: &ThemeSnapshot) -> Vec<(&'static str, String)> {
    let mut sizes: Vec<&str> = Vec::new();
    for font in &theme.fonts {
        let size = font.size.trim();
        if !size.is_empty() && !sizes.contains(&size) {
            sizes.push(size);
        }
    }

    let key = |size: &str| parse_length(size).unwrap_or(f64::INFINITY);
    sizes.sort_by(|a, b| key(*a).partial_cmp(&key(*b)).unwrap_or(Ordering::Equal));

    FONT_SIZE_SCALE
        .iter()
        .zip(sizes)
        .map(|(label, size)| (*label, size.to_string()))
        .collect()
}

/// Unique values numbered from 1 as `prefix-N`.
fn numbered<'a>(prefix: &str, values: impl Iterator<Item = &'a str>) -> Vec<(String, String)> {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen.into_iter()
        .enumerate()
        .map(|(i, value)| (format!("{}-{}", prefix, i + 1), value.to_string()))
        .collect()
}
