//! Length parsing and spacing-scale quantization.
//!
//! Computed margins and paddings arrive as CSS lengths (`16px`, `1.5rem`).
//! They are converted to pixels and snapped to the nearest step of a
//! utility-class spacing scale, which yields labels like `p-4` or `m-2.5`.

use std::collections::HashSet;

use cssparser::{Parser, ParserInput, Token};
use serde::{Deserialize, Serialize};

/// Pixel size of `1rem` / `1em` when no better information is available.
pub const DEFAULT_ROOT_FONT_PX: f64 = 16.0;

/// Pixel value → scale step, ascending.
const SPACING_SCALE: [(f64, &str); 35] = [
    (0.0, "0"),
    (1.0, "0.5"),
    (2.0, "0.5"),
    (4.0, "1"),
    (6.0, "1.5"),
    (8.0, "2"),
    (10.0, "2.5"),
    (12.0, "3"),
    (14.0, "3.5"),
    (16.0, "4"),
    (20.0, "5"),
    (24.0, "6"),
    (28.0, "7"),
    (32.0, "8"),
    (36.0, "9"),
    (40.0, "10"),
    (44.0, "11"),
    (48.0, "12"),
    (56.0, "14"),
    (64.0, "16"),
    (80.0, "20"),
    (96.0, "24"),
    (112.0, "28"),
    (128.0, "32"),
    (144.0, "36"),
    (160.0, "40"),
    (176.0, "44"),
    (192.0, "48"),
    (208.0, "52"),
    (224.0, "56"),
    (240.0, "60"),
    (256.0, "64"),
    (288.0, "72"),
    (320.0, "80"),
    (384.0, "96"),
];

/// Which box property a spacing value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingKind {
    Margin,
    Padding,
}

impl SpacingKind {
    /// Utility-class prefix (`m` / `p`).
    pub fn prefix(self) -> &'static str {
        match self {
            SpacingKind::Margin => "m",
            SpacingKind::Padding => "p",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpacingKind::Margin => "margin",
            SpacingKind::Padding => "padding",
        }
    }
}

/// Parses a single length token to pixels, assuming a 16px root font.
///
/// Accepts `px`, `rem`, `em` and a unitless `0`. Anything else, including
/// `auto`, percentages and shorthand groups, yields `None`.
pub fn parse_length(value: &str) -> Option<f64> {
    parse_length_with_root(value, DEFAULT_ROOT_FONT_PX)
}

/// Like [`parse_length`], with an explicit root font size.
pub fn parse_length_with_root(value: &str, root_font_px: f64) -> Option<f64> {
    let mut input = ParserInput::new(value.trim());
    let mut parser = Parser::new(&mut input);
    let token = parser.next().ok()?.clone();
    if !parser.is_exhausted() {
        return None;
    }

    match token {
        Token::Dimension { value, unit, .. } => {
            let value = value as f64;
            if unit.eq_ignore_ascii_case("px") {
                Some(value)
            } else if unit.eq_ignore_ascii_case("rem") || unit.eq_ignore_ascii_case("em") {
                Some(value * root_font_px)
            } else {
                None
            }
        }
        Token::Number { value, .. } if value == 0.0 => Some(0.0),
        _ => None,
    }
}

/// Snaps a pixel value to the nearest spacing-scale step.
///
/// Ties resolve to the smaller step.
pub fn quantize(pixels: f64) -> &'static str {
    let mut best = SPACING_SCALE[0];
    let mut best_diff = (pixels - best.0).abs();
    for step in SPACING_SCALE.iter().skip(1) {
        let diff = (pixels - step.0).abs();
        if diff < best_diff {
            best = *step;
            best_diff = diff;
        }
    }
    best.1
}

/// Builds the class-like label for a raw length (`p-4`, `m-0.5`).
///
/// Unparseable values quantize from zero.
pub fn scale_label(kind: SpacingKind, value: &str) -> String {
    let pixels = parse_length(value).unwrap_or(0.0);
    format!("{}-{}", kind.prefix(), quantize(pixels))
}

/// Summarizes recurring spacing as unique padding-scale labels.
///
/// Keeps values seen at least twice, the eight most frequent, in order.
pub fn spacing_scale_summary<'a, I>(spacings: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, u32)>,
{
    let mut frequent: Vec<(&str, u32)> = spacings
        .into_iter()
        .filter(|(_, frequency)| *frequency >= 2)
        .collect();
    frequent.sort_by(|a, b| b.1.cmp(&a.1));

    let mut seen = HashSet::new();
    frequent
        .into_iter()
        .take(8)
        .map(|(value, _)| scale_label(SpacingKind::Padding, value))
        .filter(|label| seen.insert(label.clone()))
        .collect()
}
