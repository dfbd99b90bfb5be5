//! Color value parsing and palette arithmetic.
//!
//! Supported input formats:
//!
//! - Hex: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` (alpha is read but not kept)
//! - Functional: `rgb(255, 107, 53)`, `rgba(255, 107, 53, 0.5)`,
//!   `rgb(255 107 53 / 50%)`, percentage channels
//! - The CSS basic named colors (`red`, `navy`, `teal`, ...)
//!
//! Modern formats (`oklch()`, `hsl()`, `lab()`, `lch()`, `color()`), `var()`
//! references, `currentColor` and `transparent` are reported as
//! [`ColorError::Unsupported`]. Callers drop those values instead of guessing.
//!
//! Distances are plain Euclidean distances in RGB space. This is not a
//! perceptual metric; it is cheap and deterministic, which is all the
//! clustering heuristics need.
//!
//! # Example
//!
//! ```rust
//! use themesnatch_css::color::{parse_color, tonal_scale, Rgb};
//!
//! let brand = parse_color("rgb(51, 102, 255)").unwrap();
//! assert_eq!(brand.to_hex(), "#3366ff");
//!
//! let scale = tonal_scale(brand);
//! assert_eq!(scale.get(500), Some(brand));
//! assert_eq!(scale.get(900), Some(Rgb::new(10, 20, 51)));
//! ```

use std::fmt;

use cssparser::{ParseError, Parser, ParserInput, Token};
use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// Default merge distance for [`cluster`].
pub const DEFAULT_CLUSTER_THRESHOLD: f64 = 30.0;

/// Shade labels of a [`TonalScale`], lightest first.
pub const TONAL_STEPS: [u16; 10] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900];

// ─── Rgb ────────────────────────────────────────────────────────────────────

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parses a hex color with or without the leading `#`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        parse_hex(hex.trim().trim_start_matches('#')).map(|c| c.rgb)
    }

    /// Formats as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Weighted brightness on a 0–255 scale (`(299r + 587g + 114b) / 1000`).
    pub fn brightness(self) -> f64 {
        (self.r as f64 * 299.0 + self.g as f64 * 587.0 + self.b as f64 * 114.0) / 1000.0
    }

    pub fn is_light(self) -> bool {
        self.brightness() > 128.0
    }

    /// Euclidean distance in raw RGB space.
    pub fn distance(self, other: Rgb) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Moves each channel `amount` (0.0–1.0) of the way toward `target`.
    pub fn mix(self, target: Rgb, amount: f64) -> Rgb {
        let amount = amount.clamp(0.0, 1.0);
        let lerp = |from: u8, to: u8| {
            let from = from as f64;
            (from + (to as f64 - from) * amount).round() as u8
        };
        Rgb::new(
            lerp(self.r, target.r),
            lerp(self.g, target.g),
            lerp(self.b, target.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A parsed color together with its alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedColor {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl ParsedColor {
    fn opaque(rgb: Rgb) -> Self {
        ParsedColor { rgb, alpha: 1.0 }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }
}

// ─── Parsing ────────────────────────────────────────────────────────────────

/// Parses a CSS color string, dropping alpha.
pub fn parse_color(input: &str) -> Result<Rgb, ColorError> {
    parse_color_alpha(input).map(|c| c.rgb)
}

/// Parses a CSS color string, keeping alpha.
pub fn parse_color_alpha(input: &str) -> Result<ParsedColor, ColorError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ColorError::Malformed(input.to_string()));
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = value.to_ascii_lowercase();
    if lower.starts_with("rgb(") || lower.starts_with("rgba(") {
        let mut parser_input = ParserInput::new(value);
        let mut parser = Parser::new(&mut parser_input);
        return parser
            .parse_entirely(|p| parse_rgb_function(p))
            .map_err(|_| ColorError::Malformed(value.to_string()));
    }

    named_color(&lower)
        .map(ParsedColor::opaque)
        .ok_or_else(|| ColorError::Unsupported(value.to_string()))
}

/// Normalizes any supported color to lowercase `#rrggbb`.
pub fn normalize_hex(input: &str) -> Result<String, ColorError> {
    parse_color(input).map(Rgb::to_hex)
}

/// True for `transparent` and for any color whose alpha is zero.
pub fn is_transparent(value: &str) -> bool {
    let value = value.trim();
    if value.eq_ignore_ascii_case("transparent") {
        return true;
    }
    matches!(parse_color_alpha(value), Ok(c) if c.is_transparent())
}

/// Extracts every color embedded in a shadow list.
///
/// `box-shadow` and `text-shadow` values can carry several comma-separated
/// layers, each with its own color. Unparseable layers are skipped.
pub fn shadow_colors(value: &str) -> Vec<ParsedColor> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let mut colors = Vec::new();

    loop {
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Function(ref name)
                if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") =>
            {
                if let Ok(color) = parser.parse_nested_block(|p| parse_rgb_arguments(p)) {
                    colors.push(color);
                }
            }
            Token::Hash(ref digits) | Token::IDHash(ref digits) => {
                if let Ok(color) = parse_hex(digits) {
                    colors.push(color);
                }
            }
            Token::Ident(ref name) => {
                if let Some(rgb) = named_color(&name.to_ascii_lowercase()) {
                    colors.push(ParsedColor::opaque(rgb));
                }
            }
            _ => {}
        }
    }

    colors
}

/// Parses hex digits (without `#`).
fn parse_hex(hex: &str) -> Result<ParsedColor, ColorError> {
    let malformed = || ColorError::Malformed(format!("#{}", hex));
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    let short = |i: usize| -> Result<u8, ColorError> {
        u8::from_str_radix(&hex[i..i + 1], 16)
            .map(|v| v * 17)
            .map_err(|_| malformed())
    };
    let long = |i: usize| -> Result<u8, ColorError> {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| malformed())
    };

    match hex.len() {
        3 | 4 => {
            let rgb = Rgb::new(short(0)?, short(1)?, short(2)?);
            let alpha = if hex.len() == 4 {
                short(3)? as f32 / 255.0
            } else {
                1.0
            };
            Ok(ParsedColor { rgb, alpha })
        }
        6 | 8 => {
            let rgb = Rgb::new(long(0)?, long(2)?, long(4)?);
            let alpha = if hex.len() == 8 {
                long(6)? as f32 / 255.0
            } else {
                1.0
            };
            Ok(ParsedColor { rgb, alpha })
        }
        _ => Err(malformed()),
    }
}

fn parse_rgb_function<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<ParsedColor, ParseError<'i, ()>> {
    let name = input.expect_function()?;
    let is_rgb = name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba");
    if !is_rgb {
        return Err(input.new_custom_error(()));
    }
    input.parse_nested_block(|p| parse_rgb_arguments(p))
}

/// Parses the inside of `rgb(...)`, comma or space separated.
fn parse_rgb_arguments<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<ParsedColor, ParseError<'i, ()>> {
    let mut channels = [0u8; 3];
    for (i, channel) in channels.iter_mut().enumerate() {
        if i > 0 {
            let _ = input.try_parse(|p| p.expect_comma());
        }
        *channel = parse_channel(input)?;
    }

    let alpha = if input.is_exhausted() {
        1.0
    } else {
        match input.next()?.clone() {
            Token::Comma | Token::Delim('/') => {}
            _ => return Err(input.new_custom_error(())),
        }
        parse_alpha(input)?
    };

    Ok(ParsedColor {
        rgb: Rgb::new(channels[0], channels[1], channels[2]),
        alpha,
    })
}

fn parse_channel<'i, 't>(input: &mut Parser<'i, 't>) -> Result<u8, ParseError<'i, ()>> {
    match input.next()?.clone() {
        Token::Number { value, .. } => Ok(clamp_channel(value)),
        Token::Percentage { unit_value, .. } => Ok(clamp_channel(unit_value * 255.0)),
        _ => Err(input.new_custom_error(())),
    }
}

fn parse_alpha<'i, 't>(input: &mut Parser<'i, 't>) -> Result<f32, ParseError<'i, ()>> {
    match input.next()?.clone() {
        Token::Number { value, .. } => Ok(value.clamp(0.0, 1.0)),
        Token::Percentage { unit_value, .. } => Ok(unit_value.clamp(0.0, 1.0)),
        _ => Err(input.new_custom_error(())),
    }
}

fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// CSS basic color keywords plus a few common extended names.
fn named_color(name: &str) -> Option<Rgb> {
    let rgb = match name {
        "black" => Rgb::new(0, 0, 0),
        "silver" => Rgb::new(192, 192, 192),
        "gray" | "grey" => Rgb::new(128, 128, 128),
        "white" => Rgb::new(255, 255, 255),
        "maroon" => Rgb::new(128, 0, 0),
        "red" => Rgb::new(255, 0, 0),
        "purple" => Rgb::new(128, 0, 128),
        "fuchsia" | "magenta" => Rgb::new(255, 0, 255),
        "green" => Rgb::new(0, 128, 0),
        "lime" => Rgb::new(0, 255, 0),
        "olive" => Rgb::new(128, 128, 0),
        "yellow" => Rgb::new(255, 255, 0),
        "navy" => Rgb::new(0, 0, 128),
        "blue" => Rgb::new(0, 0, 255),
        "teal" => Rgb::new(0, 128, 128),
        "aqua" | "cyan" => Rgb::new(0, 255, 255),
        "orange" => Rgb::new(255, 165, 0),
        _ => return None,
    };
    Some(rgb)
}

// ─── Clustering ─────────────────────────────────────────────────────────────

/// A frequency-weighted value that can be merged into a color cluster.
pub trait Clusterable {
    fn rgb(&self) -> Rgb;
    fn frequency(&self) -> u32;
    /// Folds `other` into `self`; `self` stays the representative.
    fn absorb(&mut self, other: Self);
}

/// Merges near-duplicate colors.
///
/// Items are visited in frequency-descending order (stable for ties). An
/// item within `threshold` of an existing cluster's representative joins
/// that cluster; otherwise it starts a new one. The output is sorted by
/// merged frequency, descending. Total frequency is conserved.
pub fn cluster<T: Clusterable>(mut items: Vec<T>, threshold: f64) -> Vec<T> {
    items.sort_by(|a, b| b.frequency().cmp(&a.frequency()));

    let mut groups: Vec<T> = Vec::new();
    for item in items {
        let rgb = item.rgb();
        match groups
            .iter_mut()
            .find(|group| group.rgb().distance(rgb) < threshold)
        {
            Some(group) => group.absorb(item),
            None => groups.push(item),
        }
    }

    groups.sort_by(|a, b| b.frequency().cmp(&a.frequency()));
    groups
}

// ─── Tonal scale ────────────────────────────────────────────────────────────

/// Ten shades derived from one base color, keyed 50–900.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TonalScale {
    shades: [(u16, Rgb); 10],
}

impl TonalScale {
    pub fn get(&self, step: u16) -> Option<Rgb> {
        self.shades
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, rgb)| *rgb)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, Rgb)> + '_ {
        self.shades.iter().copied()
    }
}

/// Builds the 50–900 ladder for `base`.
///
/// The factor for each step is `(step - 500) / 500`: steps above 500 scale
/// the channels toward black, steps below mix toward white, 500 is `base`.
pub fn tonal_scale(base: Rgb) -> TonalScale {
    let mut shades = [(0u16, base); 10];
    for (slot, step) in shades.iter_mut().zip(TONAL_STEPS) {
        let factor = (step as f64 - 500.0) / 500.0;
        let shade = if factor > 0.0 {
            base.mix(Rgb::BLACK, factor)
        } else {
            base.mix(Rgb::WHITE, factor.abs())
        };
        *slot = (step, shade);
    }
    TonalScale { shades }
}

// ─── Naming ─────────────────────────────────────────────────────────────────

/// Coarse hue family used to name colors that have no semantic role.
pub fn hue_family(rgb: Rgb) -> &'static str {
    let (r, g, b) = (rgb.r as i16, rgb.g as i16, rgb.b as i16);
    let spread = r.max(g).max(b) - r.min(g).min(b);

    if spread < 30 {
        "gray"
    } else if r > 200 && g > 100 && g < 180 && b < 100 {
        "orange"
    } else if r > 150 && g > 150 && b < 100 {
        "yellow"
    } else if r > 100 && b > 100 && g < 100 {
        "purple"
    } else if g > 100 && b > 100 && r < 100 && (g - b).abs() < 60 {
        "cyan"
    } else if r >= g && r >= b {
        "red"
    } else if g >= r && g >= b {
        "green"
    } else {
        "blue"
    }
}
