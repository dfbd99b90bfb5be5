//! The extracted theme and its candidate types.
//!
//! Everything here serializes with camelCase field names, which is the shape
//! the boundary messages and the `--json` output carry.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use themesnatch_css::{Clusterable, Rgb, SpacingKind};

use crate::context::{Context, ContextGroup};

// ─── Colors ─────────────────────────────────────────────────────────────────

/// Which property family a color was first observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCategory {
    Background,
    Text,
    Border,
    Accent,
}

impl ColorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorCategory::Background => "background",
            ColorCategory::Text => "text",
            ColorCategory::Border => "border",
            ColorCategory::Accent => "accent",
        }
    }
}

/// Semantic label for a palette color. At most one color holds each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorRole {
    Primary,
    Secondary,
    Accent,
    Background,
    Surface,
    Text,
    TextSecondary,
    Button,
    Border,
}

impl ColorRole {
    pub const ALL: [ColorRole; 9] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Accent,
        ColorRole::Background,
        ColorRole::Surface,
        ColorRole::Text,
        ColorRole::TextSecondary,
        ColorRole::Button,
        ColorRole::Border,
    ];

    /// The serialized (camelCase) name.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Accent => "accent",
            ColorRole::Background => "background",
            ColorRole::Surface => "surface",
            ColorRole::Text => "text",
            ColorRole::TextSecondary => "textSecondary",
            ColorRole::Button => "button",
            ColorRole::Border => "border",
        }
    }

    /// Kebab-case name used for exported tokens.
    pub fn token_name(self) -> &'static str {
        match self {
            ColorRole::TextSecondary => "text-secondary",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A frequency-weighted palette color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorCandidate {
    /// Lowercase `#rrggbb`.
    pub value: String,
    pub rgb: Rgb,
    pub frequency: u32,
    #[serde(default)]
    pub contexts: BTreeSet<Context>,
    pub category: ColorCategory,
    /// Minimal selectors of the contributing elements, first-seen order.
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ColorRole>,
    /// Custom property the color was declared in, without the leading `--`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_variable_name: Option<String>,
    /// Document indices of the contributing elements.
    #[serde(skip)]
    pub sources: Vec<usize>,
}

impl ColorCandidate {
    pub fn new(rgb: Rgb, category: ColorCategory) -> Self {
        ColorCandidate {
            value: rgb.to_hex(),
            rgb,
            frequency: 0,
            contexts: BTreeSet::new(),
            category,
            elements: Vec::new(),
            role: None,
            source_variable_name: None,
            sources: Vec::new(),
        }
    }

    /// A color declared by a custom property, carrying `weight` as its frequency.
    pub fn from_variable(name: &str, rgb: Rgb, category: ColorCategory, weight: u32) -> Self {
        let mut candidate = ColorCandidate::new(rgb, category);
        candidate.frequency = weight.max(1);
        candidate.source_variable_name = Some(name.trim_start_matches('-').to_string());
        candidate.elements.push(":root".to_string());
        candidate
    }

    pub fn is_variable(&self) -> bool {
        self.source_variable_name.is_some()
    }

    /// Counts one observation from `element`.
    pub fn observe(&mut self, selector: &str, source: usize, context: Context) {
        self.frequency += 1;
        self.contexts.insert(context);
        push_unique(&mut self.elements, selector.to_string());
        push_unique(&mut self.sources, source);
    }

    /// The structural groups spanned by this color's contexts.
    pub fn context_groups(&self) -> BTreeSet<ContextGroup> {
        self.contexts.iter().filter_map(|c| c.group()).collect()
    }

    /// Folds another candidate's provenance into this one, keeping this value.
    pub fn merge_provenance(&mut self, other: &ColorCandidate) {
        self.contexts.extend(other.contexts.iter().copied());
        for element in &other.elements {
            push_unique(&mut self.elements, element.clone());
        }
        for source in &other.sources {
            push_unique(&mut self.sources, *source);
        }
    }
}

impl Clusterable for ColorCandidate {
    fn rgb(&self) -> Rgb {
        self.rgb
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }

    fn absorb(&mut self, other: Self) {
        self.frequency += other.frequency;
        self.merge_provenance(&other);
    }
}

// ─── Fonts ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontCategory {
    Heading,
    Body,
    Accent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontRole {
    Heading,
    Body,
    Mono,
    Accent,
}

impl FontRole {
    pub fn as_str(self) -> &'static str {
        match self {
            FontRole::Heading => "heading",
            FontRole::Body => "body",
            FontRole::Mono => "mono",
            FontRole::Accent => "accent",
        }
    }
}

impl fmt::Display for FontRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (family, weight, size) combination observed on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontCandidate {
    /// First family of the stack, unquoted. Never empty.
    pub family: String,
    /// The full fallback list, unquoted.
    #[serde(default)]
    pub stack: Vec<String>,
    pub weight: String,
    pub size: String,
    #[serde(default)]
    pub line_height: String,
    pub frequency: u32,
    #[serde(default)]
    pub contexts: BTreeSet<Context>,
    pub category: FontCategory,
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<FontRole>,
}

impl FontCandidate {
    /// True for monospace-looking families (`mono`, `courier`, `code`).
    pub fn is_mono(&self) -> bool {
        let family = self.family.to_ascii_lowercase();
        ["mono", "courier", "code"]
            .iter()
            .any(|keyword| family.contains(keyword))
    }
}

// ─── Spacing ────────────────────────────────────────────────────────────────

/// One recurring margin or padding length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingCandidate {
    pub kind: SpacingKind,
    /// A single length token as it appeared in the computed style.
    pub raw_value: String,
    /// Parsed size, always in the open interval (0, 200).
    pub pixels: f64,
    pub frequency: u32,
    #[serde(default)]
    pub elements: Vec<String>,
    pub scale_label: String,
}

// ─── Components ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Button,
    Card,
    Form,
    Nav,
    Hero,
    Container,
}

impl ComponentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Button => "button",
            ComponentKind::Card => "card",
            ComponentKind::Form => "form",
            ComponentKind::Nav => "nav",
            ComponentKind::Hero => "hero",
            ComponentKind::Container => "container",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual signature of a component. Default values are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSignature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPattern {
    pub kind: ComponentKind,
    /// Minimal selector of the first matching element.
    pub selector: String,
    pub styles: StyleSignature,
    pub frequency: u32,
}

// ─── Snapshot ───────────────────────────────────────────────────────────────

/// The result of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSnapshot {
    #[serde(default)]
    pub colors: Vec<ColorCandidate>,
    #[serde(default)]
    pub fonts: Vec<FontCandidate>,
    #[serde(default)]
    pub spacing: Vec<SpacingCandidate>,
    #[serde(default)]
    pub components: Vec<ComponentPattern>,
    /// Capture time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dark_mode: Option<bool>,
}

impl ThemeSnapshot {
    pub fn color_with_role(&self, role: ColorRole) -> Option<&ColorCandidate> {
        self.colors.iter().find(|c| c.role == Some(role))
    }

    pub fn font_with_role(&self, role: FontRole) -> Option<&FontCandidate> {
        self.fonts.iter().find(|f| f.role == Some(role))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}
