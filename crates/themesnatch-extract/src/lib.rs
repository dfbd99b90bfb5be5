//! # themesnatch-extract - theme inference over a rendered document
//!
//! Takes a [`Document`] (a snapshot of elements with computed styles and the
//! readable stylesheet text) and produces a [`ThemeSnapshot`]: a ranked
//! palette with semantic roles, the type system, recurring spacing and the
//! component patterns the page repeats.
//!
//! The run is a straight pipeline:
//!
//! 1. [`Sampler`] picks visible, design-relevant, non-advertising elements
//!    and orders them by design priority.
//! 2. [`Aggregation`] counts every color, font and spacing value they use,
//!    then clusters near-duplicate colors.
//! 3. [`detect_components`] scans for buttons, cards, forms, navs, heroes and
//!    containers independently of sampling.
//! 4. [`ColorFilter`] drops noise; [`detect_dark_mode`] reads the page
//!    background.
//! 5. Custom-property colors are merged in ([`variable_colors`]) and
//!    [`assign_color_roles`] / [`assign_font_roles`] label the result.
//!
//! Every threshold lives in [`ExtractionConfig`].
//!
//! ```rust
//! use themesnatch_extract::{extract_theme, Document, ExtractionConfig};
//!
//! let doc = Document::from_json(r#"{
//!     "url": "https://example.com/",
//!     "elements": [{ "tag": "html" }],
//!     "stylesheets": [{ "text": ":root { --brand-primary: #3366ff; }" }]
//! }"#).unwrap();
//!
//! let theme = extract_theme(&doc, ExtractionConfig::default()).unwrap();
//! assert_eq!(theme.colors[0].value, "#3366ff");
//! ```

pub mod aggregate;
pub mod components;
pub mod config;
pub mod context;
pub mod document;
mod error;
pub mod filter;
pub mod pipeline;
pub mod roles;
pub mod sampler;
pub mod selectors;
pub mod theme;
pub mod variables;

pub use aggregate::{Aggregated, Aggregation};
pub use components::detect_components;
pub use config::ExtractionConfig;
pub use context::{classify, Context, ContextGroup};
pub use document::{Document, DocumentSnapshot, ElementData, ElementRef, Rect, StylesheetData};
pub use error::{ConfigError, DocumentError, ExtractError, Result};
pub use filter::{detect_dark_mode, ColorFilter, Rejection};
pub use pipeline::{extract_theme, Extractor};
pub use roles::{assign_color_roles, assign_font_roles, keyword_role};
pub use sampler::Sampler;
pub use selectors::SelectorSet;
pub use theme::{
    ColorCandidate, ColorCategory, ColorRole, ComponentKind, ComponentPattern, FontCandidate,
    FontCategory, FontRole, SpacingCandidate, StyleSignature, ThemeSnapshot,
};
pub use variables::{collect_custom_properties, merge_variable_colors, variable_colors};
