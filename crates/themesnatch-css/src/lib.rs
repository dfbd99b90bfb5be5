//! # themesnatch-css - CSS values for theme inference
//!
//! Low-level building blocks shared by the extractor and the exporters:
//!
//! - [`color`]: color parsing, brightness, distance, clustering, tonal scales
//! - [`spacing`]: length parsing and spacing-scale quantization
//! - [`selector`]: a small selector engine over any [`SelectorElement`] tree
//! - [`custom_props`]: global `--custom-property` discovery and `var()` resolution
//!
//! Everything here is pure and synchronous. Parsing is built on `cssparser`.
//!
//! ```rust
//! use themesnatch_css::{parse_color, quantize, parse_length};
//!
//! assert_eq!(parse_color("#36f").unwrap().to_hex(), "#3366ff");
//! assert_eq!(quantize(parse_length("1rem").unwrap()), "4");
//! ```

pub mod color;
pub mod custom_props;
mod error;
pub mod selector;
pub mod spacing;

pub use color::{
    cluster, hue_family, is_transparent, normalize_hex, parse_color, parse_color_alpha,
    shadow_colors, tonal_scale, Clusterable, ParsedColor, Rgb, TonalScale,
    DEFAULT_CLUSTER_THRESHOLD, TONAL_STEPS,
};
pub use custom_props::{
    global_custom_properties, parse_var_reference, resolve_custom_properties, CustomProperty,
    VarReference, MAX_VAR_DEPTH,
};
pub use error::{ColorError, SelectorError};
pub use selector::{SelectorElement, SelectorList};
pub use spacing::{
    parse_length, parse_length_with_root, quantize, scale_label, spacing_scale_summary,
    SpacingKind, DEFAULT_ROOT_FONT_PX,
};
