//! # themesnatch-export - theme serialization
//!
//! Renders a [`ThemeSnapshot`] as text in one of three formats:
//!
//! | Format | Aliases | Output |
//! |--------|---------|--------|
//! | `configObject` | `tailwind`, `config` | JS module with `theme.extend` |
//! | `variableSheet` | `scss`, `sass` | `$name: value;` |
//! | `customProperties` | `css` | `:root { --name: value; }` |
//!
//! All three render the same [`TokenSet`]: role-named colors (with an
//! optional 50–900 tonal scale), roled fonts, font sizes, spacing, radii and
//! shadows. Rendering never mutates the snapshot.
//!
//! ```rust
//! use themesnatch_export::export;
//! use themesnatch_extract::ThemeSnapshot;
//!
//! let theme = ThemeSnapshot::default();
//! assert!(export(&theme, "css").contains(":root {"));
//! assert_eq!(export(&theme, "yaml"), "");
//! ```

mod config_object;
mod error;
pub mod format;
pub mod names;
mod sheets;
pub mod tokens;

use themesnatch_extract::ThemeSnapshot;
use tracing::{debug, warn};

pub use config_object::render_config_object;
pub use error::ExportError;
pub use format::{ExportFormat, ExportOptions};
pub use names::{name_colors, name_fonts, NamedColor, NamedFont};
pub use sheets::{render_custom_properties, render_variable_sheet};
pub use tokens::{ColorToken, FontToken, Section, Token, TokenSet, FONT_SIZE_SCALE};

/// Renders `theme` in `format` with explicit options.
pub fn export_with(
    theme: &ThemeSnapshot,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<String, ExportError> {
    let tokens = TokenSet::from_theme(theme, options);
    match format {
        ExportFormat::ConfigObject => render_config_object(&tokens),
        ExportFormat::VariableSheet => render_variable_sheet(&tokens, &theme.url),
        ExportFormat::CustomProperties => render_custom_properties(&tokens, &theme.url),
    }
}

/// Renders `theme` by format name with default options.
///
/// Unknown format names, and the unlikely failure of an embedded template,
/// yield an empty string.
pub fn export(theme: &ThemeSnapshot, format: &str) -> String {
    let format = match format.parse::<ExportFormat>() {
        Ok(format) => format,
        Err(err) => {
            debug!(error = %err, "nothing to export");
            return String::new();
        }
    };
    export_with(theme, format, &ExportOptions::default()).unwrap_or_else(|err| {
        warn!(%format, error = %err, "export failed");
        String::new()
    })
}
