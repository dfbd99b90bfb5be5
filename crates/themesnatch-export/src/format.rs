//! Export formats and their options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// The text forms a theme can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportFormat {
    /// A JavaScript module exporting a utility-framework `theme.extend` object.
    ConfigObject,
    /// `$name: value;` declarations.
    VariableSheet,
    /// `--name: value;` declarations inside `:root`.
    CustomProperties,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::ConfigObject,
        ExportFormat::VariableSheet,
        ExportFormat::CustomProperties,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::ConfigObject => "configObject",
            ExportFormat::VariableSheet => "variableSheet",
            ExportFormat::CustomProperties => "customProperties",
        }
    }

    /// Conventional file extension of the rendered text.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::ConfigObject => "js",
            ExportFormat::VariableSheet => "scss",
            ExportFormat::CustomProperties => "css",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    /// Accepts the canonical names, their kebab-case spelling and the common
    /// tool names (`tailwind`, `scss`, `css`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "configobject" | "config" | "tailwind" | "js" => Ok(ExportFormat::ConfigObject),
            "variablesheet" | "variables" | "scss" | "sass" => Ok(ExportFormat::VariableSheet),
            "customproperties" | "css" | "cssvariables" | "properties" => {
                Ok(ExportFormat::CustomProperties)
            }
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Rendering switches shared by every format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// Expand each color into its 50–900 tonal scale.
    pub tonal_scale: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions { tonal_scale: true }
    }
}
