//! The two messages exchanged across the boundary.

use serde::{Deserialize, Serialize};
use themesnatch_extract::ThemeSnapshot;

/// A request sent from the controller into a page context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtractRequest {
    /// Extract the theme of the page the context is attached to.
    ExtractTheme,
}

/// The single answer to an [`ExtractRequest`].
///
/// Serialized as `{ "success": true, "theme": {...} }` or
/// `{ "success": false, "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractResponse {
    pub fn ok(theme: ThemeSnapshot) -> Self {
        ExtractResponse {
            success: true,
            theme: Some(theme),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        ExtractResponse {
            success: false,
            theme: None,
            error: Some(error.into()),
        }
    }

    /// The theme, or the failure message.
    ///
    /// A success without a theme is reported as a failure.
    pub fn into_result(self) -> Result<ThemeSnapshot, String> {
        match (self.success, self.theme) {
            (true, Some(theme)) => Ok(theme),
            (true, None) => Err("response carried no theme".to_string()),
            (false, _) => Err(self
                .error
                .unwrap_or_else(|| "extraction failed without a message".to_string())),
        }
    }
}
