use thiserror::Error;

/// Errors raised while rendering an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The format name matches none of the known formats or aliases.
    #[error("unknown export format `{0}` (expected configObject, variableSheet or customProperties)")]
    UnknownFormat(String),

    /// An embedded sheet template failed to compile or render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The config object could not be serialized.
    #[error("failed to serialize config object: {0}")]
    Json(#[from] serde_json::Error),
}
