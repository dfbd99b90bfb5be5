//! Error types for the extract crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a document snapshot.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The snapshot file could not be read.
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON or does not match the snapshot shape.
    #[error("invalid document snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// An element names a parent that does not precede it.
    #[error("element {index} has parent {parent}, which does not precede it")]
    ParentOutOfOrder { index: usize, parent: usize },

    /// Only the first element may be parentless.
    #[error("element {index} has no parent; only the first element may be the root")]
    MultipleRoots { index: usize },
}

/// Errors raised while loading or validating an [`ExtractionConfig`](crate::ExtractionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML did not parse into a config.
    #[error("invalid config{}: {message}", path_suffix(.path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    /// A value is outside its meaningful range.
    #[error("config field `{field}` {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

/// Top-level error for an extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_without_path() {
        let err = ConfigError::Parse {
            path: None,
            message: "bad indent".into(),
        };
        assert_eq!(err.to_string(), "invalid config: bad indent");
    }

    #[test]
    fn test_parse_error_with_path() {
        let err = ConfigError::Parse {
            path: Some(PathBuf::from("theme.yaml")),
            message: "bad indent".into(),
        };
        assert_eq!(err.to_string(), "invalid config theme.yaml: bad indent");
    }

    #[test]
    fn test_document_error_passes_through() {
        let err: ExtractError = DocumentError::MultipleRoots { index: 3 }.into();
        assert!(err.to_string().contains("element 3"));
    }
}
