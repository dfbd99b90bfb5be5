use thiserror::Error;

/// A message could not make the trip to a page context and back.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The page context thread has stopped.
    #[error("page context is no longer running")]
    Disconnected,

    /// No open page has this id.
    #[error("no page with id {0}")]
    UnknownPage(usize),

    /// A message did not encode or decode.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Why an extraction request produced no theme.
#[derive(Debug, Error)]
pub enum Failure {
    #[error("no active page to extract a theme from")]
    NoActivePage,

    #[error("cannot extract a theme from {url}: browser-internal and extension store pages are restricted")]
    RestrictedPage { url: String },

    #[error("could not reach the page: {0}")]
    Transport(#[from] TransportError),

    #[error("theme extraction failed: {0}")]
    Extraction(String),
}
