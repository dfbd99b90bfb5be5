//! # themesnatch - snatch the design theme of a rendered page
//!
//! Give it a snapshot of a rendered page (elements with their computed
//! styles, plus whatever stylesheet text was readable) and it infers the
//! page's theme: a ranked palette with semantic roles, the type system,
//! recurring spacing, and repeated component patterns. The theme exports as
//! a utility-framework config object, a preprocessor variable sheet, or
//! custom properties.
//!
//! The work is split across crates, all re-exported here:
//!
//! - [`css`]: color, length, selector and custom-property parsing.
//! - [`extract`]: the document model and the extraction pipeline.
//! - [`export`](mod@export): token naming and the three output formats.
//! - [`boundary`]: the page-context / controller request protocol.
//!
//! ```rust
//! use themesnatch::{export, extract_theme, Document, ExtractionConfig};
//!
//! let doc = Document::from_json(r#"{
//!     "url": "https://example.com/",
//!     "elements": [{ "tag": "html" }],
//!     "stylesheets": [{ "text": ":root { --brand-primary: #3366ff; }" }]
//! }"#).unwrap();
//!
//! let theme = extract_theme(&doc, ExtractionConfig::default()).unwrap();
//! assert!(export(&theme, "customProperties").contains("--primary: #3366ff;"));
//! ```

pub mod boundary;

pub use themesnatch_css as css;
pub use themesnatch_export as export;
pub use themesnatch_extract as extract;

pub use themesnatch_css::{spacing_scale_summary, Rgb};
pub use themesnatch_export::{export, export_with, ExportError, ExportFormat, ExportOptions};
pub use themesnatch_extract::{
    extract_theme, ColorCandidate, ColorRole, ComponentKind, ComponentPattern, ConfigError,
    Document, DocumentError, DocumentSnapshot, ExtractError, ExtractionConfig, Extractor,
    FontCandidate, FontRole, SpacingCandidate, ThemeSnapshot,
};

pub use boundary::{Controller, ExtractRequest, ExtractResponse, Failure, SnapshotHost};
