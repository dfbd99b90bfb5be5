//! Page context and controller.
//!
//! Extraction runs inside a [`PageContext`], which owns the document and
//! lives on its own thread. The [`Controller`] never touches the document:
//! it finds the active page through a [`PageHost`], refuses pages that may
//! not be inspected, and exchanges exactly one serialized
//! [`ExtractRequest`] / [`ExtractResponse`] pair with the context.
//!
//! ```rust
//! use themesnatch::boundary::{Controller, SnapshotHost};
//! use themesnatch::{Document, ExtractionConfig};
//!
//! let doc = Document::from_json(r#"{
//!     "url": "https://example.com/",
//!     "elements": [{ "tag": "html" }],
//!     "stylesheets": [{ "text": ":root { --brand-primary: #3366ff; }" }]
//! }"#).unwrap();
//!
//! let mut host = SnapshotHost::new();
//! host.open(doc, ExtractionConfig::default());
//!
//! let response = Controller::new(host).respond();
//! assert!(response.success);
//! ```

mod controller;
mod error;
mod host;
mod message;
mod page;

pub use controller::{is_restricted, Controller};
pub use error::{Failure, TransportError};
pub use host::{PageHost, PageInfo, SnapshotHost};
pub use message::{ExtractRequest, ExtractResponse};
pub use page::PageContext;
