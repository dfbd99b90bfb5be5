use themesnatch_extract::{Document, ExtractionConfig};

use super::error::TransportError;
use super::page::PageContext;

/// A page the controller can address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub id: usize,
    pub url: String,
}

/// Where pages live, as seen by the controller.
pub trait PageHost {
    /// The page the user is looking at, if any.
    fn active_page(&self) -> Option<PageInfo>;

    /// Delivers one serialized message to `page` and returns its serialized
    /// answer.
    fn round_trip(&self, page: &PageInfo, message: &str) -> Result<String, TransportError>;
}

/// Serves documents loaded from snapshots, one [`PageContext`] per page.
#[derive(Debug, Default)]
pub struct SnapshotHost {
    pages: Vec<Option<PageContext>>,
    active: Option<usize>,
}

impl SnapshotHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `document` in a new page context and makes it active.
    pub fn open(&mut self, document: Document, config: ExtractionConfig) -> usize {
        let id = self.pages.len();
        self.pages.push(Some(PageContext::spawn(document, config)));
        self.active = Some(id);
        id
    }

    /// Makes `id` the active page. Returns false if no such page is open.
    pub fn activate(&mut self, id: usize) -> bool {
        let open = matches!(self.pages.get(id), Some(Some(_)));
        if open {
            self.active = Some(id);
        }
        open
    }

    /// Closes a page, stopping its context. Closing the active page leaves
    /// no page active.
    pub fn close(&mut self, id: usize) {
        if let Some(slot) = self.pages.get_mut(id) {
            slot.take();
        }
        if self.active == Some(id) {
            self.active = None;
        }
    }
}

impl PageHost for SnapshotHost {
    fn active_page(&self) -> Option<PageInfo> {
        let id = self.active?;
        let page = self.pages.get(id)?.as_ref()?;
        Some(PageInfo {
            id,
            url: page.url().to_string(),
        })
    }

    fn round_trip(&self, page: &PageInfo, message: &str) -> Result<String, TransportError> {
        self.pages
            .get(page.id)
            .and_then(Option::as_ref)
            .ok_or(TransportError::UnknownPage(page.id))?
            .send(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(url: &str) -> Document {
        Document::from_json(&format!(
            r#"{{ "url": "{url}", "elements": [{{ "tag": "html" }}] }}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_open_activates() {
        let mut host = SnapshotHost::new();
        assert_eq!(host.active_page(), None);

        let first = host.open(document("https://a.example/"), ExtractionConfig::default());
        let second = host.open(document("https://b.example/"), ExtractionConfig::default());
        assert_eq!(host.active_page().unwrap().url, "https://b.example/");

        assert!(host.activate(first));
        assert_eq!(
            host.active_page(),
            Some(PageInfo {
                id: first,
                url: "https://a.example/".into()
            })
        );
        assert!(!host.activate(second + 1));
    }

    #[test]
    fn test_close_active_page() {
        let mut host = SnapshotHost::new();
        let id = host.open(document("https://a.example/"), ExtractionConfig::default());
        host.close(id);
        assert_eq!(host.active_page(), None);
        assert!(!host.activate(id));
    }

    #[test]
    fn test_round_trip_to_closed_page() {
        let mut host = SnapshotHost::new();
        let id = host.open(document("https://a.example/"), ExtractionConfig::default());
        let page = host.active_page().unwrap();
        host.close(id);
        assert!(matches!(
            host.round_trip(&page, "{}"),
            Err(TransportError::UnknownPage(0))
        ));
    }
}
