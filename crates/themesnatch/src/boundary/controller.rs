//! The controller role: picks the page, checks it may be inspected, and
//! makes the single request/response round trip.

use themesnatch_extract::ThemeSnapshot;
use tracing::{debug, info, warn};

use super::error::{Failure, TransportError};
use super::host::PageHost;
use super::message::{ExtractRequest, ExtractResponse};

/// Browser-internal schemes no page context can attach to.
const RESTRICTED_SCHEMES: &[&str] = &[
    "chrome:",
    "chrome-extension:",
    "chrome-search:",
    "chrome-untrusted:",
    "edge:",
    "brave:",
    "opera:",
    "vivaldi:",
    "about:",
    "view-source:",
    "devtools:",
    "moz-extension:",
    "resource:",
];

/// Extension stores, matched as `host/path` prefixes.
const RESTRICTED_STORES: &[&str] = &[
    "chrome.google.com/webstore",
    "chromewebstore.google.com",
    "microsoftedge.microsoft.com/addons",
    "addons.mozilla.org",
];

/// Whether `url` names a page that must not be inspected.
pub fn is_restricted(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    if RESTRICTED_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        return true;
    }
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => RESTRICTED_STORES.iter().any(|store| rest.starts_with(store)),
        None => false,
    }
}

#[derive(Debug)]
pub struct Controller<H> {
    host: H,
}

impl<H: PageHost> Controller<H> {
    pub fn new(host: H) -> Self {
        Controller { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Extracts the theme of the active page.
    ///
    /// Missing and restricted pages fail before anything is sent.
    pub fn extract_active(&self) -> Result<ThemeSnapshot, Failure> {
        let page = self.host.active_page().ok_or(Failure::NoActivePage)?;
        if is_restricted(&page.url) {
            return Err(Failure::RestrictedPage { url: page.url });
        }

        let message = serde_json::to_string(&ExtractRequest::ExtractTheme)
            .map_err(TransportError::from)?;
        debug!(page = page.id, url = %page.url, "requesting theme");
        let reply = self.host.round_trip(&page, &message)?;
        let response: ExtractResponse =
            serde_json::from_str(&reply).map_err(TransportError::from)?;

        let theme = response.into_result().map_err(Failure::Extraction)?;
        info!(
            url = %page.url,
            colors = theme.colors.len(),
            fonts = theme.fonts.len(),
            "theme received"
        );
        Ok(theme)
    }

    /// [`Controller::extract_active`] in response form.
    pub fn respond(&self) -> ExtractResponse {
        match self.extract_active() {
            Ok(theme) => ExtractResponse::ok(theme),
            Err(failure) => {
                warn!(error = %failure, "extraction request failed");
                ExtractResponse::failed(failure.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::boundary::host::PageInfo;

    /// A host with a canned reply that counts round trips.
    struct FakeHost {
        url: Option<&'static str>,
        reply: Result<String, fn() -> TransportError>,
        trips: Cell<usize>,
    }

    impl FakeHost {
        fn new(url: Option<&'static str>, reply: Result<String, fn() -> TransportError>) -> Self {
            FakeHost {
                url,
                reply,
                trips: Cell::new(0),
            }
        }
    }

    impl PageHost for FakeHost {
        fn active_page(&self) -> Option<PageInfo> {
            self.url.map(|url| PageInfo {
                id: 0,
                url: url.to_string(),
            })
        }

        fn round_trip(&self, _page: &PageInfo, message: &str) -> Result<String, TransportError> {
            assert_eq!(message, r#"{"action":"extractTheme"}"#);
            self.trips.set(self.trips.get() + 1);
            self.reply.clone().map_err(|make| make())
        }
    }

    fn ok_reply() -> Result<String, fn() -> TransportError> {
        Ok(serde_json::to_string(&ExtractResponse::ok(ThemeSnapshot {
            url: "https://example.com/".into(),
            ..Default::default()
        }))
        .unwrap())
    }

    #[test]
    fn test_restricted_urls() {
        for url in [
            "chrome://settings",
            "CHROME://extensions",
            "chrome-extension://abc/popup.html",
            "edge://flags",
            "about:blank",
            "view-source:https://example.com/",
            "https://chrome.google.com/webstore/detail/x",
            "https://chromewebstore.google.com/detail/x",
            "https://addons.mozilla.org/en-US/firefox/",
        ] {
            assert!(is_restricted(url), "{url}");
        }
        for url in [
            "https://example.com/",
            "http://localhost:3000/",
            "https://google.com/chrome/",
            "file:///tmp/page.html",
            "",
        ] {
            assert!(!is_restricted(url), "{url}");
        }
    }

    #[test]
    fn test_success() {
        let controller = Controller::new(FakeHost::new(Some("https://example.com/"), ok_reply()));
        let theme = controller.extract_active().unwrap();
        assert_eq!(theme.url, "https://example.com/");
        assert_eq!(controller.host().trips.get(), 1);
    }

    #[test]
    fn test_no_active_page() {
        let controller = Controller::new(FakeHost::new(None, ok_reply()));
        assert!(matches!(controller.extract_active(), Err(Failure::NoActivePage)));
        assert_eq!(controller.host().trips.get(), 0);
    }

    #[test]
    fn test_restricted_page_never_contacted() {
        let controller = Controller::new(FakeHost::new(Some("chrome://newtab"), ok_reply()));
        match controller.extract_active() {
            Err(Failure::RestrictedPage { url }) => assert_eq!(url, "chrome://newtab"),
            other => panic!("expected restricted page, got {other:?}"),
        }
        assert_eq!(controller.host().trips.get(), 0);
    }

    #[test]
    fn test_transport_failure() {
        let controller = Controller::new(FakeHost::new(
            Some("https://example.com/"),
            Err(|| TransportError::Disconnected),
        ));
        assert!(matches!(
            controller.extract_active(),
            Err(Failure::Transport(TransportError::Disconnected))
        ));
    }

    #[test]
    fn test_garbled_reply() {
        let controller =
            Controller::new(FakeHost::new(Some("https://example.com/"), Ok("not json".into())));
        assert!(matches!(
            controller.extract_active(),
            Err(Failure::Transport(TransportError::Malformed(_)))
        ));
    }

    #[test]
    fn test_failure_response_keeps_message() {
        let reply = serde_json::to_string(&ExtractResponse::failed("index out of bounds")).unwrap();
        let controller = Controller::new(FakeHost::new(Some("https://example.com/"), Ok(reply)));

        let response = controller.respond();
        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("theme extraction failed: index out of bounds")
        );
    }
}
