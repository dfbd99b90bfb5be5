//! The page-context role: owns one document and answers extraction requests
//! on its own thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use themesnatch_extract::{ConfigError, Document, ExtractionConfig, Extractor, ThemeSnapshot};
use tracing::{debug, warn};

use super::error::TransportError;
use super::message::{ExtractRequest, ExtractResponse};

/// A serialized request paired with the channel its answer goes back on.
type Envelope = (String, Sender<String>);

/// A running page context.
///
/// Messages in and out are serialized JSON strings; nothing else crosses the
/// thread boundary. Dropping the context stops its thread.
#[derive(Debug)]
pub struct PageContext {
    url: String,
    inbox: Option<Sender<Envelope>>,
    worker: Option<JoinHandle<()>>,
}

impl PageContext {
    /// Starts a page context for `document`.
    ///
    /// An invalid `config` does not stop the context from starting; every
    /// request is then answered with the configuration error.
    pub fn spawn(document: Document, config: ExtractionConfig) -> Self {
        let url = document.url().to_string();
        let (inbox, requests) = mpsc::channel::<Envelope>();

        let worker = thread::spawn(move || {
            let extractor = Extractor::new(config);
            for (message, reply) in requests {
                let response = answer(&document, &extractor, &message);
                if reply.send(encode(&response)).is_err() {
                    debug!("requester went away before the response");
                }
            }
        });

        PageContext {
            url,
            inbox: Some(inbox),
            worker: Some(worker),
        }
    }

    /// URL of the document this context serves.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one serialized request and waits for its serialized response.
    pub fn send(&self, message: &str) -> Result<String, TransportError> {
        let inbox = self.inbox.as_ref().ok_or(TransportError::Disconnected)?;
        let (reply, response) = mpsc::channel();
        inbox
            .send((message.to_string(), reply))
            .map_err(|_| TransportError::Disconnected)?;
        response.recv().map_err(|_| TransportError::Disconnected)
    }
}

impl Drop for PageContext {
    fn drop(&mut self) {
        self.inbox.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(url = %self.url, "page context thread panicked");
            }
        }
    }
}

fn answer(
    document: &Document,
    extractor: &Result<Extractor, ConfigError>,
    message: &str,
) -> ExtractResponse {
    if let Err(err) = serde_json::from_str::<ExtractRequest>(message) {
        debug!(error = %err, "unrecognized request");
        return ExtractResponse::failed(format!("unrecognized request: {}", err));
    }

    match extractor {
        Ok(extractor) => guarded(|| extractor.extract(document)),
        Err(err) => ExtractResponse::failed(err.to_string()),
    }
}

/// Runs one extraction, turning a panic into a failure response that keeps
/// the panic message.
fn guarded<F>(extract: F) -> ExtractResponse
where
    F: FnOnce() -> ThemeSnapshot,
{
    match panic::catch_unwind(AssertUnwindSafe(extract)) {
        Ok(theme) => ExtractResponse::ok(theme),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(%message, "extraction panicked");
            ExtractResponse::failed(message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "extraction panicked".to_string()
    }
}

fn encode(response: &ExtractResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|err| {
        warn!(error = %err, "response did not serialize");
        serde_json::json!({ "success": false, "error": err.to_string() }).to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(url: &str) -> Document {
        Document::from_json(&format!(
            r#"{{
                "url": "{url}",
                "timestamp": 42,
                "elements": [{{ "tag": "html" }}],
                "stylesheets": [{{ "text": ":root {{ --brand-primary: #3366ff; }}" }}]
            }}"#
        ))
        .unwrap()
    }

    fn request() -> String {
        serde_json::to_string(&ExtractRequest::ExtractTheme).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let page = PageContext::spawn(document("https://example.com/"), ExtractionConfig::default());
        assert_eq!(page.url(), "https://example.com/");

        let reply = page.send(&request()).unwrap();
        let response: ExtractResponse = serde_json::from_str(&reply).unwrap();
        let theme = response.into_result().unwrap();
        assert_eq!(theme.url, "https://example.com/");
        assert_eq!(theme.timestamp, 42);
        assert_eq!(theme.colors[0].value, "#3366ff");
    }

    #[test]
    fn test_serves_repeated_requests() {
        let page = PageContext::spawn(document("https://example.com/"), ExtractionConfig::default());
        let first = page.send(&request()).unwrap();
        let second = page.send(&request()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unrecognized_request() {
        let page = PageContext::spawn(document("https://example.com/"), ExtractionConfig::default());
        let reply = page.send(r#"{"action":"reload"}"#).unwrap();
        let response: ExtractResponse = serde_json::from_str(&reply).unwrap();
        assert!(!response.success);
        assert!(response.error.unwrap().starts_with("unrecognized request"));
    }

    #[test]
    fn test_invalid_config_answers_failure() {
        let config = ExtractionConfig {
            variable_priority: 0,
            ..Default::default()
        };
        let page = PageContext::spawn(document("https://example.com/"), config);
        let reply = page.send(&request()).unwrap();
        let response: ExtractResponse = serde_json::from_str(&reply).unwrap();
        assert!(!response.success);
        assert!(response.error.unwrap().contains("variable_priority"));
    }

    #[test]
    fn test_panic_becomes_failure() {
        let response = guarded(|| panic!("selector table exploded"));
        assert_eq!(
            response,
            ExtractResponse::failed("selector table exploded")
        );

        let detail = 7;
        let response = guarded(|| panic!("bad element {}", detail));
        assert_eq!(response.error.as_deref(), Some("bad element 7"));
    }
}
