//! Raw protocol event log types.
//!
//! The collection side records the browser's instrumentation protocol traffic
//! as an ordered sequence of [`ProtocolEvent`]s. Only two methods matter to
//! classification: `Runtime.executionContextCreated` (extension origins) and
//! `Network.requestWillBeSent` (request URLs, via the network records
//! artifact).

use serde::{Deserialize, Serialize};

/// An ordered protocol event log, as collected during one page load.
pub type DevtoolsLog = Vec<ProtocolEvent>;

/// A single entry in the raw protocol event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolEvent {
    /// Protocol method name (e.g., "Network.requestWillBeSent").
    pub method: String,

    /// Method-specific payload, kept as raw JSON.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// An execution context announced by the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Origin the context was created for (e.g., "chrome-extension://abc123").
    pub origin: String,

    /// Human-readable context name (an extension's display name); may be empty.
    pub name: String,
}

impl ProtocolEvent {
    /// Method name for execution context creation events.
    pub const EXECUTION_CONTEXT_CREATED: &'static str = "Runtime.executionContextCreated";

    /// Method name for request dispatch events.
    pub const REQUEST_WILL_BE_SENT: &'static str = "Network.requestWillBeSent";

    /// Build an execution context creation event.
    pub fn context_created(origin: &str, name: &str) -> Self {
        Self {
            method: Self::EXECUTION_CONTEXT_CREATED.to_string(),
            params: serde_json::json!({
                "context": { "origin": origin, "name": name }
            }),
        }
    }

    /// Build a request dispatch event.
    pub fn request_will_be_sent(request_id: &str, url: &str) -> Self {
        Self {
            method: Self::REQUEST_WILL_BE_SENT.to_string(),
            params: serde_json::json!({
                "requestId": request_id,
                "request": { "url": url }
            }),
        }
    }

    /// The announced execution context, if this is a well-formed
    /// `Runtime.executionContextCreated` event.
    pub fn execution_context_created(&self) -> Option<ExecutionContext> {
        if self.method != Self::EXECUTION_CONTEXT_CREATED {
            return None;
        }
        let context = self.params.get("context")?;
        Some(ExecutionContext {
            origin: context.get("origin")?.as_str()?.to_string(),
            name: context
                .get("name")
                .and_then(|n| n.as_str())
                .unwrap_or_default()
                .to_string(),
        })
    }

    /// The request URL, if this is a well-formed `Network.requestWillBeSent`
    /// event.
    pub fn request_url(&self) -> Option<&str> {
        if self.method != Self::REQUEST_WILL_BE_SENT {
            return None;
        }
        self.params.get("request")?.get("url")?.as_str()
    }

    /// The protocol-assigned request id, if present on this event.
    pub fn request_id(&self) -> Option<&str> {
        self.params.get("requestId")?.as_str()
    }
}
