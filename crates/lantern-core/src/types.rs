//! Common types shared across the Lantern analysis engine.

use serde::{Deserialize, Serialize};

/// One observed network request, as normalized from the raw protocol log.
///
/// Classification consumes only `url`; the request id is carried for
/// downstream consumers that correlate records back to protocol events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    /// The request URL as it appeared on the wire.
    pub url: String,

    /// Protocol-assigned request id, when the log supplied one.
    pub request_id: Option<String>,
}

/// The resolved URLs of the page under analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageUrls {
    /// URL of the main document, present when the run navigated.
    pub main_document_url: Option<String>,

    /// URL displayed in the address bar at the end of the run. Always
    /// present; the fallback for non-navigation runs (e.g., a snapshot of an
    /// already-loaded page).
    pub final_displayed_url: String,
}

impl PageUrls {
    /// The page's canonical URL: the main-document URL when the run
    /// navigated, otherwise the final displayed URL.
    pub fn canonical(&self) -> &str {
        self.main_document_url
            .as_deref()
            .unwrap_or(&self.final_displayed_url)
    }
}
