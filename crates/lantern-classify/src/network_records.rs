//! Network records derived from the raw protocol log.
//!
//! A thin normalization boundary: every `Network.requestWillBeSent` event
//! becomes one [`NetworkRecord`], in log order. Exposed as a computed
//! artifact so the run's cache hands the same record list to every consumer
//! that needs it.

use async_trait::async_trait;
use lantern_core::{DevtoolsLog, NetworkRecord, Result};
use lantern_compute::{ComputedArtifact, DependencyScope};
use tracing::debug;

/// Computed artifact producing the ordered request records of a run.
pub struct NetworkRecords;

#[async_trait]
impl ComputedArtifact for NetworkRecords {
    const NAME: &'static str = "NetworkRecords";
    type Input = DevtoolsLog;
    type Output = Vec<NetworkRecord>;

    async fn compute(self, log: DevtoolsLog, _deps: DependencyScope<'_>) -> Result<Self::Output> {
        let records: Vec<NetworkRecord> = log
            .iter()
            .filter_map(|event| {
                event.request_url().map(|url| NetworkRecord {
                    url: url.to_string(),
                    request_id: event.request_id().map(str::to_string),
                })
            })
            .collect();

        debug!(count = records.len(), "normalized network records from protocol log");
        Ok(records)
    }
}
