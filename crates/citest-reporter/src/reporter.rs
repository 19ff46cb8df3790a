// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! End-of-run report orchestration: map, chunk, send.

use core::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use crate::chunker::chunk_events;
use crate::config::Config;
use crate::event::{map_record, RawTestRecord, RunContext, TestEvent};
use crate::flusher::DeliveryClient;

/// Everything the host runner hands over at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Result records in the order the runner exposes them, across all
    /// run phases.
    pub records: Vec<RawTestRecord>,
    /// Set in distributed worker sub-processes. Only the coordinating
    /// process reports; a summary carrying a worker id is skipped so each
    /// run produces at most one report.
    pub worker_id: Option<String>,
}

/// Error surfaced to the host when the report flow itself fails.
///
/// Delivery failures are not in here: exhausted retries are logged and
/// accepted as data loss.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize test events: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Drives one end-of-run report.
pub struct TestReporter {
    config: Config,
}

impl TestReporter {
    #[must_use]
    pub fn new(config: Config) -> Self {
        TestReporter { config }
    }

    /// Sends the report for one finished run.
    ///
    /// Missing required configuration and worker invocations are skipped
    /// without error. A chunk whose delivery attempts are exhausted is
    /// logged and dropped while the remaining chunks are still sent. An
    /// `Err` means the flow itself failed and is the host's to surface at
    /// session end.
    pub async fn report(&self, run: &RunSummary) -> Result<(), ReportError> {
        match self.send_report(run).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!(
                    "test report failed: {} - {e}",
                    self.config.events_url().unwrap_or_default()
                );
                Err(e)
            }
        }
    }

    async fn send_report(&self, run: &RunSummary) -> Result<(), ReportError> {
        let Some(url) = self.config.events_url() else {
            error!("missing required events configuration, skipping test report");
            return Ok(());
        };
        if let Some(worker_id) = &run.worker_id {
            debug!("skipping test report from worker process {worker_id}");
            return Ok(());
        }

        let ctx = RunContext::capture(&self.config);
        let events: Vec<TestEvent> = run
            .records
            .iter()
            .filter_map(|record| map_record(record, &ctx))
            .collect();

        let chunks = chunk_events(&events, self.config.max_payload_bytes)?;
        if chunks.is_empty() {
            debug!("no test events to report");
            return Ok(());
        }
        debug!(
            "sending {} test events in {} chunk(s) to {url}",
            events.len(),
            chunks.len()
        );

        let client = DeliveryClient::new(
            url,
            Duration::from_secs(self.config.timeout_secs),
            self.config.retries,
        );
        let mut failed = 0usize;
        for chunk in &chunks {
            if !client.send(chunk.payload()).await {
                failed += 1;
            }
        }
        if failed > 0 {
            error!("failed to deliver {failed} of {} chunk(s)", chunks.len());
        }
        Ok(())
    }
}
