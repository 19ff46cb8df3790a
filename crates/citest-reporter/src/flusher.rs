// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Payload delivery with bounded retries and exponential backoff.

use core::time::Duration;
use reqwest::StatusCode;
use std::time::Instant;
use tracing::{debug, error};

/// Client for one events endpoint.
///
/// Each payload gets `retries + 1` attempts. A status outside {200, 202}
/// or a transport error counts as a failed attempt; between failed
/// attempts the client backs off exponentially (1s, 2s, 4s, ...). A
/// payload whose attempts are exhausted is reported as lost, not queued.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
    retries: u32,
}

impl DeliveryClient {
    #[must_use]
    pub fn new(url: String, timeout: Duration, retries: u32) -> Self {
        DeliveryClient {
            client: reqwest::Client::new(),
            url,
            timeout,
            retries,
        }
    }

    /// Sends one payload, returning whether any attempt succeeded.
    pub async fn send(&self, payload: String) -> bool {
        let attempts = self.retries + 1;
        for attempt in 0..attempts {
            let time = Instant::now();
            let response = self
                .client
                .post(&self.url)
                .timeout(self.timeout)
                .body(payload.clone())
                .send()
                .await;
            let elapsed = time.elapsed();

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status == StatusCode::OK || status == StatusCode::ACCEPTED {
                        debug!(
                            "delivered {} byte payload in {} ms",
                            payload.len(),
                            elapsed.as_millis()
                        );
                        return true;
                    }
                    error!(
                        "events intake returned {} (attempt {}/{})",
                        status,
                        attempt + 1,
                        attempts
                    );
                }
                Err(e) => {
                    error!("request failed: {e} (attempt {}/{})", attempt + 1, attempts);
                }
            }

            if attempt + 1 < attempts {
                tokio::time::sleep(Duration::from_secs(2_u64.pow(attempt))).await;
            }
        }
        error!("all {attempts} attempts failed to deliver payload");
        false
    }
}
