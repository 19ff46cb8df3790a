// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! End-of-run test result reporting to a remote events API.
//!
//! This crate turns a test harness's per-test outcome records into flat
//! JSON events, packs them into size-bounded newline-delimited payloads,
//! and POSTs each payload to an analytics ingestion endpoint with bounded
//! retries and exponential backoff.
//!
//! ```text
//!   host runner
//!       │  RunSummary (ordered raw records)
//!       v
//!   ┌──────────────┐
//!   │ Event Mapper │ (incomplete records dropped)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │   Chunker    │ (NDJSON payloads within the byte budget)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │   Delivery   │ (one POST per chunk, in order)
//!   └──────────────┘
//! ```
//!
//! Delivery is best effort: a chunk whose retry budget is exhausted is
//! logged and dropped, and the remaining chunks are still sent. There is
//! no persistence across runs and no rollback of partially delivered
//! reports.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

/// Size-bounded partitioning of serialized events
pub mod chunker;

/// Reporter configuration resolved from the environment
pub mod config;

/// Raw result records and their mapping into flat events
pub mod event;

/// Payload delivery with bounded retries
pub mod flusher;

/// End-of-run report orchestration
pub mod reporter;

pub use chunker::{chunk_events, Chunk};
pub use config::Config;
pub use event::{map_record, RawTestRecord, RunContext, TestEvent};
pub use flusher::DeliveryClient;
pub use reporter::{ReportError, RunSummary, TestReporter};
