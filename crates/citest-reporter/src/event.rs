// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Raw result records and their mapping into flat test events.

use chrono::Local;
use serde::Serialize;

use crate::config::Config;

/// One result record as exposed by the host runner.
///
/// The host's result objects are loosely shaped; this struct is the
/// structural contract the reporter needs from them, with `None` as the
/// absence signal. A record missing any field is incomplete and is
/// skipped rather than reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTestRecord {
    /// Stable test identifier, e.g. `tests/api.rs::login_rejects_bad_token`.
    pub node_id: Option<String>,
    /// Human-readable test name.
    pub name: Option<String>,
    /// Run phase that produced this record (setup, call or teardown).
    pub phase: Option<String>,
    /// Wall-clock duration in seconds.
    pub duration: Option<f64>,
    /// Outcome tag (passed, failed, skipped). Passed through as is.
    pub outcome: Option<String>,
}

/// Run-wide constants shared by every event of one report.
///
/// Captured exactly once before mapping begins, so all events in a report
/// carry identical provenance fields and the same timestamp, and the
/// optional fields are either present in every event or in none.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub date: String,
    pub commit: String,
    pub branch: String,
    pub job_id: String,
    pub job_url: String,
    pub job_name: String,
    pub repository: Option<String>,
    pub workflow: Option<String>,
}

impl RunContext {
    /// Stamps the report timestamp and copies the provenance fields out of
    /// the configuration.
    #[must_use]
    pub fn capture(config: &Config) -> Self {
        RunContext {
            date: Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            commit: config.commit.clone(),
            branch: config.branch.clone(),
            job_id: config.job_id.clone(),
            job_url: config.job_url.clone(),
            job_name: config.job_name.clone(),
            repository: config.repository.clone(),
            workflow: config.workflow.clone(),
        }
    }
}

/// One reported test outcome, serialized as a single JSON line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestEvent {
    pub date: String,
    pub commit: String,
    pub branch: String,
    pub job_id: String,
    pub job_url: String,
    pub job_name: String,
    /// Left out of the serialized line entirely when not configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
    pub test_nodeid: String,
    pub test_name: String,
    pub test_part: String,
    pub duration: f64,
    pub outcome: String,
}

/// Maps one raw record into an event, or `None` when the record lacks a
/// required field.
///
/// No further validation happens here: duration is not range-checked and
/// phase/outcome tags are forwarded as the runner produced them.
#[must_use]
pub fn map_record(record: &RawTestRecord, ctx: &RunContext) -> Option<TestEvent> {
    Some(TestEvent {
        date: ctx.date.clone(),
        commit: ctx.commit.clone(),
        branch: ctx.branch.clone(),
        job_id: ctx.job_id.clone(),
        job_url: ctx.job_url.clone(),
        job_name: ctx.job_name.clone(),
        repository: ctx.repository.clone(),
        workflow: ctx.workflow.clone(),
        test_nodeid: record.node_id.clone()?,
        test_name: record.name.clone()?,
        test_part: record.phase.clone()?,
        duration: record.duration?,
        outcome: record.outcome.clone()?,
    })
}
