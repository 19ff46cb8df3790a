// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Reporter configuration resolved once from the environment.

use std::env;

/// Default per-request timeout, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// Maximum serialized payload size per request. 10MB in Bytes.
const DEFAULT_MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Everything the reporter needs for one run, captured up front.
///
/// Constructed once at startup (normally via [`Config::from_env`]) and
/// passed into the reporter; nothing reads the environment after that.
/// The three credential fields are required: when any of them is `None`
/// the whole report is skipped.
#[derive(Debug, Clone)]
pub struct Config {
    /// Events API host, e.g. `https://api.example.com`.
    pub base_url: Option<String>,
    /// Name of the destination dataset.
    pub datasource: Option<String>,
    /// Credential token, sent as a query parameter.
    pub token: Option<String>,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
    /// Extra attempts beyond the first for each payload.
    pub retries: u32,
    /// Passed through verbatim as the `wait` query parameter.
    pub wait: String,
    /// Byte budget for a single request payload.
    pub max_payload_bytes: usize,
    pub commit: String,
    pub branch: String,
    pub job_id: String,
    pub job_url: String,
    pub job_name: String,
    /// Omitted from events entirely when unset.
    pub repository: Option<String>,
    /// Omitted from events entirely when unset.
    pub workflow: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: None,
            datasource: None,
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: 0,
            wait: "false".to_string(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            commit: "ci_commit_sha_unknown".to_string(),
            branch: "ci_commit_branch_unknown".to_string(),
            job_id: "ci_job_id_unknown".to_string(),
            job_url: "job_url_unknown".to_string(),
            job_name: "job_name_unknown".to_string(),
            repository: None,
            workflow: None,
        }
    }
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// Missing provenance variables fall back to sentinel strings so the
    /// events still carry a recognizable placeholder; missing credential
    /// variables stay `None` and disable reporting.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            base_url: env::var("TEST_EVENTS_URL").ok(),
            datasource: env::var("TEST_EVENTS_DATASOURCE").ok(),
            token: env::var("TEST_EVENTS_TOKEN").ok(),
            timeout_secs: env::var("TEST_EVENTS_TIMEOUT")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            retries: env::var("TEST_EVENTS_RETRIES")
                .ok()
                .and_then(|value| value.parse::<u32>().ok())
                .unwrap_or(0),
            wait: env::var("TEST_EVENTS_WAIT").unwrap_or(defaults.wait),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            commit: env::var("CI_COMMIT_SHA").unwrap_or(defaults.commit),
            // The merge request source branch wins over the commit branch
            // when both are set.
            branch: env::var("CI_MERGE_REQUEST_SOURCE_BRANCH_NAME")
                .or_else(|_| env::var("CI_COMMIT_BRANCH"))
                .unwrap_or(defaults.branch),
            job_id: env::var("CI_JOB_ID").unwrap_or(defaults.job_id),
            job_url: env::var("CI_JOB_URL").unwrap_or(defaults.job_url),
            job_name: env::var("CI_JOB_NAME").unwrap_or(defaults.job_name),
            repository: env::var("CI_PROJECT_NAME").ok(),
            workflow: env::var("CI_PIPELINE_NAME").ok(),
        }
    }

    /// Full events endpoint, or `None` when any required value is absent.
    #[must_use]
    pub fn events_url(&self) -> Option<String> {
        let base_url = self.base_url.as_deref()?;
        let datasource = self.datasource.as_deref()?;
        let token = self.token.as_deref()?;
        Some(format!(
            "{base_url}/v0/events?name={datasource}&token={token}&wait={}",
            self.wait
        ))
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use std::env;

    use super::Config;

    const ALL_VARS: &[&str] = &[
        "TEST_EVENTS_URL",
        "TEST_EVENTS_DATASOURCE",
        "TEST_EVENTS_TOKEN",
        "TEST_EVENTS_TIMEOUT",
        "TEST_EVENTS_RETRIES",
        "TEST_EVENTS_WAIT",
        "CI_COMMIT_SHA",
        "CI_MERGE_REQUEST_SOURCE_BRANCH_NAME",
        "CI_COMMIT_BRANCH",
        "CI_JOB_ID",
        "CI_JOB_URL",
        "CI_JOB_NAME",
        "CI_PROJECT_NAME",
        "CI_PIPELINE_NAME",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.base_url, None);
        assert_eq!(config.datasource, None);
        assert_eq!(config.token, None);
        assert_eq!(config.timeout_secs, 2);
        assert_eq!(config.retries, 0);
        assert_eq!(config.wait, "false");
        assert_eq!(config.commit, "ci_commit_sha_unknown");
        assert_eq!(config.branch, "ci_commit_branch_unknown");
        assert_eq!(config.job_id, "ci_job_id_unknown");
        assert_eq!(config.job_url, "job_url_unknown");
        assert_eq!(config.job_name, "job_name_unknown");
        assert_eq!(config.repository, None);
        assert_eq!(config.workflow, None);
        assert_eq!(config.events_url(), None);
    }

    #[test]
    #[serial]
    fn test_events_url_requires_all_credentials() {
        clear_env();
        env::set_var("TEST_EVENTS_URL", "https://api.example.com");
        env::set_var("TEST_EVENTS_DATASOURCE", "test_results");
        let config = Config::from_env();
        assert_eq!(config.events_url(), None);
        env::set_var("TEST_EVENTS_TOKEN", "t0k3n");
        let config = Config::from_env();
        assert_eq!(
            config.events_url().as_deref(),
            Some("https://api.example.com/v0/events?name=test_results&token=t0k3n&wait=false")
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_wait_is_passed_through() {
        clear_env();
        env::set_var("TEST_EVENTS_URL", "https://api.example.com");
        env::set_var("TEST_EVENTS_DATASOURCE", "ds");
        env::set_var("TEST_EVENTS_TOKEN", "tk");
        env::set_var("TEST_EVENTS_WAIT", "true");
        let config = Config::from_env();
        assert_eq!(
            config.events_url().as_deref(),
            Some("https://api.example.com/v0/events?name=ds&token=tk&wait=true")
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_merge_request_branch_wins() {
        clear_env();
        env::set_var("CI_COMMIT_BRANCH", "main");
        let config = Config::from_env();
        assert_eq!(config.branch, "main");
        env::set_var("CI_MERGE_REQUEST_SOURCE_BRANCH_NAME", "feature/retry");
        let config = Config::from_env();
        assert_eq!(config.branch, "feature/retry");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_unparseable_numbers_fall_back_to_defaults() {
        clear_env();
        env::set_var("TEST_EVENTS_TIMEOUT", "soon");
        env::set_var("TEST_EVENTS_RETRIES", "-1");
        let config = Config::from_env();
        assert_eq!(config.timeout_secs, 2);
        assert_eq!(config.retries, 0);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_custom_timeout_and_retries() {
        clear_env();
        env::set_var("TEST_EVENTS_TIMEOUT", "10");
        env::set_var("TEST_EVENTS_RETRIES", "3");
        let config = Config::from_env();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.retries, 3);
        clear_env();
    }
}
