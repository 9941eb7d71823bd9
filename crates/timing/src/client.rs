//! Blocking access to the JobHistory Server REST API.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    api::{
        AttemptsEnvelope, CounterGroup, CountersEnvelope, JobEnvelope, JobInfo, TaskAttempt, TaskInfo, TasksEnvelope,
    },
    config::HistoryServerConfig,
};

/// Failure of a single history server round-trip.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Response(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Read-only view of one job's history data.
///
/// [HistoryClient] implements this against a live server; tests plug in an
/// in-memory source. Every method is a single fallible round-trip.
pub trait HistorySource {
    fn job(&self, job_id: &str) -> FetchResult<JobInfo>;
    fn tasks(&self, job_id: &str) -> FetchResult<Vec<TaskInfo>>;
    fn counters(&self, job_id: &str) -> FetchResult<Vec<CounterGroup>>;
    fn attempts(&self, job_id: &str, task_id: &str) -> FetchResult<Vec<TaskAttempt>>;
}

/// HTTP client for one history server.
pub struct HistoryClient {
    http: Client,
    base_url: String,
}

impl HistoryClient {
    pub fn new(config: &HistoryServerConfig) -> FetchResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(HistoryClient {
            http,
            base_url: config.base_url(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> FetchResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Response(format!("{} returned {}", url, status)));
        }
        Ok(response.json()?)
    }
}

impl HistorySource for HistoryClient {
    fn job(&self, job_id: &str) -> FetchResult<JobInfo> {
        Ok(self.get_json::<JobEnvelope>(&format!("/jobs/{}", job_id))?.job)
    }

    fn tasks(&self, job_id: &str) -> FetchResult<Vec<TaskInfo>> {
        let envelope: TasksEnvelope = self.get_json(&format!("/jobs/{}/tasks", job_id))?;
        Ok(envelope.tasks.map(|list| list.task).unwrap_or_default())
    }

    fn counters(&self, job_id: &str) -> FetchResult<Vec<CounterGroup>> {
        let envelope: CountersEnvelope = self.get_json(&format!("/jobs/{}/counters", job_id))?;
        Ok(envelope.job_counters.map(|list| list.counter_group).unwrap_or_default())
    }

    fn attempts(&self, job_id: &str, task_id: &str) -> FetchResult<Vec<TaskAttempt>> {
        let envelope: AttemptsEnvelope = self.get_json(&format!("/jobs/{}/tasks/{}/attempts", job_id, task_id))?;
        Ok(envelope.task_attempts.map(|list| list.task_attempt).unwrap_or_default())
    }
}
