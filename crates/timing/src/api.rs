//! Typed records for the JobHistory Server REST resources.
//!
//! Every field is optional: the server omits fields freely across versions,
//! and timestamps of events that have not happened yet are reported as 0.
//! The accessor methods normalize those zeros to `None` so downstream code
//! never has to compare raw timestamps against 0.

use serde::Deserialize;

/// Envelope of `/jobs/{id}`.
#[derive(Debug, Deserialize)]
pub struct JobEnvelope {
    pub job: JobInfo,
}

/// Job metadata as reported by the history server.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub state: Option<String>,
    pub uberized: Option<bool>,
    pub submit_time: Option<i64>,
    pub start_time: Option<i64>,
    pub finish_time: Option<i64>,
    pub avg_map_time: Option<i64>,
    pub avg_shuffle_time: Option<i64>,
    pub avg_merge_time: Option<i64>,
    pub avg_reduce_time: Option<i64>,
}

impl JobInfo {
    pub fn submitted_at(&self) -> Option<i64> {
        self.submit_time.filter(|&ms| ms > 0)
    }

    pub fn started_at(&self) -> Option<i64> {
        self.start_time.filter(|&ms| ms > 0)
    }

    pub fn finished_at(&self) -> Option<i64> {
        self.finish_time.filter(|&ms| ms > 0)
    }
}

/// Envelope of `/jobs/{id}/tasks`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TasksEnvelope {
    pub tasks: Option<TaskList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskList {
    pub task: Vec<TaskInfo>,
}

/// Task kind. The server reports the type as an upper-case string; anything
/// but MAP and REDUCE (setup/cleanup tasks on older servers) maps to
/// [TaskType::Other].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TaskType {
    Map,
    Reduce,
    Other,
}

impl From<String> for TaskType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "MAP" => TaskType::Map,
            "REDUCE" => TaskType::Reduce,
            _ => TaskType::Other,
        }
    }
}

/// One map or reduce task of a job.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskInfo {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub start_time: Option<i64>,
    pub finish_time: Option<i64>,
    pub elapsed_time: Option<i64>,
}

impl TaskInfo {
    pub fn started_at(&self) -> Option<i64> {
        self.start_time.filter(|&ms| ms > 0)
    }

    pub fn finished_at(&self) -> Option<i64> {
        self.finish_time.filter(|&ms| ms > 0)
    }

    /// Task duration as computed by the server. Authoritative: durations
    /// are never rederived from start/finish instants, which are subject
    /// to clock skew and may be missing.
    pub fn elapsed(&self) -> Option<i64> {
        self.elapsed_time.filter(|&ms| ms > 0)
    }
}

/// Envelope of `/jobs/{id}/tasks/{taskId}/attempts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttemptsEnvelope {
    pub task_attempts: Option<AttemptList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttemptList {
    pub task_attempt: Vec<TaskAttempt>,
}

/// One execution attempt of a task. Reduce attempts carry the phase
/// sub-durations; map attempts leave them absent.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskAttempt {
    pub id: Option<String>,
    pub state: Option<String>,
    pub elapsed_shuffle_time: Option<i64>,
    pub elapsed_merge_time: Option<i64>,
    pub elapsed_reduce_time: Option<i64>,
}

impl TaskAttempt {
    pub fn succeeded(&self) -> bool {
        self.state.as_deref() == Some("SUCCEEDED")
    }
}

/// Envelope of `/jobs/{id}/counters`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountersEnvelope {
    pub job_counters: Option<CounterGroupList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CounterGroupList {
    pub counter_group: Vec<CounterGroup>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CounterGroup {
    pub counter_group_name: Option<String>,
    pub counter: Vec<Counter>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Counter {
    pub name: Option<String>,
    pub total_counter_value: Option<i64>,
}
