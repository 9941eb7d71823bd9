//! Phase boundaries recovered from a job's flat task list.

use log::warn;

use crate::api::{TaskInfo, TaskType};

/// Absolute phase markers of one job, in epoch milliseconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseMarkers {
    /// Finish instant of the last map task.
    pub map_completion_ms: Option<i64>,
    /// Start instant of the earliest reduce task.
    pub first_reduce_start_ms: Option<i64>,
    /// Finish instant of the last reduce task.
    pub reduce_completion_ms: Option<i64>,
}

/// Split a task list into its map and reduce subsets. Tasks of other or
/// unknown types are dropped.
pub fn split_by_type(tasks: &[TaskInfo]) -> (Vec<&TaskInfo>, Vec<&TaskInfo>) {
    let mut maps = Vec::new();
    let mut reduces = Vec::new();
    for task in tasks {
        match task.task_type {
            Some(TaskType::Map) => maps.push(task),
            Some(TaskType::Reduce) => reduces.push(task),
            _ => {}
        }
    }
    (maps, reduces)
}

/// Compute the three phase markers for a job.
///
/// Returns `None` when the task list has no map tasks: every job has maps,
/// so an empty map subset means malformed or partial history data and the
/// job must be skipped rather than filled with defaults. An empty reduce
/// subset is a valid map-only job; its reduce markers stay absent.
pub fn phase_markers(job_id: &str, tasks: &[TaskInfo]) -> Option<PhaseMarkers> {
    let (maps, reduces) = split_by_type(tasks);
    if maps.is_empty() {
        warn!("job {} has no MAP tasks, skipping", job_id);
        return None;
    }
    Some(PhaseMarkers {
        map_completion_ms: maps.iter().filter_map(|task| task.finished_at()).max(),
        first_reduce_start_ms: reduces.iter().filter_map(|task| task.started_at()).min(),
        reduce_completion_ms: reduces.iter().filter_map(|task| task.finished_at()).max(),
    })
}

/// Convert an absolute instant to seconds relative to the job start.
/// Undefined when either side is missing.
pub fn relative_seconds(instant_ms: Option<i64>, job_start_ms: Option<i64>) -> Option<f64> {
    match (instant_ms, job_start_ms) {
        (Some(instant), Some(start)) => Some((instant - start) as f64 / 1000.0),
        _ => None,
    }
}
