//! Per-job timing extraction.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    api::{JobInfo, TaskAttempt, TaskInfo},
    client::HistorySource,
    counters::CounterIndex,
    report,
    stats::{round2, Samples},
    timeline,
};

/// Min/max/avg summary of one reduce phase across a job's reduce tasks,
/// in seconds.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PhaseBreakdown {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

impl PhaseBreakdown {
    fn from_samples(samples: &Samples) -> Self {
        PhaseBreakdown {
            min: samples.min().map(round2),
            max: samples.max().map(round2),
            avg: samples.mean().map(round2),
        }
    }
}

/// Normalized timing record of one job, derived fresh from the history
/// server on every extraction. All durations are in seconds rounded to two
/// decimals; absent means the server did not report the underlying data.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JobTiming {
    pub job_id: String,

    pub job_name: Option<String>,
    pub state: Option<String>,
    pub uberized: Option<bool>,

    // Absolute timestamps, epoch ms.
    pub submit_time: Option<i64>,
    pub job_start_time: Option<i64>,
    pub job_finish_time: Option<i64>,
    pub total_time: Option<f64>,

    pub submit_time_str: Option<String>,
    pub start_time_str: Option<String>,
    pub finish_time_str: Option<String>,
    pub elapsed_time_str: Option<String>,

    // Phase averages computed by the server.
    pub avg_map_time: Option<f64>,
    pub avg_shuffle_time: Option<f64>,
    pub avg_merge_time: Option<f64>,
    pub avg_reduce_time: Option<f64>,

    pub job_elapsed_time: Option<f64>,
    pub total_map_time: Option<f64>,
    pub total_reduce_time: Option<f64>,

    pub cpu_time: Option<f64>,
    pub gc_time: Option<f64>,

    pub physical_memory_bytes: Option<i64>,
    pub virtual_memory_bytes: Option<i64>,
    pub committed_heap_bytes: Option<i64>,
    pub peak_map_physical_memory: Option<i64>,
    pub peak_reduce_physical_memory: Option<i64>,
    pub peak_map_virtual_memory: Option<i64>,
    pub peak_reduce_virtual_memory: Option<i64>,

    pub hdfs_bytes_read: Option<i64>,
    pub hdfs_bytes_written: Option<i64>,
    pub file_bytes_read: Option<i64>,
    pub file_bytes_written: Option<i64>,
    pub map_input_records: Option<i64>,
    pub map_input_bytes: Option<i64>,
    pub map_output_records: Option<i64>,
    pub map_output_bytes: Option<i64>,

    pub reduce_shuffle_bytes: Option<i64>,
    pub reduce_input_records: Option<i64>,
    pub reduce_input_groups: Option<i64>,
    pub reduce_output_records: Option<i64>,
    pub shuffled_maps: Option<i64>,

    // Phase markers, absolute epoch ms.
    pub map_completion_time_abs: Option<i64>,
    pub first_reduce_start_time_abs: Option<i64>,
    pub reduce_completion_time_abs: Option<i64>,

    // Phase markers relative to job start, seconds.
    pub map_completion_time: Option<f64>,
    pub first_reduce_start_time: Option<f64>,
    pub reduce_completion_time: Option<f64>,

    pub num_map_tasks: usize,
    pub num_reduce_tasks: usize,

    // Reduce straggler statistics.
    pub min_reduce_finish_time: Option<f64>,
    pub max_reduce_finish_time: Option<f64>,
    pub min_reduce_elapsed: Option<f64>,
    pub max_reduce_elapsed: Option<f64>,
    pub avg_reduce_elapsed: Option<f64>,
    pub reduce_elapsed_stddev: Option<f64>,

    pub shuffle_time: PhaseBreakdown,
    pub merge_time: PhaseBreakdown,
    pub reduce_time: PhaseBreakdown,

    pub map_completion_datetime: Option<String>,
    pub first_reduce_start_datetime: Option<String>,
    pub reduce_completion_datetime: Option<String>,
}

fn secs(ms: Option<i64>) -> Option<f64> {
    ms.map(|value| round2(value as f64 / 1000.0))
}

/// Derives a [JobTiming] from the history server, one job at a time.
///
/// A fetch failure on the job or task resources aborts the extraction for
/// that job with `None`; a counters failure only blanks the pass-through
/// resource fields. The extractor logs every failure and never lets one
/// escape to the caller.
pub struct TimingExtractor<'a> {
    source: &'a dyn HistorySource,
}

impl<'a> TimingExtractor<'a> {
    pub fn new(source: &'a dyn HistorySource) -> Self {
        TimingExtractor { source }
    }

    pub fn extract(&self, job_id: &str) -> Option<JobTiming> {
        let job = match self.source.job(job_id) {
            Ok(job) => job,
            Err(err) => {
                warn!("job {}: can't fetch job metadata: {}", job_id, err);
                return None;
            }
        };
        let tasks = match self.source.tasks(job_id) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!("job {}: can't fetch task list: {}", job_id, err);
                return None;
            }
        };
        let counters = match self.source.counters(job_id) {
            Ok(groups) => CounterIndex::new(groups),
            Err(err) => {
                warn!("job {}: can't fetch counters, resource fields will be empty: {}", job_id, err);
                CounterIndex::empty()
            }
        };
        self.build(job_id, &job, &tasks, &counters)
    }

    /// Authoritative attempt of one task: the first one that succeeded.
    /// `None` covers both a failed lookup and a task with no successful
    /// attempt; either way the task contributes no phase breakdown.
    fn successful_attempt(&self, job_id: &str, task_id: &str) -> Option<TaskAttempt> {
        let attempts = match self.source.attempts(job_id, task_id) {
            Ok(attempts) => attempts,
            Err(err) => {
                warn!("job {}: can't fetch attempts of {}: {}", job_id, task_id, err);
                return None;
            }
        };
        attempts.into_iter().find(|attempt| attempt.succeeded())
    }

    fn build(&self, job_id: &str, job: &JobInfo, tasks: &[TaskInfo], counters: &CounterIndex) -> Option<JobTiming> {
        let markers = timeline::phase_markers(job_id, tasks)?;
        let (maps, reduces) = timeline::split_by_type(tasks);

        let job_start = job.started_at();
        let job_finish = job.finished_at();
        let total_time = match (job_start, job_finish) {
            (Some(start), Some(finish)) => Some((finish - start) as f64 / 1000.0),
            _ => None,
        };

        let mut elapsed = Samples::default();
        let mut shuffle = Samples::default();
        let mut merge = Samples::default();
        let mut reduce_compute = Samples::default();
        let mut finish_instants = Vec::new();

        for task in &reduces {
            // Elapsed statistics come from the task record itself and stay
            // in even when the attempt lookup below fails.
            let (Some(elapsed_ms), Some(finish_ms)) = (task.elapsed(), task.finished_at()) else {
                continue;
            };
            elapsed.push(elapsed_ms as f64 / 1000.0);
            finish_instants.push(finish_ms);

            let Some(task_id) = task.id.as_deref() else {
                continue;
            };
            if let Some(attempt) = self.successful_attempt(job_id, task_id) {
                if let Some(ms) = attempt.elapsed_shuffle_time {
                    shuffle.push(ms as f64 / 1000.0);
                }
                if let Some(ms) = attempt.elapsed_merge_time {
                    merge.push(ms as f64 / 1000.0);
                }
                if let Some(ms) = attempt.elapsed_reduce_time {
                    reduce_compute.push(ms as f64 / 1000.0);
                }
            }
        }

        let to_relative = |instant: Option<i64>| timeline::relative_seconds(instant, job_start).map(round2);

        Some(JobTiming {
            job_id: job_id.to_string(),
            job_name: job.name.clone(),
            state: job.state.clone(),
            uberized: job.uberized,
            submit_time: job.submitted_at(),
            job_start_time: job_start,
            job_finish_time: job_finish,
            total_time: total_time.map(round2),
            submit_time_str: job.submitted_at().and_then(report::format_timestamp),
            start_time_str: job_start.and_then(report::format_timestamp),
            finish_time_str: job_finish.and_then(report::format_timestamp),
            elapsed_time_str: total_time.map(report::format_elapsed),
            avg_map_time: secs(job.avg_map_time),
            avg_shuffle_time: secs(job.avg_shuffle_time),
            avg_merge_time: secs(job.avg_merge_time),
            avg_reduce_time: secs(job.avg_reduce_time),
            job_elapsed_time: total_time.map(round2),
            total_map_time: secs(counters.lookup("JobCounter", "MILLIS_MAPS")),
            total_reduce_time: secs(counters.lookup("JobCounter", "MILLIS_REDUCES")),
            cpu_time: secs(counters.lookup("TaskCounter", "CPU_MILLISECONDS")),
            gc_time: secs(counters.lookup("TaskCounter", "GC_TIME_MILLIS")),
            physical_memory_bytes: counters.lookup("TaskCounter", "PHYSICAL_MEMORY_BYTES"),
            virtual_memory_bytes: counters.lookup("TaskCounter", "VIRTUAL_MEMORY_BYTES"),
            committed_heap_bytes: counters.lookup("TaskCounter", "COMMITTED_HEAP_BYTES"),
            peak_map_physical_memory: counters.lookup("TaskCounter", "MAP_PHYSICAL_MEMORY_BYTES_MAX"),
            peak_reduce_physical_memory: counters.lookup("TaskCounter", "REDUCE_PHYSICAL_MEMORY_BYTES_MAX"),
            peak_map_virtual_memory: counters.lookup("TaskCounter", "MAP_VIRTUAL_MEMORY_BYTES_MAX"),
            peak_reduce_virtual_memory: counters.lookup("TaskCounter", "REDUCE_VIRTUAL_MEMORY_BYTES_MAX"),
            hdfs_bytes_read: counters.lookup("FileSystemCounter", "HDFS_BYTES_READ"),
            hdfs_bytes_written: counters.lookup("FileSystemCounter", "HDFS_BYTES_WRITTEN"),
            file_bytes_read: counters.lookup("FileSystemCounter", "FILE_BYTES_READ"),
            file_bytes_written: counters.lookup("FileSystemCounter", "FILE_BYTES_WRITTEN"),
            map_input_records: counters.lookup("TaskCounter", "MAP_INPUT_RECORDS"),
            map_input_bytes: counters.lookup("FileInputFormatCounter", "BYTES_READ"),
            map_output_records: counters.lookup("TaskCounter", "MAP_OUTPUT_RECORDS"),
            map_output_bytes: counters.lookup("TaskCounter", "MAP_OUTPUT_BYTES"),
            reduce_shuffle_bytes: counters.lookup("TaskCounter", "REDUCE_SHUFFLE_BYTES"),
            reduce_input_records: counters.lookup("TaskCounter", "REDUCE_INPUT_RECORDS"),
            reduce_input_groups: counters.lookup("TaskCounter", "REDUCE_INPUT_GROUPS"),
            reduce_output_records: counters.lookup("TaskCounter", "REDUCE_OUTPUT_RECORDS"),
            shuffled_maps: counters.lookup("TaskCounter", "SHUFFLED_MAPS"),
            map_completion_time_abs: markers.map_completion_ms,
            first_reduce_start_time_abs: markers.first_reduce_start_ms,
            reduce_completion_time_abs: markers.reduce_completion_ms,
            map_completion_time: to_relative(markers.map_completion_ms),
            first_reduce_start_time: to_relative(markers.first_reduce_start_ms),
            reduce_completion_time: to_relative(markers.reduce_completion_ms),
            num_map_tasks: maps.len(),
            num_reduce_tasks: reduces.len(),
            min_reduce_finish_time: to_relative(finish_instants.iter().copied().min()),
            max_reduce_finish_time: to_relative(finish_instants.iter().copied().max()),
            min_reduce_elapsed: elapsed.min().map(round2),
            max_reduce_elapsed: elapsed.max().map(round2),
            avg_reduce_elapsed: elapsed.mean().map(round2),
            reduce_elapsed_stddev: elapsed.stddev().map(round2),
            shuffle_time: PhaseBreakdown::from_samples(&shuffle),
            merge_time: PhaseBreakdown::from_samples(&merge),
            reduce_time: PhaseBreakdown::from_samples(&reduce_compute),
            map_completion_datetime: markers.map_completion_ms.and_then(report::format_iso),
            first_reduce_start_datetime: markers.first_reduce_start_ms.and_then(report::format_iso),
            reduce_completion_datetime: markers.reduce_completion_ms.and_then(report::format_iso),
        })
    }
}
