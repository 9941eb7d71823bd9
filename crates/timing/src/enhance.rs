//! Batch enhancement of persisted experiment results.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use log::warn;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    client::HistorySource,
    extract::{JobTiming, TimingExtractor},
    report,
};

/// Marker job id written by the submission loop when it could not discover
/// the id of a run.
const UNKNOWN_JOB_ID: &str = "unknown";

/// Fatal batch failures. Per-job extraction failures are not errors; the
/// affected records simply stay unmodified.
#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid results file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("results file has an unsupported top-level structure")]
    UnknownShape,
}

/// Outcome of one batch run.
#[derive(Debug)]
pub struct EnhanceSummary {
    pub total: usize,
    pub enhanced: usize,
    pub skipped: usize,
    pub failed: usize,
    pub output_path: PathBuf,
}

/// Timing fields merged into each result record, as
/// `(timing field, result field)` pairs. The record's own identity fields
/// (data size, slowstart value, run number, ...) are never part of this
/// list; the absolute-millisecond markers and ISO renderings stay in the
/// timing record only.
const MERGED_FIELDS: &[(&str, &str)] = &[
    ("job_name", "job_name"),
    ("state", "state"),
    ("uberized", "uberized"),
    ("submit_time", "submit_time_ts"),
    ("job_start_time", "start_time_ts"),
    ("job_finish_time", "finish_time_ts"),
    ("submit_time_str", "submit_time_str"),
    ("start_time_str", "start_time_str"),
    ("finish_time_str", "finish_time_str"),
    ("elapsed_time_str", "elapsed_time_str"),
    ("total_time", "total_time_from_api"),
    ("avg_map_time", "avg_map_time"),
    ("avg_shuffle_time", "avg_shuffle_time"),
    ("avg_merge_time", "avg_merge_time"),
    ("avg_reduce_time", "avg_reduce_time"),
    ("job_elapsed_time", "job_elapsed_time"),
    ("total_map_time", "total_map_time"),
    ("total_reduce_time", "total_reduce_time"),
    ("cpu_time", "cpu_time"),
    ("gc_time", "gc_time"),
    ("physical_memory_bytes", "physical_memory_bytes"),
    ("virtual_memory_bytes", "virtual_memory_bytes"),
    ("committed_heap_bytes", "committed_heap_bytes"),
    ("peak_map_physical_memory", "peak_map_physical_memory"),
    ("peak_reduce_physical_memory", "peak_reduce_physical_memory"),
    ("peak_map_virtual_memory", "peak_map_virtual_memory"),
    ("peak_reduce_virtual_memory", "peak_reduce_virtual_memory"),
    ("hdfs_bytes_read", "hdfs_bytes_read"),
    ("hdfs_bytes_written", "hdfs_bytes_written"),
    ("file_bytes_read", "file_bytes_read"),
    ("file_bytes_written", "file_bytes_written"),
    ("map_input_records", "map_input_records"),
    ("map_input_bytes", "map_input_bytes"),
    ("map_output_records", "map_output_records"),
    ("map_output_bytes", "map_output_bytes"),
    ("reduce_shuffle_bytes", "reduce_shuffle_bytes"),
    ("reduce_input_records", "reduce_input_records"),
    ("reduce_input_groups", "reduce_input_groups"),
    ("reduce_output_records", "reduce_output_records"),
    ("shuffled_maps", "shuffled_maps"),
    ("map_completion_time", "map_completion_time"),
    ("first_reduce_start_time", "first_reduce_start_time"),
    ("reduce_completion_time", "reduce_completion_time"),
    ("num_map_tasks", "num_map_tasks"),
    ("num_reduce_tasks", "num_reduce_tasks"),
    ("min_reduce_finish_time", "min_reduce_finish_time"),
    ("max_reduce_finish_time", "max_reduce_finish_time"),
    ("min_reduce_elapsed", "min_reduce_elapsed"),
    ("max_reduce_elapsed", "max_reduce_elapsed"),
    ("avg_reduce_elapsed", "avg_reduce_elapsed"),
    ("reduce_elapsed_stddev", "reduce_elapsed_stddev"),
    ("shuffle_time", "shuffle_time"),
    ("merge_time", "merge_time"),
    ("reduce_time", "reduce_time"),
];

/// Read a results collection, enhance every record in place, and write the
/// augmented collection next to the input.
///
/// Accepts either a bare array of records or an object carrying the array
/// in a `results` field; the output keeps the same top-level shape.
/// Re-running on the same input re-fetches and overwrites every enhanced
/// field, so the operation is idempotent and restartable.
pub fn enhance_results_file(input: &Path, source: &dyn HistorySource) -> Result<EnhanceSummary, EnhanceError> {
    let mut document: Value = serde_json::from_str(&std::fs::read_to_string(input)?)?;
    let records = results_slice(&mut document)?;

    let extractor = TimingExtractor::new(source);
    let total = records.len();
    let mut enhanced = 0;
    let mut skipped = 0;

    for (index, record) in records.iter_mut().enumerate() {
        let job_id = match record.get("job_id").and_then(Value::as_str) {
            Some(id) if id != UNKNOWN_JOB_ID => id.to_string(),
            _ => {
                println!("[{}/{}] skipped: no job id", index + 1, total);
                skipped += 1;
                continue;
            }
        };

        println!("[{}/{}] processing {}...", index + 1, total, job_id);
        match extractor.extract(&job_id) {
            Some(timing) => {
                let Some(fields) = record.as_object_mut() else {
                    warn!("record {} is not an object, leaving it as is", index + 1);
                    continue;
                };
                println!(
                    "  map done {}s, first reduce {}s, reduces done {}s",
                    report::opt_secs(timing.map_completion_time),
                    report::opt_secs(timing.first_reduce_start_time),
                    report::opt_secs(timing.reduce_completion_time)
                );
                merge_timing(fields, &timing);
                enhanced += 1;
            }
            None => println!("  no timing extracted"),
        }
    }

    let output_path = output_path(input);
    File::create(&output_path)?.write_all(serde_json::to_string_pretty(&document).unwrap().as_bytes())?;

    Ok(EnhanceSummary {
        total,
        enhanced,
        skipped,
        failed: total - enhanced - skipped,
        output_path,
    })
}

fn results_slice(document: &mut Value) -> Result<&mut Vec<Value>, EnhanceError> {
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(map) => match map.get_mut("results") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(EnhanceError::UnknownShape),
        },
        _ => Err(EnhanceError::UnknownShape),
    }
}

/// Copy the timing fields into one result record.
fn merge_timing(record: &mut Map<String, Value>, timing: &JobTiming) {
    let timing = serde_json::to_value(timing).unwrap();
    for (from, to) in MERGED_FIELDS {
        record.insert((*to).to_string(), timing.get(*from).cloned().unwrap_or(Value::Null));
    }
}

/// `raw_results.json` becomes `raw_results_enhanced.json`, next to the
/// input.
fn output_path(input: &Path) -> PathBuf {
    match input.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) => input.with_file_name(format!("{}_enhanced.json", stem)),
        None => input.with_extension("enhanced.json"),
    }
}
