//! Console rendering of one extracted job timing.

use chrono::{TimeZone, Utc};

use crate::extract::{JobTiming, PhaseBreakdown};

/// Render an epoch-milliseconds instant the way the history server web UI
/// does, e.g. `Wed Nov 26 10:30:00 UTC 2025`.
pub fn format_timestamp(ms: i64) -> Option<String> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|instant| instant.format("%a %b %d %H:%M:%S UTC %Y").to_string())
}

/// ISO-8601 rendering of an epoch-milliseconds instant.
pub fn format_iso(ms: i64) -> Option<String> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|instant| instant.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
}

/// Render a duration in seconds like `2mins, 5sec`.
pub fn format_elapsed(seconds: f64) -> String {
    let total = seconds as u64;
    if total < 60 {
        format!("{}sec", total)
    } else if total < 3600 {
        format!("{}mins, {}sec", total / 60, total % 60)
    } else {
        format!("{}hrs, {}mins, {}sec", total / 3600, total % 3600 / 60, total % 60)
    }
}

/// `12.34` for a present value, `N/A` otherwise.
pub fn opt_secs(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}", v))
}

fn print_breakdown(label: &str, breakdown: &PhaseBreakdown) {
    println!(
        "  {: <8} min={}s, max={}s, avg={}s",
        label,
        opt_secs(breakdown.min),
        opt_secs(breakdown.max),
        opt_secs(breakdown.avg)
    );
}

/// Print a human-readable summary of one job's timing.
pub fn print_report(timing: &JobTiming) {
    println!("{}", "=".repeat(80));
    println!("Job timing analysis: {}", timing.job_id);
    println!("{}", "=".repeat(80));
    println!("Job Name:    {}", timing.job_name.as_deref().unwrap_or(""));
    println!("State:       {}", timing.state.as_deref().unwrap_or(""));
    println!("Uberized:    {}", timing.uberized.unwrap_or(false));
    println!();
    println!("Timestamps:");
    println!("  Submitted: {}", timing.submit_time_str.as_deref().unwrap_or("N/A"));
    println!("  Started:   {}", timing.start_time_str.as_deref().unwrap_or("N/A"));
    println!("  Finished:  {}", timing.finish_time_str.as_deref().unwrap_or("N/A"));
    println!("  Elapsed:   {}", timing.elapsed_time_str.as_deref().unwrap_or("N/A"));
    println!();
    println!("Tasks:");
    println!("  Map Tasks:    {}", timing.num_map_tasks);
    println!("  Reduce Tasks: {}", timing.num_reduce_tasks);
    println!();
    println!("Server phase averages:");
    println!("  Average Map Time:     {}sec", opt_secs(timing.avg_map_time));
    println!("  Average Shuffle Time: {}sec", opt_secs(timing.avg_shuffle_time));
    println!("  Average Merge Time:   {}sec", opt_secs(timing.avg_merge_time));
    println!("  Average Reduce Time:  {}sec", opt_secs(timing.avg_reduce_time));

    if timing.cpu_time.is_some() {
        println!();
        println!("Resources:");
        println!("  CPU Time: {}sec", opt_secs(timing.cpu_time));
        println!("  GC Time:  {}sec", opt_secs(timing.gc_time));
    }

    if let Some(hdfs_read) = timing.hdfs_bytes_read {
        println!();
        println!("Data volume:");
        println!("  HDFS Read:    {} bytes ({:.2} MB)", hdfs_read, hdfs_read as f64 / 1024.0 / 1024.0);
        if let Some(hdfs_written) = timing.hdfs_bytes_written {
            println!(
                "  HDFS Written: {} bytes ({:.2} MB)",
                hdfs_written,
                hdfs_written as f64 / 1024.0 / 1024.0
            );
        }
        if let Some(records) = timing.map_input_records {
            println!("  Map Input Records:     {}", records);
        }
        if let Some(records) = timing.reduce_output_records {
            println!("  Reduce Output Records: {}", records);
        }
        if let Some(bytes) = timing.reduce_shuffle_bytes {
            println!("  Reduce Shuffle Bytes:  {} ({:.2} MB)", bytes, bytes as f64 / 1024.0 / 1024.0);
        }
    }

    println!();
    println!("Phase markers (relative to job start):");
    println!("  Map phase completed:   {}s", opt_secs(timing.map_completion_time));
    if timing.first_reduce_start_time.is_some() {
        println!("  First reduce started:  {}s", opt_secs(timing.first_reduce_start_time));
        println!("  All reduces completed: {}s", opt_secs(timing.reduce_completion_time));
    }

    if timing.num_reduce_tasks > 0 {
        println!();
        println!("Reduce task dispersion:");
        println!("  Fastest finish: {}s after job start", opt_secs(timing.min_reduce_finish_time));
        println!("  Slowest finish: {}s after job start", opt_secs(timing.max_reduce_finish_time));
        println!(
            "  Elapsed min/max/avg: {}s / {}s / {}s",
            opt_secs(timing.min_reduce_elapsed),
            opt_secs(timing.max_reduce_elapsed),
            opt_secs(timing.avg_reduce_elapsed)
        );
        if timing.reduce_elapsed_stddev.is_some() {
            println!("  Elapsed stddev: {}s", opt_secs(timing.reduce_elapsed_stddev));
        }
        if timing.shuffle_time.avg.is_some() {
            println!();
            println!("Reduce phase breakdown:");
            print_breakdown("Shuffle:", &timing.shuffle_time);
            print_breakdown("Merge:", &timing.merge_time);
            print_breakdown("Reduce:", &timing.reduce_time);
        }
    }
    println!("{}", "=".repeat(80));
}
