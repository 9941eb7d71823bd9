use std::{io::Write, path::PathBuf};

use clap::{ArgGroup, Parser};
use env_logger::{Builder, Env};
use slowstart_timing::{
    client::HistoryClient, config::HistoryServerConfig, enhance::enhance_results_file, extract::TimingExtractor,
    report,
};

/// Extracts per-job timing from the MapReduce JobHistory Server.
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("mode").required(true).args(["job_id", "batch"])))]
struct Args {
    /// Job id to extract, e.g. job_1764138085950_0002.
    job_id: Option<String>,

    /// Path to a results file to enhance in batch.
    #[arg(short, long)]
    batch: Option<PathBuf>,

    /// Path to history server config.
    #[arg(short, long, default_value = None)]
    config: Option<PathBuf>,

    /// History server host, overrides config.
    #[arg(long)]
    host: Option<String>,

    /// History server port, overrides config.
    #[arg(long)]
    port: Option<u16>,
}

fn main() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = Args::parse();

    let mut config = args.config.map(HistoryServerConfig::from_yaml).unwrap_or_default();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let client = HistoryClient::new(&config).expect("Can't create history client");

    if let Some(batch) = args.batch {
        let summary = enhance_results_file(&batch, &client).expect("Can't process results file");
        println!(
            "Enhanced {}/{} jobs ({} skipped, {} failed), saved to {}",
            summary.enhanced,
            summary.total,
            summary.skipped,
            summary.failed,
            summary.output_path.display()
        );
    } else if let Some(job_id) = args.job_id {
        let extractor = TimingExtractor::new(&client);
        match extractor.extract(&job_id) {
            Some(timing) => {
                report::print_report(&timing);
                println!("{}", serde_json::to_string_pretty(&timing).unwrap());
            }
            None => println!("No timing extracted for {}", job_id),
        }
    }
}
