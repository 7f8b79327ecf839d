use clap::Parser;
use log::info;
use std::path::PathBuf;
use zone_mixed_summariser::{render_result_table, summarise, summarise_paths};
use zone_mixed_workload::prelude::{WorkloadConfig, DEFAULT_JOB_NAME};

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(about, long_about = None)]
struct Args {
    /// Directory that holds the engine report and receives the table.
    #[arg(long, env = "RESULT_DIR", default_value = ".")]
    result_dir: PathBuf,

    /// The job name the workload was planned with.
    #[arg(long, default_value = DEFAULT_JOB_NAME)]
    job_name: String,

    /// Read the report from this file instead of `<result_dir>/<job_name>.log`.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the table to this file instead of `<result_dir>/<job_name>.csv`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Do not print the result table to stdout.
    #[arg(long, default_value = "false")]
    no_table: bool,
}

/// For example: `zone-mixed-summariser --result-dir /tmp/run-1`
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    info!("{CRATE_NAME} {CRATE_VERSION}");

    let config = WorkloadConfig::default()
        .job_name(args.job_name)
        .result_dir(args.result_dir);
    let output = match (args.report, args.output) {
        (None, None) => summarise(&config)?,
        (report, output) => {
            let report_path = report.unwrap_or_else(|| config.report_path());
            let table_path = output.unwrap_or_else(|| config.table_path());
            summarise_paths(&report_path, &table_path)?
        }
    };

    if !args.no_table {
        println!("{}", render_result_table(&output.rows));
    }

    Ok(())
}
