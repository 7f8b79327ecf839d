use std::path::PathBuf;

use clap::Parser;
use zone_mixed_workload::prelude::DEFAULT_JOB_NAME;

#[derive(Parser)]
#[command(about, long_about = None)]
pub struct PlanArgs {
    /// The block device to plan the workload for, e.g. `/dev/nvme0n2`.
    #[arg(long)]
    pub device: PathBuf,

    /// Device capacity in bytes.
    ///
    /// When not given, the capacity and zone model are read from sysfs.
    #[arg(long)]
    pub capacity_bytes: Option<u64>,

    /// Treat the device as zoned. Only used together with `--capacity-bytes`.
    #[arg(long, default_value = "false")]
    pub zoned: bool,

    /// Root of the sysfs tree used to describe the device.
    #[arg(long, default_value = "/sys")]
    pub sysfs_root: PathBuf,

    /// Directory that the engine report and per-phase logs are written to.
    #[arg(long, env = "RESULT_DIR", default_value = ".")]
    pub result_dir: PathBuf,

    /// The job name, used for the report and result file names.
    #[arg(long, default_value = DEFAULT_JOB_NAME)]
    pub job_name: String,

    /// Override a workload setting in the format `key=value`. For example `--set numjobs=4`.
    ///
    /// Accepted keys are `blocksize_writes`, `blocksize_reads`, `max_open_zones`, `write_iolog`,
    /// `numjobs` and `spdk_path`. The flag can be given multiple times. If any override is
    /// invalid then none are applied and planning fails.
    #[arg(long = "set", short = 's', value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Write the engine parameters to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print one parameter per line rather than a single line.
    #[arg(long, default_value = "false")]
    pub one_per_line: bool,
}
