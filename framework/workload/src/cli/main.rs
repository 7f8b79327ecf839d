use anyhow::Context;
use clap::Parser as _;
use log::{debug, info};
use zone_mixed_workload::prelude::*;

mod args;

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// For example: `zone-mixed-plan --device /dev/nvme0n2 --result-dir /tmp/run-1 --set numjobs=2`
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = args::PlanArgs::parse();
    info!("{CRATE_NAME} {CRATE_VERSION}");

    let mut config = WorkloadConfig::default()
        .job_name(args.job_name)
        .result_dir(args.result_dir);
    config
        .apply_overrides(&args.overrides)
        .context("Failed to apply overrides")?;
    debug!("Workload configuration: {config:?}");

    let device = match args.capacity_bytes {
        Some(capacity_bytes) => DeviceDescriptor::new(args.device, capacity_bytes, args.zoned),
        None => DeviceDescriptor::from_sysfs(args.device, &args.sysfs_root)
            .context("Failed to describe device, pass --capacity-bytes to skip detection")?,
    };
    info!(
        "Planning for {} ({} bytes, zoned: {})",
        device.path.display(),
        device.capacity_bytes,
        device.zoned
    );

    let plan = PhasePlanner::new(&config, &device).plan();
    let params = EngineParams::render(&config, &device, &plan);

    let rendered = if args.one_per_line {
        params.tokens().join("\n")
    } else {
        params.to_string()
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Engine parameters written to: {}", path.display());
        }
        None => println!("{rendered}"),
    }

    info!(
        "Planned {} phases, report expected at {}",
        plan.phases.len(),
        config.report_path().display()
    );

    Ok(())
}
