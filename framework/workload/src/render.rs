use itertools::Itertools;
use std::fmt;

use crate::config::{IoEngine, WorkloadConfig};
use crate::device::DeviceDescriptor;
use crate::phase::{Ordering, Phase, PhaseKind};
use crate::planner::WorkloadPlan;

/// The flat parameter set handed to the engine.
///
/// Tokens are kept separate so they can be passed straight to a process builder. The
/// [`fmt::Display`] form joins them with single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineParams {
    tokens: Vec<String>,
}

impl EngineParams {
    /// Render the global directives followed by every phase of the plan.
    ///
    /// The device path is not validated here, a bad device only surfaces when the engine runs.
    pub fn render(config: &WorkloadConfig, device: &DeviceDescriptor, plan: &WorkloadPlan) -> Self {
        let mut tokens = vec![
            "--direct=1".to_string(),
            "--zonemode=zbd".to_string(),
            "--output-format=json".to_string(),
            format!("--max_open_zones={}", config.max_open_zones),
            format!("--filename={}", device.path.display()),
            "--rw=randwrite".to_string(),
            "--norandommap".to_string(),
            format!("--bs={}", config.blocksize_writes),
        ];

        if let Some(zone_size) = plan.sizing.zone_size_override {
            tokens.push(format!("--zonesize={zone_size}"));
        }

        match &config.io_engine {
            IoEngine::IoUring => tokens.push("--ioengine=io_uring".to_string()),
            IoEngine::Spdk { root } => {
                let root = root.display();
                tokens.push(format!("--ioengine={root}/spdk/build/fio/spdk_bdev"));
                tokens.push(format!("--spdk_json_conf={root}/spdk/bdev_zoned_uring.json"));
                tokens.push("--thread=1".to_string());
            }
        }

        for phase in &plan.phases {
            render_phase(phase, &mut tokens);
        }

        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl fmt::Display for EngineParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.iter().join(" "))
    }
}

fn render_phase(phase: &Phase, tokens: &mut Vec<String>) {
    tokens.push(format!("--name={}", phase.id));
    if phase.ordering == Ordering::AfterPrevious {
        tokens.push("--wait_for_previous".to_string());
    }

    match &phase.kind {
        PhaseKind::Prep { io_size_kb, output } => {
            tokens.push(format!("--io_size={io_size_kb}k"));
            tokens.push("--output".to_string());
            tokens.push(output.display().to_string());
        }
        PhaseKind::RateLimitedWrite {
            rate_mbs,
            block_size,
            runtime,
        } => {
            tokens.push(format!("--rate={rate_mbs}m"));
            tokens.push(format!("--bs={block_size}"));
            tokens.push(format!("--runtime={}", runtime.as_secs()));
            tokens.push("--time_based".to_string());
        }
        PhaseKind::Read {
            block_size,
            runtime,
            ramp_time,
            significant_figures,
            percentiles,
        } => {
            tokens.push("--rw=randread".to_string());
            tokens.push("--norandommap".to_string());
            tokens.push(format!("--bs={block_size}"));
            tokens.push(format!("--runtime={}", runtime.as_secs()));
            tokens.push(format!("--ramp_time={}", ramp_time.as_secs()));
            tokens.push("--time_based".to_string());
            tokens.push(format!("--significant_figures={significant_figures}"));
            tokens.push(format!(
                "--percentile_list={}",
                percentiles.iter().join(":")
            ));
        }
    }

    if let Some(iolog) = &phase.iolog {
        tokens.push(format!("--write_iolog={}", iolog.display()));
    }
    if let Some(numjobs) = phase.numjobs {
        tokens.push(format!("--numjobs={numjobs}"));
    }
}
