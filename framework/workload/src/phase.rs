use std::path::PathBuf;
use std::time::Duration;

use crate::config::BlockSize;

/// Write-rate steps in MB/s. Each step produces one write phase and one read phase.
pub const RATE_STEPS: [u32; 16] = [
    25, 50, 75, 100, 125, 150, 175, 200, 300, 400, 500, 600, 700, 800, 900, 1000,
];

/// Completion-latency percentiles collected for every read phase.
pub const PERCENTILE_LADDER: [f64; 18] = [
    1.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 99.0, 99.9, 99.99, 99.999,
    99.9999, 99.99999, 100.0,
];

pub const PHASE_RUNTIME: Duration = Duration::from_secs(180);
pub const READ_RAMP_TIME: Duration = Duration::from_secs(30);
pub const SIGNIFICANT_FIGURES: u32 = 6;

/// Structured identity of a phase.
///
/// The rendered job name is derived from this, and the aggregator maps report job names back to
/// it through a [`crate::catalog::PhaseCatalog`] rather than parsing the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PhaseId {
    #[display("prep")]
    Prep,
    /// Unloaded read latency, measured once before the first rate step.
    #[display("mix_0_r")]
    Baseline,
    #[display("mix_{_0}_w")]
    Write(u32),
    #[display("mix_{_0}_r")]
    Read(u32),
}

impl PhaseId {
    /// The nominal write rate this phase belongs to. The baseline and prep phases have none.
    pub fn target_mbs(&self) -> u32 {
        match self {
            PhaseId::Prep | PhaseId::Baseline => 0,
            PhaseId::Write(rate) | PhaseId::Read(rate) => *rate,
        }
    }

    /// Suffix used for the per-phase write-log file name, e.g. `200w`.
    pub(crate) fn log_suffix(&self) -> String {
        match self {
            PhaseId::Prep => "prep".to_string(),
            PhaseId::Baseline => "0r".to_string(),
            PhaseId::Write(rate) => format!("{rate}w"),
            PhaseId::Read(rate) => format!("{rate}r"),
        }
    }
}

/// All phase identities for the given rate steps, in emission order.
pub fn phase_ids(rate_steps: &[u32]) -> Vec<PhaseId> {
    let mut ids = Vec::with_capacity(2 + 2 * rate_steps.len());
    ids.push(PhaseId::Prep);
    ids.push(PhaseId::Baseline);
    for rate in rate_steps {
        ids.push(PhaseId::Write(*rate));
        ids.push(PhaseId::Read(*rate));
    }
    ids
}

/// When a phase may start relative to the phases before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// The first phase of the workload.
    First,
    /// Starts only once every earlier phase has finished.
    AfterPrevious,
    /// Starts alongside the preceding phase, which itself waited for everything before it.
    WithPrevious,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhaseKind {
    /// Populates the test region. Inherits the global write pattern and block size.
    Prep { io_size_kb: u64, output: PathBuf },
    RateLimitedWrite {
        rate_mbs: u32,
        block_size: BlockSize,
        runtime: Duration,
    },
    Read {
        block_size: BlockSize,
        runtime: Duration,
        ramp_time: Duration,
        significant_figures: u32,
        percentiles: &'static [f64],
    },
}

/// One step of the workload.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub id: PhaseId,
    pub ordering: Ordering,
    pub kind: PhaseKind,
    /// Per-phase `--write_iolog` path, when capture is enabled.
    pub iolog: Option<PathBuf>,
    /// Parallelism, only set when greater than one.
    pub numjobs: Option<u32>,
}

impl Phase {
    pub fn name(&self) -> String {
        self.id.to_string()
    }
}
