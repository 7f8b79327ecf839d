//! Planning for the rate-stepped mixed read/write workload on zoned block devices.
//!
//! A [`prelude::PhasePlanner`] turns a [`prelude::WorkloadConfig`] and a
//! [`prelude::DeviceDescriptor`] into an ordered [`prelude::WorkloadPlan`], which
//! [`prelude::EngineParams`] flattens into the engine's command line. Running the engine is left
//! to the caller.

mod catalog;
mod config;
mod device;
mod phase;
mod planner;
mod render;
mod sizing;

pub mod prelude {
    pub use crate::catalog::{DuplicatePhaseError, PhaseCatalog, UnknownPhaseError};
    pub use crate::config::{
        parse_override, BlockSize, ConfigError, IoEngine, OverrideKey, WorkloadConfig,
        DEFAULT_JOB_NAME,
    };
    pub use crate::device::DeviceDescriptor;
    pub use crate::phase::{
        phase_ids, Ordering, Phase, PhaseId, PhaseKind, PERCENTILE_LADDER, PHASE_RUNTIME,
        RATE_STEPS, READ_RAMP_TIME, SIGNIFICANT_FIGURES,
    };
    pub use crate::planner::{PhasePlanner, PlanError, WorkloadPlan};
    pub use crate::render::EngineParams;
    pub use crate::sizing::{
        Sizing, CONVENTIONAL_CAPACITY_PCT, EMULATED_ZONE_SIZE, ZONED_CAPACITY_PCT,
    };
}
