use itertools::Itertools;

use crate::catalog::{DuplicatePhaseError, PhaseCatalog};
use crate::config::WorkloadConfig;
use crate::device::DeviceDescriptor;
use crate::phase::{
    phase_ids, Ordering, Phase, PhaseId, PhaseKind, PERCENTILE_LADDER, PHASE_RUNTIME,
    RATE_STEPS, READ_RAMP_TIME, SIGNIFICANT_FIGURES,
};
use crate::sizing::Sizing;

/// Rate steps that would produce ambiguous phase names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// A zero step would render `mix_0_r`, the baseline's name.
    #[error("Rate step 0 collides with the baseline read")]
    ZeroRateStep,
    #[error("Rate step {0} is listed more than once")]
    DuplicateRateStep(u32),
}

/// The planned workload: sizing plus the ordered phases.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadPlan {
    pub sizing: Sizing,
    pub phases: Vec<Phase>,
}

impl WorkloadPlan {
    /// Mapping from rendered job name to phase identity for this plan.
    pub fn catalog(&self) -> Result<PhaseCatalog, DuplicatePhaseError> {
        PhaseCatalog::from_ids(self.phases.iter().map(|p| p.id))
    }
}

/// Builds the phase sequence for one device and configuration.
pub struct PhasePlanner<'a> {
    config: &'a WorkloadConfig,
    device: &'a DeviceDescriptor,
    rate_steps: &'a [u32],
}

impl<'a> PhasePlanner<'a> {
    pub fn new(config: &'a WorkloadConfig, device: &'a DeviceDescriptor) -> Self {
        Self {
            config,
            device,
            rate_steps: &RATE_STEPS,
        }
    }

    /// Replace the standard rate steps.
    ///
    /// Steps must be non-zero and distinct so that every phase name is unique.
    pub fn with_rate_steps(mut self, rate_steps: &'a [u32]) -> Result<Self, PlanError> {
        if rate_steps.contains(&0) {
            log::warn!("Rejecting rate steps {rate_steps:?}: a zero step collides with the baseline");
            return Err(PlanError::ZeroRateStep);
        }
        if let Some(step) = rate_steps.iter().duplicates().next() {
            log::warn!("Rejecting rate steps {rate_steps:?}: {step} is listed twice");
            return Err(PlanError::DuplicateRateStep(*step));
        }
        self.rate_steps = rate_steps;
        Ok(self)
    }

    pub fn plan(&self) -> WorkloadPlan {
        let sizing = Sizing::for_device(self.device);
        if self.rate_steps.is_empty() {
            log::warn!("No rate steps configured, only the prep and baseline phases are planned");
        }

        let phases = phase_ids(self.rate_steps)
            .into_iter()
            .map(|id| self.phase(id, &sizing))
            .collect::<Vec<_>>();

        log::debug!(
            "Planned {} phases for {} (io_size={}k, capacity_pct={})",
            phases.len(),
            self.device.path.display(),
            sizing.io_size_kb,
            sizing.capacity_pct
        );

        WorkloadPlan { sizing, phases }
    }

    fn phase(&self, id: PhaseId, sizing: &Sizing) -> Phase {
        let (ordering, kind) = match id {
            PhaseId::Prep => (
                Ordering::First,
                PhaseKind::Prep {
                    io_size_kb: sizing.io_size_kb,
                    output: self.config.report_path(),
                },
            ),
            PhaseId::Baseline => (Ordering::AfterPrevious, self.read_kind()),
            PhaseId::Write(rate_mbs) => (
                Ordering::AfterPrevious,
                PhaseKind::RateLimitedWrite {
                    rate_mbs,
                    block_size: self.config.blocksize_writes.clone(),
                    runtime: PHASE_RUNTIME,
                },
            ),
            // reads overlap their step's write so latency is measured under load
            PhaseId::Read(_) => (Ordering::WithPrevious, self.read_kind()),
        };

        // the prep phase never carries instrumentation
        let instrumented = id != PhaseId::Prep;
        let iolog = (instrumented && self.config.write_iolog).then(|| {
            self.config
                .result_path()
                .join(format!("write_iolog_{}.txt", id.log_suffix()))
        });
        let numjobs = (instrumented && self.config.numjobs > 1).then_some(self.config.numjobs);

        Phase {
            id,
            ordering,
            kind,
            iolog,
            numjobs,
        }
    }

    fn read_kind(&self) -> PhaseKind {
        PhaseKind::Read {
            block_size: self.config.blocksize_reads.clone(),
            runtime: PHASE_RUNTIME,
            ramp_time: READ_RAMP_TIME,
            significant_figures: SIGNIFICANT_FIGURES,
            percentiles: &PERCENTILE_LADDER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn zoned_device() -> DeviceDescriptor {
        DeviceDescriptor::new("/dev/nvme0n2", 100_000_000_000, true)
    }

    #[test]
    fn test_should_plan_all_phases_in_order() {
        let config = WorkloadConfig::default();
        let device = zoned_device();
        let plan = PhasePlanner::new(&config, &device).plan();

        assert_eq!(plan.phases.len(), 34);
        let names = plan.phases.iter().map(Phase::name).collect::<Vec<_>>();
        assert_eq!(&names[..4], &["prep", "mix_0_r", "mix_25_w", "mix_25_r"]);
        assert_eq!(&names[32..], &["mix_1000_w", "mix_1000_r"]);

        let unique = names.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_phase_ordering() {
        let config = WorkloadConfig::default();
        let device = zoned_device();
        let plan = PhasePlanner::new(&config, &device).plan();

        assert_eq!(plan.phases[0].ordering, Ordering::First);
        assert_eq!(plan.phases[1].ordering, Ordering::AfterPrevious);
        for pair in plan.phases[2..].chunks(2) {
            assert_eq!(pair[0].ordering, Ordering::AfterPrevious);
            assert_eq!(pair[1].ordering, Ordering::WithPrevious);
            assert_eq!(pair[0].id.target_mbs(), pair[1].id.target_mbs());
        }
    }

    #[test]
    fn test_prep_carries_io_size_and_report_output() {
        let config = WorkloadConfig::default().result_dir(PathBuf::from("/results"));
        let device = zoned_device();
        let plan = PhasePlanner::new(&config, &device).plan();

        assert_eq!(
            plan.phases[0].kind,
            PhaseKind::Prep {
                io_size_kb: 104_000_000,
                output: PathBuf::from("/results/fio_zone_mixed_args.log"),
            }
        );
    }

    #[test]
    fn test_write_phase_settings() {
        let config = WorkloadConfig::default();
        let device = zoned_device();
        let plan = PhasePlanner::new(&config, &device).plan();

        let write = plan
            .phases
            .iter()
            .find(|p| p.id == PhaseId::Write(300))
            .unwrap();
        match &write.kind {
            PhaseKind::RateLimitedWrite {
                rate_mbs,
                block_size,
                runtime,
            } => {
                assert_eq!(*rate_mbs, 300);
                assert_eq!(block_size.to_string(), "64k");
                assert_eq!(runtime.as_secs(), 180);
            }
            other => panic!("Unexpected kind {other:?}"),
        }
        assert_eq!(write.iolog, None);
        assert_eq!(write.numjobs, None);
    }

    #[test]
    fn test_instrumentation_is_attached_when_enabled() {
        let mut config = WorkloadConfig::default().result_dir(PathBuf::from("/results"));
        config
            .apply_overrides(["write_iolog=1", "numjobs=2"])
            .unwrap();
        let device = zoned_device();
        let plan = PhasePlanner::new(&config, &device).plan();

        assert_eq!(plan.phases[0].iolog, None);
        assert_eq!(plan.phases[0].numjobs, None);
        assert_eq!(
            plan.phases[1].iolog,
            Some(PathBuf::from("/results/write_iolog_0r.txt"))
        );
        assert_eq!(
            plan.phases[2].iolog,
            Some(PathBuf::from("/results/write_iolog_25w.txt"))
        );
        assert_eq!(
            plan.phases[3].iolog,
            Some(PathBuf::from("/results/write_iolog_25r.txt"))
        );
        assert!(plan.phases[1..].iter().all(|p| p.numjobs == Some(2)));
    }

    #[test]
    fn test_custom_rate_steps() {
        let config = WorkloadConfig::default();
        let device = zoned_device();
        let plan = PhasePlanner::new(&config, &device)
            .with_rate_steps(&[10])
            .unwrap()
            .plan();
        assert_eq!(plan.phases.len(), 4);

        let plan = PhasePlanner::new(&config, &device)
            .with_rate_steps(&[])
            .unwrap()
            .plan();
        assert_eq!(plan.phases.len(), 2);
    }

    #[test]
    fn test_should_reject_ambiguous_rate_steps() {
        let config = WorkloadConfig::default();
        let device = zoned_device();

        assert_eq!(
            PhasePlanner::new(&config, &device)
                .with_rate_steps(&[0, 25])
                .err(),
            Some(PlanError::ZeroRateStep)
        );
        assert_eq!(
            PhasePlanner::new(&config, &device)
                .with_rate_steps(&[25, 50, 25])
                .err(),
            Some(PlanError::DuplicateRateStep(25))
        );
    }

    #[test]
    fn test_catalog_rejects_hand_built_collisions() {
        let config = WorkloadConfig::default();
        let device = zoned_device();
        let mut plan = PhasePlanner::new(&config, &device).plan();
        let baseline = plan.phases[1].clone();
        plan.phases.push(baseline);

        let err = plan.catalog().unwrap_err();
        assert_eq!(err.name, "mix_0_r");
    }

    #[test]
    fn test_catalog_matches_plan() {
        let config = WorkloadConfig::default();
        let device = zoned_device();
        let plan = PhasePlanner::new(&config, &device).plan();
        let catalog = plan.catalog().unwrap();

        assert_eq!(catalog.len(), 34);
        assert_eq!(catalog.resolve("mix_700_r").unwrap(), PhaseId::Read(700));
    }
}
