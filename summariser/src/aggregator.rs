mod report;

use zone_mixed_report_model::{percentile_key, EngineReport, ReportJob};
use zone_mixed_workload::prelude::{PhaseCatalog, PhaseId, UnknownPhaseError, PERCENTILE_LADDER};

pub use self::report::Report;
use crate::model::{ResultRow, PERCENTILE_COUNT};

/// Errors raised while reducing a report to rows.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    #[error(transparent)]
    UnknownPhase(#[from] UnknownPhaseError),
    #[error("Job `{job}` is missing metric `{metric}`")]
    MissingMetric { job: String, metric: String },
    #[error("Job `{job}` failed in the engine with error {error}")]
    JobFailed { job: String, error: i64 },
}

/// Reduces an [`EngineReport`] to one [`ResultRow`] per read job.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    catalog: PhaseCatalog,
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new(PhaseCatalog::standard())
    }
}

/// State carried across the report while folding it into rows.
#[derive(Default)]
struct Correlation {
    /// Achieved average of the most recent write job, in MiB/s.
    write_avg_mbs: u64,
    rows: Vec<ResultRow>,
}

impl ReportAggregator {
    /// Create an aggregator that resolves job names through `catalog`.
    pub fn new(catalog: PhaseCatalog) -> Self {
        Self { catalog }
    }

    /// Fold the jobs in report order.
    ///
    /// Report order mirrors phase emission order, so every read job is paired with the write
    /// average of the write job that ran before it.
    pub fn aggregate(&self, report: &EngineReport) -> Result<Vec<ResultRow>, AggregateError> {
        let correlation = report
            .jobs
            .iter()
            .try_fold(Correlation::default(), |state, job| self.correlate(state, job))?;

        info!(
            "Aggregated {} read jobs from {} report jobs",
            correlation.rows.len(),
            report.jobs.len()
        );

        Ok(correlation.rows)
    }

    fn correlate(
        &self,
        mut state: Correlation,
        job: &ReportJob,
    ) -> Result<Correlation, AggregateError> {
        let id = self.catalog.resolve(&job.name)?;
        if job.error != 0 {
            return Err(AggregateError::JobFailed {
                job: job.name.clone(),
                error: job.error,
            });
        }

        match id {
            PhaseId::Prep => {
                debug!("Skipping preparation job '{}'", job.name);
            }
            PhaseId::Write(target) => {
                state.write_avg_mbs = achieved_write_mbs(job)?;
                debug!(
                    "Write job '{}' achieved {} MiB/s against {target} MB/s",
                    job.name, state.write_avg_mbs
                );
            }
            id @ (PhaseId::Baseline | PhaseId::Read(_)) => {
                state.rows.push(read_row(id, job, state.write_avg_mbs)?);
            }
        }
        Ok(state)
    }
}

fn missing(job: &ReportJob, metric: &str) -> AggregateError {
    AggregateError::MissingMetric {
        job: job.name.clone(),
        metric: metric.to_string(),
    }
}

/// Mean write bandwidth, KiB/s truncated to whole MiB/s.
fn achieved_write_mbs(job: &ReportJob) -> Result<u64, AggregateError> {
    let bw_mean = job
        .write
        .bw_mean
        .ok_or_else(|| missing(job, "write.bw_mean"))?;
    Ok((bw_mean as u64) / 1024)
}

fn read_row(id: PhaseId, job: &ReportJob, write_avg_mbs: u64) -> Result<ResultRow, AggregateError> {
    let lat = job
        .read
        .lat_ns
        .as_ref()
        .ok_or_else(|| missing(job, "read.lat_ns.mean"))?;
    let bw = job.read.bw.ok_or_else(|| missing(job, "read.bw"))?;
    let clat = job
        .read
        .clat_ns
        .as_ref()
        .ok_or_else(|| missing(job, "read.clat_ns.percentile"))?;

    let mut clat_percentiles_us = [0u64; PERCENTILE_COUNT];
    for (slot, percentile) in clat_percentiles_us.iter_mut().zip(PERCENTILE_LADDER) {
        let ns = clat.percentile(percentile).ok_or_else(|| {
            missing(
                job,
                &format!("read.clat_ns.percentile.{}", percentile_key(percentile)),
            )
        })?;
        *slot = ns / 1000;
    }

    let write_target_mbs = id.target_mbs();
    let read_lat_measured_us = lat.mean / 1000.0;
    // the baseline runs before any write, it never represents a rate step
    let matched = id != PhaseId::Baseline && u64::from(write_target_mbs) == write_avg_mbs;

    Ok(ResultRow {
        write_target_mbs,
        read_lat_reported_us: matched.then_some(read_lat_measured_us),
        write_avg_mbs,
        read_lat_measured_us,
        read_avg_mbs: bw.trunc() / 1000.0,
        clat_percentiles_us,
    })
}
