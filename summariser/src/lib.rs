//! Reduces the engine report of a zoned mixed workload run to a latency table.
//!
//! The report is read from `<result_dir>/<job_name>.log`, every read job becomes a
//! [`ResultRow`] and the rows are written to `<result_dir>/<job_name>.csv`.

#[macro_use]
extern crate log;

use anyhow::Context;
use std::path::{Path, PathBuf};
use zone_mixed_report_model::load_report_from_file;
use zone_mixed_workload::prelude::WorkloadConfig;

mod aggregator;
mod console;
mod model;
mod table;

pub use aggregator::{AggregateError, Report, ReportAggregator};
pub use console::render_result_table;
pub use model::{ResultRow, PERCENTILE_COUNT};
pub use table::CsvTableWriter;

/// The outcome of summarising one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOutput {
    /// Where the table was written.
    pub table_path: PathBuf,
    pub rows: Vec<ResultRow>,
}

/// Summarise the run described by `config`, reading and writing the default locations.
pub fn summarise(config: &WorkloadConfig) -> anyhow::Result<SummaryOutput> {
    summarise_paths(&config.report_path(), &config.table_path())
}

/// Summarise the report at `report_path` into a table at `table_path`.
pub fn summarise_paths(report_path: &Path, table_path: &Path) -> anyhow::Result<SummaryOutput> {
    debug!("Loading report from {}", report_path.display());
    let report = load_report_from_file(report_path)
        .with_context(|| format!("Failed to load report {}", report_path.display()))?;

    let rows = ReportAggregator::default()
        .aggregate(&report)
        .with_context(|| format!("Failed to aggregate report {}", report_path.display()))?;

    let mut writer = CsvTableWriter::from_file(table_path)
        .with_context(|| format!("Failed to create {}", table_path.display()))?;
    for row in &rows {
        writer
            .report(row)
            .with_context(|| format!("Failed to write {}", table_path.display()))?;
    }
    writer
        .finish()
        .with_context(|| format!("Failed to write {}", table_path.display()))?;

    info!("Output written to: {}", table_path.display());

    Ok(SummaryOutput {
        table_path: table_path.to_path_buf(),
        rows,
    })
}
