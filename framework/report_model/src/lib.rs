use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// The engine's JSON report (`--output-format=json`)
///
/// Only the fields the aggregation needs are modelled, everything else in the document is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineReport {
    /// Version string of the engine that produced the report
    #[serde(rename = "fio version", default)]
    pub engine_version: Option<String>,
    /// One record per job, in the order the jobs were defined
    pub jobs: Vec<ReportJob>,
}

/// A single job record
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReportJob {
    /// The job name, as given by `--name`
    #[serde(rename = "jobname")]
    pub name: String,
    /// Non-zero if the job failed
    #[serde(default)]
    pub error: i64,
    #[serde(default)]
    pub read: DirectionStats,
    #[serde(default)]
    pub write: DirectionStats,
}

/// Statistics for one I/O direction of a job
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DirectionStats {
    /// Bandwidth in KiB/s
    pub bw: Option<f64>,
    /// Mean of the sampled bandwidth in KiB/s
    pub bw_mean: Option<f64>,
    /// Total latency, submission to completion
    pub lat_ns: Option<LatencyStats>,
    /// Completion latency, carries the percentiles
    pub clat_ns: Option<LatencyStats>,
}

/// Latency statistics in nanoseconds
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LatencyStats {
    #[serde(default)]
    pub mean: f64,
    /// Percentile to latency, keyed as the engine formats them, e.g. `"99.990000"`
    #[serde(default)]
    pub percentile: BTreeMap<String, u64>,
}

impl LatencyStats {
    /// Look up a percentile by value, e.g. `99.99`
    pub fn percentile(&self, percentile: f64) -> Option<u64> {
        self.percentile.get(&percentile_key(percentile)).copied()
    }
}

/// Format a percentile the way the engine keys its percentile map
pub fn percentile_key(percentile: f64) -> String {
    format!("{percentile:.6}")
}

/// Failure to load an [`EngineReport`]
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to read report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed report: {0}")]
    Format(#[from] serde_json::Error),
}

/// Load a report from a reader
pub fn load_report<R: Read>(reader: R) -> Result<EngineReport, ReportError> {
    let reader = std::io::BufReader::new(reader);
    let report: EngineReport = serde_json::from_reader(reader)?;
    log::debug!("Loaded report with {} jobs", report.jobs.len());
    Ok(report)
}

/// Load a report from a file
pub fn load_report_from_file<P: AsRef<Path>>(path: P) -> Result<EngineReport, ReportError> {
    let file = std::fs::File::open(path)?;
    load_report(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REPORT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/report.json");

    #[test]
    fn test_should_load_report_from_file() {
        let report = load_report_from_file(REPORT_PATH).unwrap();

        assert_eq!(report.engine_version.as_deref(), Some("fio-3.36"));
        let names = report.jobs.iter().map(|j| j.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["prep", "mix_0_r", "mix_25_w", "mix_25_r"]);
    }

    #[test]
    fn test_should_read_direction_stats() {
        let report = load_report_from_file(REPORT_PATH).unwrap();

        let write = &report.jobs[2].write;
        assert_eq!(write.bw_mean, Some(25605.12));

        let read = &report.jobs[3].read;
        assert_eq!(read.bw, Some(180224.0));
        assert_eq!(read.lat_ns.as_ref().unwrap().mean, 88123.456);
        let clat = read.clat_ns.as_ref().unwrap();
        assert_eq!(clat.percentile(1.0), Some(61440));
        assert_eq!(clat.percentile(99.99), Some(1105920));
        assert_eq!(clat.percentile(99.99999), Some(12345000));
        assert_eq!(clat.percentile(100.0), Some(13041664));
        assert_eq!(clat.percentile(42.0), None);
    }

    #[test]
    fn test_missing_direction_defaults_to_empty() {
        let report = load_report(
            r#"{"jobs": [{"jobname": "mix_25_w", "write": {"bw_mean": 1024.0}}]}"#.as_bytes(),
        )
        .unwrap();

        assert_eq!(report.jobs[0].read, DirectionStats::default());
        assert_eq!(report.jobs[0].write.bw_mean, Some(1024.0));
        assert_eq!(report.engine_version, None);
    }

    #[test]
    fn test_should_fail_without_jobs() {
        let err = load_report(r#"{"fio version": "fio-3.36"}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, ReportError::Format(_)));
        assert!(err.to_string().contains("jobs"));
    }

    #[test]
    fn test_should_fail_on_malformed_document() {
        let err = load_report("not json".as_bytes()).unwrap_err();
        assert!(matches!(err, ReportError::Format(_)));
    }

    #[test]
    fn test_should_fail_on_missing_file() {
        let err = load_report_from_file("/definitely/not/here.log").unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }

    #[test]
    fn test_percentile_key() {
        assert_eq!(percentile_key(5.0), "5.000000");
        assert_eq!(percentile_key(99.9999), "99.999900");
    }
}
