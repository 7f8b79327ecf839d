use itertools::Itertools;
use zone_mixed_workload::prelude::PERCENTILE_LADDER;

/// Number of completion-latency percentiles per row.
pub const PERCENTILE_COUNT: usize = PERCENTILE_LADDER.len();

/// One aggregated row: a read phase correlated with the write rate achieved before it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// The nominal write rate of the step, 0 for the baseline read.
    pub write_target_mbs: u32,
    /// Measured mean read latency, only set when the achieved write rate matched the target.
    pub read_lat_reported_us: Option<f64>,
    /// Most recent achieved write average, in MiB/s.
    pub write_avg_mbs: u64,
    /// Mean read latency in microseconds.
    pub read_lat_measured_us: f64,
    /// Read throughput in MB/s.
    pub read_avg_mbs: f64,
    /// Completion latency in whole microseconds, one per [`PERCENTILE_LADDER`] entry.
    pub clat_percentiles_us: [u64; PERCENTILE_COUNT],
}

impl ResultRow {
    /// Column names, in the order [`ResultRow::to_record`] produces values.
    pub fn header() -> Vec<String> {
        let mut header = vec![
            "write_avg_mbs_target".to_string(),
            "read_lat_avg_us".to_string(),
            "write_avg_mbs".to_string(),
            "read_lat_avg_us_measured".to_string(),
            "read_avg_mbs".to_string(),
        ];
        header.extend(PERCENTILE_LADDER.iter().map(|p| {
            if *p >= 100.0 {
                "clat_max_us".to_string()
            } else {
                format!("clat_p{p}_us")
            }
        }));
        header
    }

    pub fn to_record(&self) -> Vec<String> {
        let mut record = vec![
            self.write_target_mbs.to_string(),
            self.read_lat_reported_us
                .map(format_latency)
                .unwrap_or_default(),
            self.write_avg_mbs.to_string(),
            format_latency(self.read_lat_measured_us),
            format_decimal(self.read_avg_mbs),
        ];
        record.extend(
            self.clat_percentiles_us
                .iter()
                .map(|us| format_decimal(*us as f64)),
        );
        record
    }

    /// Percentile value for a ladder entry, e.g. `99.9`.
    pub fn clat_percentile_us(&self, percentile: f64) -> Option<u64> {
        PERCENTILE_LADDER
            .iter()
            .position(|p| *p == percentile)
            .map(|i| self.clat_percentiles_us[i])
    }
}

/// Mean latencies are reported with three decimals.
pub(crate) fn format_latency(us: f64) -> String {
    format_decimal(us)
}

/// Every fractional column of the table carries three decimals, so `0` reads `0.000`.
fn format_decimal(value: f64) -> String {
    format!("{value:.3}")
}

/// Join a record into a comma delimited line.
pub(crate) fn to_line(record: &[String]) -> String {
    record.iter().join(",")
}
