use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::model::{format_latency, ResultRow};

#[derive(Tabled)]
struct ConsoleRow {
    #[tabled(rename = "target MB/s")]
    target: u32,
    #[tabled(rename = "reported us", display = "optional_latency")]
    reported: Option<f64>,
    #[tabled(rename = "write avg MiB/s")]
    write_avg: u64,
    #[tabled(rename = "measured us", display = "latency")]
    measured: f64,
    #[tabled(rename = "read MB/s", display = "float3")]
    read_avg: f64,
    #[tabled(rename = "p50 us")]
    p50: u64,
    #[tabled(rename = "p99 us")]
    p99: u64,
    #[tabled(rename = "p99.9 us")]
    p99_9: u64,
    #[tabled(rename = "max us")]
    max: u64,
}

fn latency(n: &f64) -> String {
    format_latency(*n)
}

fn optional_latency(n: &Option<f64>) -> String {
    n.map(format_latency).unwrap_or_else(|| "-".to_string())
}

fn float3(n: &f64) -> String {
    format!("{:.3}", n)
}

impl From<&ResultRow> for ConsoleRow {
    fn from(row: &ResultRow) -> Self {
        let percentile = |p| row.clat_percentile_us(p).unwrap_or_default();
        Self {
            target: row.write_target_mbs,
            reported: row.read_lat_reported_us,
            write_avg: row.write_avg_mbs,
            measured: row.read_lat_measured_us,
            read_avg: row.read_avg_mbs,
            p50: percentile(50.0),
            p99: percentile(99.0),
            p99_9: percentile(99.9),
            max: percentile(100.0),
        }
    }
}

/// Render a condensed view of the rows for the terminal.
pub fn render_result_table(rows: &[ResultRow]) -> String {
    let mut table = Table::new(rows.iter().map(ConsoleRow::from));
    table.with(Style::modern());
    table.to_string()
}
