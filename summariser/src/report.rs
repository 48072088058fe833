use crate::config::{SCENARIOS, SUMMARY_FILE_NAME, VARIANTS};
use anyhow::Context;
use gateway_bench_summary_model::{store_summary, Entry, ResourceStats, Summary};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style, Width};
use tabled::Table;

/// Shown in place of a value that is missing for a variant
const PLACEHOLDER: &str = "-";

const BANNER_WIDTH: usize = 100;
/// Minimum width of the metric name column
const METRIC_COLUMN_WIDTH: usize = 25;
/// Minimum width of each variant column
const VARIANT_COLUMN_WIDTH: usize = 15;

/// A value shown in a report cell, displayed the way it appears in `summary.json`
#[derive(Debug, Clone, Copy, PartialEq)]
enum MetricValue {
    Real(f64),
    Count(u64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole reals keep a decimal so they read as reals
            MetricValue::Real(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            MetricValue::Real(v) => write!(f, "{v}"),
            MetricValue::Count(v) => write!(f, "{v}"),
        }
    }
}

struct ReportMetric {
    name: &'static str,
    value: fn(&Entry) -> Option<MetricValue>,
}

fn resource_stats(entry: &Entry) -> Option<&ResourceStats> {
    entry.resources.as_ref().and_then(|r| r.stats.as_ref())
}

/// The rows of each scenario table, in order
const METRICS: [ReportMetric; 12] = [
    ReportMetric {
        name: "RPS",
        value: |e| e.performance.as_ref()?.rps.map(MetricValue::Real),
    },
    ReportMetric {
        name: "Avg Latency (ms)",
        value: |e| Some(MetricValue::Real(e.performance.as_ref()?.latency?.avg)),
    },
    ReportMetric {
        name: "P50 Latency (ms)",
        value: |e| Some(MetricValue::Real(e.performance.as_ref()?.latency?.p50)),
    },
    ReportMetric {
        name: "P95 Latency (ms)",
        value: |e| Some(MetricValue::Real(e.performance.as_ref()?.latency?.p95)),
    },
    ReportMetric {
        name: "P99 Latency (ms)",
        value: |e| Some(MetricValue::Real(e.performance.as_ref()?.latency?.p99)),
    },
    ReportMetric {
        name: "Success Rate (%)",
        value: |e| e.performance.as_ref()?.success_rate.map(MetricValue::Real),
    },
    ReportMetric {
        name: "Avg CPU (%)",
        value: |e| Some(MetricValue::Real(resource_stats(e)?.cpu.avg)),
    },
    ReportMetric {
        name: "Max CPU (%)",
        value: |e| Some(MetricValue::Real(resource_stats(e)?.cpu.max)),
    },
    ReportMetric {
        name: "Avg Mem (MB)",
        value: |e| Some(MetricValue::Real(resource_stats(e)?.memory_mb.avg)),
    },
    ReportMetric {
        name: "Max Mem (MB)",
        value: |e| Some(MetricValue::Real(resource_stats(e)?.memory_mb.max)),
    },
    ReportMetric {
        name: "Mem Growth (MB)",
        value: |e| Some(MetricValue::Real(resource_stats(e)?.memory_mb.growth)),
    },
    ReportMetric {
        name: "Max FD Count",
        value: |e| Some(MetricValue::Count(resource_stats(e)?.fd_count.max)),
    },
];

/// Print a comparison table for every scenario that has data for at least one variant.
pub fn print_report<W: Write>(summary: &Summary, out: &mut W) -> std::io::Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "LLM GATEWAY BENCHMARK RESULTS")?;
    writeln!(out, "{rule}")?;

    for scenario in SCENARIOS {
        if !summary.has_scenario(scenario) {
            log::debug!("No data for scenario {scenario}, not reporting it");
            continue;
        }

        writeln!(out, "\n--- {} ---", scenario.to_uppercase())?;
        writeln!(out, "{}", scenario_table(summary, scenario))?;
    }

    Ok(())
}

/// Build the table for one scenario, one column per configured variant.
fn scenario_table(summary: &Summary, scenario: &str) -> Table {
    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("Metric")
            .chain(VARIANTS.iter().map(|v| v.label))
            .map(String::from),
    );

    for metric in &METRICS {
        let mut row = vec![metric.name.to_string()];
        row.extend(VARIANTS.iter().map(|variant| {
            summary
                .entry(variant.id, scenario)
                .and_then(metric.value)
                .map(|value| value.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        }));
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::modern())
        .modify(Columns::first(), Width::increase(METRIC_COLUMN_WIDTH))
        .modify(Columns::new(1..), Width::increase(VARIANT_COLUMN_WIDTH))
        .modify(Columns::new(1..), Alignment::right());
    table
}

/// Write the summary to `summary.json` in the results directory and return its path.
///
/// The summary is written to a temporary file first so an existing `summary.json` is only
/// replaced by a complete one. The file gets the same permissions as any newly created file,
/// subject to the process umask.
pub fn write_summary(summary: &Summary, results_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = results_dir.join(SUMMARY_FILE_NAME);
    log::debug!("Writing summary to {}", path.display());

    let mut builder = tempfile::Builder::new();
    builder.prefix(".summary").suffix(".json");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut file = builder
        .tempfile_in(results_dir)
        .context("Failed to create temporary summary file")?;
    store_summary(summary, &mut file).context("Failed to serialize summary")?;
    file.persist(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}
