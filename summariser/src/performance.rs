//! Extraction of [PerformanceRecord]s from load-test JSON summaries.
//!
//! The load-test tool writes a summary document with a `metrics` object. Each metric holds a
//! `values` object of named statistics, for example:
//!
//! ```json
//! { "metrics": { "http_reqs": { "values": { "count": 1000, "rate": 123.456 } } } }
//! ```

use crate::analyze::round2;
use gateway_bench_summary_model::{LatencyStats, PerformanceRecord, TtfbStats};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const HTTP_REQ_DURATION: &str = "http_req_duration";
const HTTP_REQ_WAITING: &str = "http_req_waiting";
const HTTP_REQS: &str = "http_reqs";
const SUCCESS_RATE: &str = "success_rate";
const ERROR_COUNT: &str = "error_count";

/// An error type for [parse_load_test_summary].
#[derive(Debug, thiserror::Error)]
pub enum PerformanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serde JSON error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct LoadTestSummary {
    #[serde(default)]
    metrics: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MetricValues {
    values: HashMap<String, serde_json::Value>,
}

impl MetricValues {
    /// The named statistic, or zero when the load-test tool did not report it.
    ///
    /// Only statistics that are read must be numbers, anything else in `values` is ignored.
    fn stat(&self, name: &str) -> Result<f64, serde_json::Error> {
        self.values
            .get(name)
            .map(f64::deserialize)
            .transpose()
            .map(Option::unwrap_or_default)
    }
}

impl LoadTestSummary {
    /// Look up a metric family; only families that are read get validated.
    fn family(&self, name: &str) -> Result<Option<MetricValues>, serde_json::Error> {
        self.metrics
            .get(name)
            .map(MetricValues::deserialize)
            .transpose()
    }

    fn into_record(self) -> Result<PerformanceRecord, serde_json::Error> {
        let mut record = PerformanceRecord::default();

        if let Some(duration) = self.family(HTTP_REQ_DURATION)? {
            record.latency = Some(LatencyStats {
                avg: round2(duration.stat("avg")?),
                p50: round2(duration.stat("med")?),
                p90: round2(duration.stat("p(90)")?),
                p95: round2(duration.stat("p(95)")?),
                p99: round2(duration.stat("p(99)")?),
                min: round2(duration.stat("min")?),
                max: round2(duration.stat("max")?),
            });
        }

        if let Some(waiting) = self.family(HTTP_REQ_WAITING)? {
            record.ttfb = Some(TtfbStats {
                avg: round2(waiting.stat("avg")?),
                p50: round2(waiting.stat("med")?),
                p95: round2(waiting.stat("p(95)")?),
                p99: round2(waiting.stat("p(99)")?),
            });
        }

        if let Some(reqs) = self.family(HTTP_REQS)? {
            record.rps = Some(round2(reqs.stat("rate")?));
            record.total_requests = Some(reqs.stat("count")? as u64);
        }

        if let Some(success) = self.family(SUCCESS_RATE)? {
            record.success_rate = Some(round2(success.stat("rate")? * 100.0));
        }

        if let Some(errors) = self.family(ERROR_COUNT)? {
            record.error_count = Some(errors.stat("count")? as u64);
        }

        Ok(record)
    }
}

/// Parse a load-test summary file into a [PerformanceRecord].
///
/// Metric families that are not in the file are left out of the record. A missing file or
/// invalid JSON is an error.
pub fn parse_load_test_summary(path: &Path) -> Result<PerformanceRecord, PerformanceError> {
    log::debug!("Parsing load-test summary: {}", path.display());
    let file = std::fs::File::open(path)?;
    read_load_test_summary(file)
}

/// Parse a load-test summary from the given reader.
pub fn read_load_test_summary<R: Read>(reader: R) -> Result<PerformanceRecord, PerformanceError> {
    let summary: LoadTestSummary = serde_json::from_reader(std::io::BufReader::new(reader))?;
    log::trace!("Load-test summary has {} metrics", summary.metrics.len());
    Ok(summary.into_record()?)
}
