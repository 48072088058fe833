use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

mod ordered_map;

pub use ordered_map::OrderedMap;

/// Request latency statistics, in milliseconds
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LatencyStats {
    pub avg: f64,
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub min: f64,
    pub max: f64,
}

/// Time to first byte statistics, in milliseconds
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct TtfbStats {
    pub avg: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Performance figures extracted from a load-test summary
///
/// Every field is optional. A field is `None` when the metric it is derived from was not present
/// in the load-test output, and is then left out of the serialized form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PerformanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencyStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttfb: Option<TtfbStats>,
    /// Requests per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_requests: Option<u64>,
    /// Percentage of successful requests, 0 to 100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_count: Option<u64>,
}

/// A single resource usage sample, as recorded by the process monitor
///
/// Field names match the column names of the resources CSV.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResourceSample {
    /// Unix timestamp of the sample
    pub timestamp: i64,
    pub cpu_percent: f64,
    /// Resident set size in megabytes
    pub rss_mb: f64,
    pub fd_count: u64,
    pub threads: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CpuStats {
    pub avg: f64,
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MemoryStats {
    pub avg: f64,
    pub max: f64,
    pub min: f64,
    /// Difference between the last and the first sample
    pub growth: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FdStats {
    pub avg: u64,
    pub max: u64,
}

/// Aggregates over a non-empty sequence of [ResourceSample]s
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResourceStats {
    pub cpu: CpuStats,
    pub memory_mb: MemoryStats,
    pub fd_count: FdStats,
    /// The number of samples the aggregates were computed from
    pub samples: usize,
}

/// Resource usage for one variant and scenario
///
/// When the resources file contained no samples there is nothing to aggregate and the record
/// serializes as an empty object.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceRecord {
    #[serde(flatten)]
    pub stats: Option<ResourceStats>,
}

impl ResourceRecord {
    pub fn new(stats: ResourceStats) -> Self {
        Self { stats: Some(stats) }
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_none()
    }
}

/// Everything known about one variant running one scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRecord>,
}

impl Entry {
    /// True when neither a performance nor a resources file was found
    pub fn is_empty(&self) -> bool {
        self.performance.is_none() && self.resources.is_none()
    }
}

/// Scenario id to [Entry], in scenario order
pub type ScenarioResults = OrderedMap<Entry>;

/// Summary of a benchmark results directory
///
/// Maps each variant found on disk to its [ScenarioResults]. Variants keep the order they were
/// added in, which is the order they are configured in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Summary {
    variants: OrderedMap<ScenarioResults>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the results for a variant
    pub fn add_variant(&mut self, variant: impl Into<String>, results: ScenarioResults) {
        self.variants.insert(variant, results);
    }

    pub fn variant(&self, variant: &str) -> Option<&ScenarioResults> {
        self.variants.get(variant)
    }

    pub fn variants(&self) -> impl Iterator<Item = (&str, &ScenarioResults)> {
        self.variants.iter()
    }

    /// Look up the entry for a variant and scenario
    pub fn entry(&self, variant: &str, scenario: &str) -> Option<&Entry> {
        self.variant(variant).and_then(|results| results.get(scenario))
    }

    /// True if any variant has an entry for the scenario
    pub fn has_scenario(&self, scenario: &str) -> bool {
        self.variants
            .iter()
            .any(|(_, results)| results.contains_key(scenario))
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Serialize the summary to a writer
///
/// The output is pretty printed with two space indentation and has no trailing newline.
pub fn store_summary<W: Write>(summary: &Summary, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

/// Load a summary from a reader
pub fn load_summary<R: Read>(reader: R) -> anyhow::Result<Summary> {
    let reader = std::io::BufReader::new(reader);
    let summary: Summary = serde_json::from_reader(reader)?;
    Ok(summary)
}
