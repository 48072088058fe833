use crate::analyze::resource_stats;
use gateway_bench_summary_model::{ResourceRecord, ResourceSample};
use std::io::Read;
use std::path::Path;

/// An error type for [parse_resource_usage].
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Parse a resource usage CSV file and aggregate its samples into a [ResourceRecord].
///
/// A file with a header but no rows gives an empty record.
pub fn parse_resource_usage(path: &Path) -> Result<ResourceRecord, ResourceError> {
    log::debug!("Parsing resource usage: {}", path.display());
    let file = std::fs::File::open(path)?;
    let samples = read_resource_samples(file)?;

    Ok(match resource_stats(&samples) {
        Some(stats) => ResourceRecord::new(stats),
        None => {
            log::debug!("No resource samples in {}", path.display());
            ResourceRecord::default()
        }
    })
}

/// Read [ResourceSample]s from CSV with a header row.
///
/// Columns are matched by header name, extra columns are ignored.
pub fn read_resource_samples<R: Read>(reader: R) -> Result<Vec<ResourceSample>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let samples = csv_reader
        .deserialize()
        .collect::<Result<Vec<ResourceSample>, _>>()?;
    log::trace!("Read {} resource samples", samples.len());

    Ok(samples)
}
