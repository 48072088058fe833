//! Summarise LLM gateway benchmark results.
//!
//! A results directory holds one subdirectory per gateway variant, each with a load-test summary
//! (`<scenario>-summary.json`) and resource usage samples (`<scenario>-resources.csv`) per
//! scenario. [run] parses whatever is present, prints a comparison table per scenario and writes
//! everything to `summary.json` in the results directory.

use std::io::Write;
use std::path::{Path, PathBuf};

mod analyze;
pub mod collect;
pub mod config;
pub mod performance;
pub mod report;
pub mod resources;

pub use collect::{collect_summary, SummariseError};

/// Summarise the results directory, printing the report to `out`.
///
/// Returns the path of the written summary file. Nothing is written if any result file is
/// malformed.
pub fn run<W: Write>(results_dir: &Path, out: &mut W) -> anyhow::Result<PathBuf> {
    log::info!("Summarising results in {}", results_dir.display());

    let summary = collect_summary(results_dir)?;
    report::print_report(&summary, out)?;
    let path = report::write_summary(&summary, results_dir)?;

    writeln!(out, "\nFull summary saved to: {}", path.display())?;
    log::info!("Summary written to {}", path.display());

    Ok(path)
}
