use crate::config::{performance_file, resources_file, SCENARIOS, VARIANTS};
use crate::performance::parse_load_test_summary;
use crate::resources::parse_resource_usage;
use anyhow::Context;
use gateway_bench_summary_model::{Entry, ScenarioResults, Summary};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SummariseError {
    #[error("Results directory not found: {}", .0.display())]
    ResultsDirNotFound(PathBuf),
}

/// Build the [Summary] for a results directory.
///
/// Walks the configured variants and scenarios. Variant directories and result files that do not
/// exist are skipped, but a result file that exists and cannot be parsed fails the whole
/// collection.
pub fn collect_summary(results_dir: &Path) -> anyhow::Result<Summary> {
    if !results_dir.is_dir() {
        return Err(SummariseError::ResultsDirNotFound(results_dir.to_path_buf()).into());
    }

    let mut summary = Summary::new();
    for variant in VARIANTS {
        let variant_dir = results_dir.join(variant.id);
        if !variant_dir.exists() {
            log::debug!(
                "Skipping variant {}, no directory at {}",
                variant.id,
                variant_dir.display()
            );
            continue;
        }

        let mut results = ScenarioResults::new();
        for scenario in SCENARIOS {
            let entry = collect_entry(&variant_dir, scenario)
                .with_context(|| format!("Collecting {} results for {scenario}", variant.id))?;
            if !entry.is_empty() {
                results.insert(*scenario, entry);
            }
        }

        log::info!(
            "Collected {} scenarios for variant {}",
            results.len(),
            variant.id
        );
        summary.add_variant(variant.id, results);
    }

    Ok(summary)
}

/// Collect whichever result files exist for one scenario of a variant.
fn collect_entry(variant_dir: &Path, scenario: &str) -> anyhow::Result<Entry> {
    let mut entry = Entry::default();

    let performance_path = performance_file(variant_dir, scenario);
    if performance_path.exists() {
        entry.performance = Some(
            parse_load_test_summary(&performance_path)
                .with_context(|| format!("Failed to parse {}", performance_path.display()))?,
        );
    } else {
        log::debug!("No load-test summary at {}", performance_path.display());
    }

    let resources_path = resources_file(variant_dir, scenario);
    if resources_path.exists() {
        entry.resources = Some(
            parse_resource_usage(&resources_path)
                .with_context(|| format!("Failed to parse {}", resources_path.display()))?,
        );
    } else {
        log::debug!("No resource usage at {}", resources_path.display());
    }

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SUMMARY_JSON: &str = r#"{"metrics": {"http_reqs": {"values": {"rate": 10.0, "count": 50}}}}"#;
    const RESOURCES_CSV: &str = "timestamp,cpu_percent,rss_mb,fd_count,threads\n1,1.0,10.0,3,2\n";

    #[test]
    fn test_should_fail_on_missing_results_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = collect_summary(&missing).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SummariseError>(),
            Some(SummariseError::ResultsDirNotFound(path)) if *path == missing
        ));
    }

    #[test]
    fn test_should_collect_entry_with_both_parts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("s04-summary.json"), SUMMARY_JSON).unwrap();
        fs::write(dir.path().join("s04-resources.csv"), RESOURCES_CSV).unwrap();

        let entry = collect_entry(dir.path(), "s04").unwrap();

        assert_eq!(Some(10.0), entry.performance.and_then(|p| p.rps));
        assert_eq!(
            Some(1),
            entry.resources.and_then(|r| r.stats).map(|s| s.samples)
        );
    }

    #[test]
    fn test_should_give_empty_entry_when_no_files() {
        let dir = tempfile::tempdir().unwrap();

        let entry = collect_entry(dir.path(), "s04").unwrap();

        assert!(entry.is_empty());
    }

    #[test]
    fn test_should_skip_missing_variants_and_scenarios() {
        let dir = tempfile::tempdir().unwrap();
        let next = dir.path().join("next");
        fs::create_dir(&next).unwrap();
        fs::create_dir(dir.path().join("go")).unwrap();
        fs::write(next.join("s07-resources.csv"), RESOURCES_CSV).unwrap();

        let summary = collect_summary(dir.path()).unwrap();

        assert_eq!(
            vec!["go", "next"],
            summary.variants().map(|(id, _)| id).collect::<Vec<_>>()
        );
        assert!(summary.variant("go").unwrap().is_empty());
        assert_eq!(
            vec!["s07"],
            summary.variant("next").unwrap().keys().collect::<Vec<_>>()
        );
        assert!(summary.entry("next", "s07").unwrap().performance.is_none());
    }

    #[test]
    fn test_should_propagate_malformed_file_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let node = dir.path().join("node");
        fs::create_dir(&node).unwrap();
        fs::write(node.join("s02-summary.json"), "not json").unwrap();

        let err = collect_summary(dir.path()).unwrap_err();
        let message = format!("{err:#}");

        assert!(message.contains("node"), "{message}");
        assert!(message.contains("s02-summary.json"), "{message}");
    }
}
