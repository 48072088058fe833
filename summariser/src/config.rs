use std::path::{Path, PathBuf};

/// A service implementation under comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    /// Name of the variant's subdirectory in the results directory
    pub id: &'static str,
    /// Column header used in the report
    pub label: &'static str,
}

/// The variants to summarise, in report column order
pub const VARIANTS: &[Variant] = &[
    Variant {
        id: "go",
        label: "Go",
    },
    Variant {
        id: "node",
        label: "Node.js",
    },
    Variant {
        id: "next",
        label: "Next.js",
    },
];

/// The load-test scenarios to summarise, in report order
pub const SCENARIOS: &[&str] = &[
    "s01", "s02", "s03", "s04", "s05", "s06", "s07", "s08", "s09", "s10",
];

/// Suffix of the load-test summary file, prefixed with the scenario id
const PERFORMANCE_FILE_SUFFIX: &str = "-summary.json";
/// Suffix of the resource usage file, prefixed with the scenario id
const RESOURCES_FILE_SUFFIX: &str = "-resources.csv";

/// Name of the summary file written to the results directory
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// Path of the load-test summary for a scenario, e.g. `go/s01-summary.json`
pub fn performance_file(variant_dir: &Path, scenario: &str) -> PathBuf {
    variant_dir.join(format!("{scenario}{PERFORMANCE_FILE_SUFFIX}"))
}

/// Path of the resource usage samples for a scenario, e.g. `go/s01-resources.csv`
pub fn resources_file(variant_dir: &Path, scenario: &str) -> PathBuf {
    variant_dir.join(format!("{scenario}{RESOURCES_FILE_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenarios_are_numbered_one_to_ten() {
        let expected = (1..=10).map(|i| format!("s{i:02}")).collect::<Vec<_>>();
        assert_eq!(expected, SCENARIOS);
    }

    #[test]
    fn file_names_follow_scenario_convention() {
        let dir = Path::new("results").join("go");

        assert_eq!(
            Path::new("results/go/s03-summary.json"),
            performance_file(&dir, "s03")
        );
        assert_eq!(
            Path::new("results/go/s03-resources.csv"),
            resources_file(&dir, "s03")
        );
    }
}
