use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use gateway_bench_summariser::config::VARIANTS;

/// Exit code for a missing results directory argument
pub const USAGE_EXIT_CODE: i32 = 2;

#[derive(Parser)]
#[command(name = "gateway-bench-summariser", about, long_about = None)]
pub struct CliArgs {
    /// Directory holding one subdirectory of results per gateway variant.
    pub results_dir: PathBuf,

    /// Anything after the results directory is accepted and ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub ignored: Vec<String>,
}

/// Short usage message, shown when the results directory is not given.
pub fn usage() -> String {
    let dirs = VARIANTS
        .iter()
        .map(|v| format!("{}/", v.id))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{}\n  results_dir should contain {dirs} subdirectories",
        CliArgs::command().render_usage()
    )
}
