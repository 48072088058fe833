use clap::error::ErrorKind;
use clap::Parser as _;

mod cli;

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = match cli::CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            println!("{}", cli::usage());
            std::process::exit(cli::USAGE_EXIT_CODE);
        }
        Err(e) => e.exit(),
    };
    log::info!("{CRATE_NAME} {CRATE_VERSION}");

    gateway_bench_summariser::run(&args.results_dir, &mut std::io::stdout().lock())?;

    Ok(())
}
