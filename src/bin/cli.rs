//! Evan archive CLI
//!
//! Mirrors one event of the Evan API into a static snapshot directory.

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use evan_archive::{error::Result, models::Config, pipeline};

/// evan-archive - Offline snapshot of an Evan conference program
#[derive(Parser, Debug)]
#[command(name = "evan-archive", version, about = "Mirror an Evan event into static JSON files")]
struct Cli {
    /// Root of the Evan REST API (e.g. https://evan.ugent.be/api/v1/)
    #[arg(value_name = "api_endpoint")]
    api_endpoint: String,

    /// Event code to archive
    #[arg(value_name = "event_code")]
    event_code: String,

    /// Directory the snapshot is written to
    #[arg(value_name = "output_dir")]
    output_dir: PathBuf,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Anything after the three positionals is accepted and ignored
    #[arg(hide = true)]
    extra: Vec<String>,
}

/// Parse arguments; usage errors exit with status 1 before any work starts.
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_args();
    init_logging(cli.verbose);
    if !cli.extra.is_empty() {
        log::debug!("Ignoring extra arguments: {:?}", cli.extra);
    }

    let config = match &cli.config {
        Some(path) => Config::load_or_default(path),
        None => Config::default(),
    };
    // The archiver only reads the crawler section
    config.crawler.validate()?;

    let report =
        pipeline::run_archive(&config, &cli.api_endpoint, &cli.event_code, &cli.output_dir)
            .await?;

    if report.failures() > 0 {
        log::warn!(
            "{} item(s) could not be archived; see errors above",
            report.failures()
        );
    }
    log::info!("Archive completed successfully.");

    Ok(())
}
