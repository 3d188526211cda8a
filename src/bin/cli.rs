//! Speech archiver CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use archiver::{
    error::{AppError, Result},
    models::{Config, RunReport},
    pipeline::{self, ArchivePipeline},
};
use clap::{Parser, Subcommand};

/// speech-archiver - Collect linked speeches into one XML zip archive
#[derive(Parser, Debug)]
#[command(
    name = "speech-archiver",
    version,
    about = "Archives every speech linked from an index page"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "archiver.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every linked speech and write the archive
    Run {
        /// Index page URL (default: source.index_url from the config)
        #[arg(long)]
        index_url: Option<String>,

        /// Directory to write the archive into (default: output.dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve and print the detail links without fetching them
    Links {
        /// Index page URL (default: source.index_url from the config)
        #[arg(long)]
        index_url: Option<String>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Pick the index URL from the command line or the config.
fn index_url(cli_value: Option<String>, config: &Config) -> Result<String> {
    cli_value
        .or_else(|| config.source.index_url.clone())
        .ok_or_else(|| {
            AppError::config("No index URL given. Pass --index-url or set source.index_url")
        })
}

fn print_report(report: &RunReport) {
    log::info!("Archive saved as {}", report.archive_name);
    log::info!(
        "{} of {} speeches archived, {} dropped",
        report.entries.len(),
        report.link_count,
        report.dropped.len()
    );
    for entry in &report.entries {
        println!("{entry}");
    }
    for dropped in &report.dropped {
        log::warn!("Dropped {}: {}", dropped.url, dropped.reason);
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(&cli.config);
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run {
            index_url: url,
            output_dir,
            json,
        } => {
            if let Some(dir) = output_dir {
                config.output.dir = dir.display().to_string();
            }
            config.validate()?;
            let url = index_url(url, &config)?;

            let report = pipeline::run_archiver(&config, &url).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }

        Command::Links { index_url: url } => {
            config.validate()?;
            let url = index_url(url, &config)?;

            let pipeline = ArchivePipeline::from_config(&config)?;
            let links = pipeline.resolve_links(&url).await?;
            for link in &links {
                println!("{link}");
            }
            log::info!("{} detail links found", links.len());
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("Config OK");
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[{}] {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
