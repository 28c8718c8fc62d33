//! Diploma digest CLI
//!
//! A bare invocation runs one crawl → summarize → publish cycle and exits.
//! Scheduling is left to cron or whatever invokes the binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use diploma_digest::{
    error::Result,
    models::{Config, GeminiCredentials, StoreCredentials, XCredentials},
    pipeline,
};

/// Diploma digest - summarize newly approved diplomas
#[derive(Parser, Debug)]
#[command(
    name = "diploma-digest",
    version,
    about = "Posts a summary of the latest diploma approved by the Portuguese parliament"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one cycle (default)
    Run,

    /// Validate configuration and report missing credentials
    Validate,

    /// Show the last processed diploma
    Status,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // The configured log level is needed before logging starts.
    let loaded = Config::load(&cli.config);
    let level = loaded
        .as_ref()
        .map_or("info", |c| c.logging.level.as_str())
        .to_string();
    init_logging(cli.verbose, &level);

    let config = Config::or_default(loaded, &cli.config);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            log::info!("Diploma digest starting...");
            pipeline::run_pipeline(&config)?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let checks = [
                ("store", StoreCredentials::from_env().err()),
                ("summarizer", GeminiCredentials::from_env().err()),
                ("publisher", XCredentials::from_env().err()),
            ];
            let mut missing = 0;
            for (component, error) in checks {
                match error {
                    None => log::info!("✓ {} credentials present", component),
                    Some(e) => {
                        missing += 1;
                        log::error!("✗ {} credentials: {}", component, e);
                    }
                }
            }

            if missing == 0 {
                log::info!("All validations passed!");
            } else {
                log::warn!("{} component(s) missing credentials", missing);
            }
        }

        Command::Status => match pipeline::show_status(&config)? {
            Some(marker) => log::info!("Last processed diploma: {}", marker),
            None => log::info!("No diploma processed yet."),
        },
    }

    log::info!("Done!");

    Ok(())
}
