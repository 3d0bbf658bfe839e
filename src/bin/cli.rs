//! snowline CLI
//!
//! Collects ski-condition reports and publishes the unified document.
//! Intended to be driven by an external scheduler (cron or a manual run).

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reqwest::Client;
use snowline::{
    config::StoreConfig,
    error::Result,
    models::Config,
    notify::Notifier,
    pipeline,
    storage::{GitHubStore, WriteMetadata},
    utils::http,
};

/// snowline - Ski conditions collector
#[derive(Parser, Debug)]
#[command(name = "snowline", version, about = "Ski conditions collector")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect from all sources and publish to the destination store
    Run,

    /// Collect only; write the document locally instead of publishing
    Collect {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration and environment
    Validate,
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
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Arc::new(Config::load_or_default(&cli.config));

    match cli.command {
        Command::Run => {
            // Missing credentials abort here, before any network activity
            // and before a notifier exists to alert through.
            let store_config = StoreConfig::from_env()?;
            config.validate()?;

            let client = http::create_client(&config.fetch)?;
            let notifier = Notifier::from_env(client.clone());
            let store = GitHubStore::new(client.clone(), store_config, &config.fetch);

            match run(Arc::clone(&config), &client, &store).await {
                Ok(metadata) => {
                    log::info!("Run complete: published {}", metadata.path);
                }
                Err(error) => {
                    log::error!("Run failed: {}", error);
                    notifier
                        .alert("Ski conditions update failed", &format!("{error:?}"))
                        .await;
                    return Err(error);
                }
            }
        }

        Command::Collect { output } => {
            config.validate()?;
            let client = http::create_client(&config.fetch)?;
            let document = pipeline::run_collect(Arc::clone(&config), &client).await?;
            let json = serde_json::to_string_pretty(&document)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    log::info!("Wrote document to {}", path.display());
                }
                None => println!("{json}"),
            }
        }

        Command::Validate => {
            pipeline::run_validate(&config)?;
            log::info!("All validations passed!");
        }
    }

    Ok(())
}

/// Collect and publish one document.
async fn run(config: Arc<Config>, client: &Client, store: &GitHubStore) -> Result<WriteMetadata> {
    let document = pipeline::run_collect(Arc::clone(&config), client).await?;
    pipeline::run_publish(store, &config.publish, &document).await
}
