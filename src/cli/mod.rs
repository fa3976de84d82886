//! # Command Line Interface
//!
//! `secret-resolver get <REF>...` resolves secret references and prints their
//! values, one per line, to stdout. Logs go to stderr.

pub mod output;

use crate::registry::ProviderRegistry;
use anyhow::Context;
use clap::{Parser, Subcommand};
use output::OutputFormat;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = crate::APP_NAME)]
#[command(about = "Resolve secret references from Kubernetes and GCP Secret Manager")]
#[command(version = crate::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one or more secret references
    Get {
        /// References such as ref+k8s://namespace/secret/key
        #[arg(required = true)]
        references: Vec<String>,

        /// Output format (text, json, yaml)
        #[arg(short, long, default_value = "text")]
        output: String,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    initialise_logging(cli.verbose)?;

    match cli.command {
        Commands::Get { references, output } => {
            let format = OutputFormat::from_str(&output)?;
            let registry = ProviderRegistry::default();

            for reference in &references {
                let value = registry
                    .resolve(reference)
                    .await
                    .with_context(|| format!("Failed to resolve {}", reference))?;
                output::print_value(&value, format)?;
            }
        }
    }

    Ok(())
}

fn initialise_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let subscriber =
        FmtSubscriber::builder().with_env_filter(filter).with_writer(std::io::stderr).finish();

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(())
}
