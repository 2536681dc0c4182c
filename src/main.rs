//! shipsplit - decompose subscription orders into capacity-bounded shipments
//!
//! CLI binary around the `shipsplit` engine library.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "shipsplit")]
#[command(about = "Decompose subscription orders into capacity-bounded shipments")]
#[command(version)]
struct Cli {
    /// Path to a fulfillment rules JSON (defaults to the built-in production
    /// rules)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview order decomposition without submitting anything
    Plan {
        /// JSON file of inbound orders (bare array or listing envelope)
        orders: PathBuf,

        /// JSON file of per-order plan compositions and accessory injections,
        /// keyed by order number
        #[arg(long)]
        compositions: Option<PathBuf>,
    },

    /// Plan, rate-shop, and submit a batch of orders
    Process {
        /// JSON file of inbound orders (bare array or listing envelope)
        orders: PathBuf,

        /// JSON file of per-order plan compositions and accessory injections,
        /// keyed by order number
        #[arg(long)]
        compositions: Option<PathBuf>,

        /// Override the configured number of parallel order workers
        #[arg(long)]
        workers: Option<usize>,

        /// Plan and report without calling the platform
        #[arg(long)]
        dry_run: bool,

        /// Override the ShipStation API base URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            orders,
            compositions,
        } => {
            cli::run_plan(&orders, compositions.as_deref(), cli.config.as_deref())?;
        }
        Commands::Process {
            orders,
            compositions,
            workers,
            dry_run,
            base_url,
        } => {
            cli::run_process(&cli::ProcessArgs {
                orders: &orders,
                compositions: compositions.as_deref(),
                config: cli.config.as_deref(),
                workers,
                dry_run,
                base_url: base_url.as_deref(),
            })
            .await?;
        }
    }

    Ok(())
}
