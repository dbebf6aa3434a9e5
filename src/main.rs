//! Blockchain indexing service entry point.
//!
//! This binary provides a one-shot indexing CLI: it normalizes a single
//! transaction or a whole block into the stored document shapes and
//! prints the result as JSON.
//!
//! # Flow
//! 1. Loads `.env` and applies CLI flags to the environment
//! 2. Sets up logging (stdout or rolling file)
//! 3. Builds the service stack for the selected network (bootstrap module)
//! 4. Runs one indexing operation (`--tx` or `--block`)
//! 5. Prints the resulting document or block summary as JSON

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

use crate::{
	bootstrap::{initialize_services, BootstrapConfig, Result},
	services::indexer::{BlockIndexer, BlockRef, Tx, TxOptions},
	utils::{logging::setup_logging, parse_string_to_bytes_size},
};

use clap::Parser;
use dotenvy::dotenv_override;
use std::env::{set_var, var};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(
	name = "evm-indexer",
	about = "An EVM blockchain indexer that normalizes transactions, events, internal transactions and address state into queryable documents.",
	version
)]
struct Cli {
	/// Transaction hash to index
	#[arg(long, value_name = "TX_HASH", conflicts_with = "block")]
	tx: Option<String>,

	/// Block hash or number to index
	#[arg(long, value_name = "BLOCK")]
	block: Option<BlockRef>,

	/// Bypass cached documents and refetch from the node
	#[arg(long)]
	force: bool,

	/// Network slug to index against
	#[arg(long, value_name = "NETWORK_SLUG", default_value = "mainnet")]
	network: String,

	/// Path to the configuration directory (default: config/)
	#[arg(long, value_name = "PATH")]
	config_path: Option<PathBuf>,

	/// Data directory for file storage (default: in-memory, results on stdout)
	#[arg(long, value_name = "PATH")]
	data_dir: Option<PathBuf>,

	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Reload environment variables from .env file
		// Override any existing environment variables
		dotenv_override().ok();

		// Log file mode - override if CLI flag is set
		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		// Set log level from RUST_LOG if it exists
		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		// Log level - override if CLI flag is set
		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		// Log path - override if CLI flag is set
		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		// Log max size - override if CLI flag is set
		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}
	}
}

/// Main entry point for the indexing service.
///
/// # Errors
/// Returns an error if service initialization or the indexing operation fails.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	// Apply CLI options to environment
	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	if cli.tx.is_none() && cli.block.is_none() {
		return Err("Nothing to index: pass --tx <hash> or --block <hash|number>".into());
	}

	let stack = initialize_services(BootstrapConfig {
		network_slug: cli.network.clone(),
		config_path: cli.config_path.clone(),
		data_dir: cli.data_dir.clone(),
	})
	.await?;

	info!(network = %stack.network.slug, "service stack initialized");

	if let Some(hash) = &cli.tx {
		let mut tx = Tx::new(hash, stack.context.clone(), TxOptions::default(), None)?;
		let document = tx.fetch(cli.force).await?;
		tx.into_registry().save_all().await?;
		stack.context.transactions.insert(&document).await?;

		println!("{}", serde_json::to_string_pretty(&document)?);
		return Ok(());
	}

	if let Some(block_ref) = &cli.block {
		let indexer = BlockIndexer::new(stack.context.clone());
		let summary = indexer.index_block(block_ref, cli.force).await?;

		println!("{}", serde_json::to_string_pretty(&summary)?);
	}

	Ok(())
}
