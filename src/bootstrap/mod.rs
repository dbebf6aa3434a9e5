//! Bootstrap module for building the indexing service stack.
//!
//! Wires together the configuration layer, the RPC client, the contract
//! resolver, and the storage repositories into the context the indexing
//! entry points consume.
//!
//! # Layout
//! Configuration lives under a config directory with two subdirectories:
//! - `networks/`: one JSON file per network (RPC endpoints, native contracts)
//! - `abis/`: one JSON file per contract ABI fed to the resolver
//!
//! Storage defaults to in-memory repositories; passing a data directory
//! switches to the JSON-file-per-document implementations.

use std::{error::Error, path::PathBuf, sync::Arc};

use tracing::{debug, info};

use crate::{
	models::Network,
	repositories::{
		AbiRepository, AbiRepositoryTrait, FileAddressRepository, FileTransactionRepository,
		InMemoryAddressRepository, InMemoryTransactionRepository, NetworkRepository,
		NetworkService,
	},
	services::{
		blockchain::{EvmClient, NodeClient},
		decoder::AbiContractResolver,
		indexer::AddressContext,
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// How the service stack should be assembled
#[derive(Debug, Default, Clone)]
pub struct BootstrapConfig {
	/// Slug of the network to index
	pub network_slug: String,

	/// Config directory holding `networks/` and `abis/` (default: `config/`)
	pub config_path: Option<PathBuf>,

	/// Data directory for file repositories (default: in-memory)
	pub data_dir: Option<PathBuf>,
}

/// The assembled collaborators for one indexing run
pub struct ServiceStack {
	pub network: Network,
	pub context: AddressContext,
}

/// Builds the full service stack for the configured network.
///
/// # Errors
/// Returns an error when the network slug is unknown, configuration files
/// fail to load, or no RPC endpoint answers the connection probe.
pub async fn initialize_services(config: BootstrapConfig) -> Result<ServiceStack> {
	let networks_path = config.config_path.as_ref().map(|p| p.join("networks"));
	let network_service =
		NetworkService::<NetworkRepository>::new_with_path(networks_path.as_deref()).await?;
	let network = network_service.get(&config.network_slug).ok_or_else(|| {
		format!(
			"Network not found: {} (available: {})",
			config.network_slug,
			network_service
				.get_all()
				.keys()
				.cloned()
				.collect::<Vec<_>>()
				.join(", ")
		)
	})?;

	let abis_path = config.config_path.as_ref().map(|p| p.join("abis"));
	let abi_repository = AbiRepository::new(abis_path.as_deref()).await?;
	debug!(
		network = %network.slug,
		abis = abi_repository.get_all().len(),
		"loaded configuration"
	);

	let node: Arc<dyn NodeClient> = Arc::new(EvmClient::new(&network).await?);
	let resolver = Arc::new(AbiContractResolver::new(
		node.clone(),
		network.clone(),
		abi_repository.get_all().into_values(),
	));

	let (addresses, transactions) = match &config.data_dir {
		Some(dir) => {
			info!(data_dir = %dir.display(), "using file repositories");
			(
				Arc::new(FileAddressRepository::new(dir.clone()))
					as Arc<dyn crate::repositories::AddressRepositoryTrait>,
				Arc::new(FileTransactionRepository::new(dir.clone()))
					as Arc<dyn crate::repositories::TransactionRepositoryTrait>,
			)
		}
		None => (
			Arc::new(InMemoryAddressRepository::new())
				as Arc<dyn crate::repositories::AddressRepositoryTrait>,
			Arc::new(InMemoryTransactionRepository::new())
				as Arc<dyn crate::repositories::TransactionRepositoryTrait>,
		),
	};

	let context = AddressContext {
		node,
		resolver,
		addresses,
		transactions,
		network: network.clone(),
	};

	Ok(ServiceStack { network, context })
}
