//! Network configuration loading and validation.
//!
//! Implements the ConfigLoader trait for Network, reading one JSON file per
//! network from the networks directory and resolving RPC URL secrets before
//! the configuration is validated.

use async_trait::async_trait;
use std::{collections::HashMap, path::Path};

use crate::models::{config::error::ConfigError, ConfigLoader, Network, SecretValue};

fn is_address_hash(value: &str) -> bool {
	let hex = match value.strip_prefix("0x") {
		Some(hex) => hex,
		None => return false,
	};
	hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Standard "path" metadata entry for file errors
fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

#[async_trait]
impl ConfigLoader for Network {
	/// Resolve all secrets in the network configuration
	async fn resolve_secrets(&self) -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();
		let mut network = self.clone();

		for rpc_url in &mut network.rpc_urls {
			let resolved_url = rpc_url.url.resolve().await.map_err(|e| {
				ConfigError::parse_error(
					format!("failed to resolve RPC URL: {}", e),
					Some(Box::new(e)),
					None,
				)
			})?;
			rpc_url.url = SecretValue::Plain(resolved_url);
		}
		Ok(network)
	}

	/// Load all network configurations from a directory
	///
	/// Every JSON file in the directory (default config directory when no
	/// path is given) becomes one network, keyed by file stem.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let network_dir = path.unwrap_or(Path::new("config/networks"));
		let mut pairs = Vec::new();

		if !network_dir.exists() {
			return Err(ConfigError::file_error(
				"networks directory not found",
				None,
				path_metadata(network_dir),
			));
		}

		for entry in std::fs::read_dir(network_dir).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read networks directory: {}", e),
				Some(Box::new(e)),
				path_metadata(network_dir),
			)
		})? {
			let entry = entry.map_err(|e| {
				ConfigError::file_error(
					format!("failed to read directory entry: {}", e),
					Some(Box::new(e)),
					path_metadata(network_dir),
				)
			})?;
			let path = entry.path();

			if !Self::is_json_file(&path) {
				continue;
			}

			let name = path
				.file_stem()
				.and_then(|s| s.to_str())
				.unwrap_or("unknown")
				.to_string();

			let network = Self::load_from_path(&path).await?;

			// Slug must be unique across all loaded files
			let existing_networks: Vec<&Network> =
				pairs.iter().map(|(_, network)| network).collect();
			Self::validate_uniqueness(&existing_networks, &network, &path.display().to_string())?;

			pairs.push((name, network));
		}

		Ok(T::from_iter(pairs))
	}

	/// Load a network configuration from a specific file
	async fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open network config file: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;
		let mut config: Network = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse network config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		// Secrets resolve first so validation sees the real URLs
		config = config.resolve_secrets().await?;
		config.validate()?;

		Ok(config)
	}

	/// Validate the network configuration
	///
	/// Ensures that:
	/// - The network has a valid name and slug
	/// - At least one usable RPC URL is specified
	/// - The native-contract table carries well-formed, unique entries
	fn validate(&self) -> Result<(), ConfigError> {
		if self.name.is_empty() {
			return Err(ConfigError::validation_error(
				"Network name is required",
				None,
				None,
			));
		}

		if !self
			.slug
			.chars()
			.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
		{
			return Err(ConfigError::validation_error(
				"Slug must contain only lowercase letters, numbers, and underscores",
				None,
				None,
			));
		}

		let supported_types = ["rpc"];
		if !self
			.rpc_urls
			.iter()
			.all(|rpc_url| supported_types.contains(&rpc_url.type_.as_str()))
		{
			return Err(ConfigError::validation_error(
				format!(
					"RPC URL type must be one of: {}",
					supported_types.join(", ")
				),
				None,
				None,
			));
		}

		if !self.rpc_urls.iter().all(|rpc_url| {
			rpc_url.url.starts_with("http://") || rpc_url.url.starts_with("https://")
		}) {
			return Err(ConfigError::validation_error(
				"All RPC URLs must start with http:// or https://",
				None,
				None,
			));
		}

		if !self.rpc_urls.iter().all(|rpc_url| rpc_url.weight <= 100) {
			return Err(ConfigError::validation_error(
				"All RPC URL weights must be between 0 and 100",
				None,
				None,
			));
		}

		for contract in &self.native_contracts {
			if !is_address_hash(&contract.address) {
				return Err(ConfigError::validation_error(
					format!("Invalid native contract address: {}", contract.address),
					None,
					None,
				));
			}
			if contract.name.is_empty() {
				return Err(ConfigError::validation_error(
					"Native contract name is required",
					None,
					None,
				));
			}
		}

		let mut seen = std::collections::HashSet::new();
		for contract in &self.native_contracts {
			if !seen.insert(contract.address.to_lowercase()) {
				return Err(ConfigError::validation_error(
					format!("Duplicate native contract address: {}", contract.address),
					None,
					None,
				));
			}
		}

		Ok(())
	}

	/// Validate uniqueness of the network slug across loaded configurations
	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError> {
		if instances
			.iter()
			.any(|network| network.slug == current_instance.slug)
		{
			return Err(ConfigError::validation_error(
				format!("Duplicate network slug found: {}", current_instance.slug),
				None,
				Some(HashMap::from([
					("slug".to_string(), current_instance.slug.clone()),
					("path".to_string(), file_path.to_string()),
				])),
			));
		}
		Ok(())
	}
}
