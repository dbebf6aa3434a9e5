//! Contract ABI configuration loading and validation.
//!
//! This module implements the ConfigLoader trait for contract ABI entries,
//! allowing known-contract definitions to be loaded from JSON files.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};

use crate::models::{config::error::ConfigError, ConfigLoader, EVMContractSpec};

/// A known contract and its ABI.
///
/// Entries bind a deployed address to the ABI the decoder should use for
/// its logs. Addresses are matched case-insensitively.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContractAbi {
	/// Deployed address of the contract
	pub address: String,

	/// Optional human-readable name
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	/// Parsed contract ABI
	pub abi: EVMContractSpec,
}

fn is_address_hash(value: &str) -> bool {
	let hex = match value.strip_prefix("0x") {
		Some(hex) => hex,
		None => return false,
	};
	hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[async_trait]
impl ConfigLoader for ContractAbi {
	/// Resolve all secrets in the contract configuration
	///
	/// ABI entries carry no secrets, so this is the identity.
	async fn resolve_secrets(&self) -> Result<Self, ConfigError> {
		Ok(self.clone())
	}

	/// Load all contract ABI configurations from a directory
	///
	/// Reads and parses all JSON files in the specified directory (or default
	/// config directory) as contract ABI entries, keyed by file stem.
	///
	/// ABI entries are optional configuration, so a missing directory loads
	/// as an empty set rather than an error.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let abi_dir = path.unwrap_or(Path::new("config/abis"));
		let mut pairs = Vec::new();

		if !abi_dir.exists() {
			return Ok(T::from_iter(pairs));
		}

		for entry in std::fs::read_dir(abi_dir).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read abis directory: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					abi_dir.display().to_string(),
				)])),
			)
		})? {
			let entry = entry.map_err(|e| {
				ConfigError::file_error(
					format!("failed to read directory entry: {}", e),
					Some(Box::new(e)),
					Some(HashMap::from([(
						"path".to_string(),
						abi_dir.display().to_string(),
					)])),
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

			let contract = Self::load_from_path(&path).await?;

			let existing: Vec<&ContractAbi> = pairs.iter().map(|(_, c)| c).collect();
			// Check address uniqueness before pushing
			Self::validate_uniqueness(&existing, &contract, &path.display().to_string())?;

			pairs.push((name, contract));
		}

		Ok(T::from_iter(pairs))
	}

	/// Load a contract ABI configuration from a specific file
	async fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open contract config file: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;
		let config: ContractAbi = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse contract config: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;

		// Validate the config after loading
		config.validate()?;

		Ok(config)
	}

	/// Validate the contract ABI configuration
	///
	/// Ensures that the address is a well-formed hash and the ABI carries
	/// at least one event fragment to decode against.
	fn validate(&self) -> Result<(), ConfigError> {
		if !is_address_hash(&self.address) {
			return Err(ConfigError::validation_error(
				format!("Invalid contract address: {}", self.address),
				None,
				None,
			));
		}

		if self.abi.events.is_empty() {
			return Err(ConfigError::validation_error(
				format!("Contract ABI for {} has no event fragments", self.address),
				None,
				None,
			));
		}

		Ok(())
	}

	/// Validate uniqueness of the contract address across loaded configurations
	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError> {
		if instances
			.iter()
			.any(|c| c.address.to_lowercase() == current_instance.address.to_lowercase())
		{
			return Err(ConfigError::validation_error(
				format!(
					"Duplicate contract address found: {}",
					current_instance.address
				),
				None,
				Some(HashMap::from([
					("address".to_string(), current_instance.address.clone()),
					("path".to_string(), file_path.to_string()),
				])),
			));
		}
		Ok(())
	}
}
