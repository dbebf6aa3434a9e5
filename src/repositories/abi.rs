//! Contract ABI configuration repository implementation.
//!
//! Loads the known-contract ABI entries the resolver decodes with from
//! JSON files, one contract per file.

#![allow(clippy::result_large_err)]

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;

use crate::{
	models::{ConfigLoader, ContractAbi},
	repositories::error::RepositoryError,
};

/// Repository for storing and retrieving contract ABI configurations
#[derive(Clone)]
pub struct AbiRepository {
	/// Map of config file stems to their ABI entries
	pub abis: HashMap<String, ContractAbi>,
}

impl AbiRepository {
	/// Create a new ABI repository from the given path
	///
	/// Loads all contract ABI entries from JSON files in the specified
	/// directory (or default config directory if None is provided).
	pub async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		let abis = Self::load_all(path).await?;
		Ok(AbiRepository { abis })
	}
}

/// Interface for ABI repository implementations
#[async_trait]
pub trait AbiRepositoryTrait: Clone {
	/// Create a new repository instance
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
	where
		Self: Sized;

	/// Load all contract ABI entries from the given path
	///
	/// If no path is provided, uses the default config directory.
	async fn load_all(path: Option<&Path>) -> Result<HashMap<String, ContractAbi>, RepositoryError>;

	/// Get a specific ABI entry by contract address (case-insensitive)
	fn get_by_address(&self, address: &str) -> Option<ContractAbi>;

	/// Get all ABI entries
	fn get_all(&self) -> HashMap<String, ContractAbi>;
}

#[async_trait]
impl AbiRepositoryTrait for AbiRepository {
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		AbiRepository::new(path).await
	}

	async fn load_all(path: Option<&Path>) -> Result<HashMap<String, ContractAbi>, RepositoryError> {
		ContractAbi::load_all(path).await.map_err(|e| {
			RepositoryError::load_error(
				"Failed to load contract ABIs",
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.map_or_else(|| "default".to_string(), |p| p.display().to_string()),
				)])),
			)
		})
	}

	fn get_by_address(&self, address: &str) -> Option<ContractAbi> {
		let needle = address.to_lowercase();
		self.abis
			.values()
			.find(|entry| entry.address.to_lowercase() == needle)
			.cloned()
	}

	fn get_all(&self) -> HashMap<String, ContractAbi> {
		self.abis.clone()
	}
}
