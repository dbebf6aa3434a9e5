//! Address document storage.
//!
//! Provides the storage interface the pipeline persists address documents
//! through, with an in-memory implementation for tests and dry runs and a
//! JSON-file-per-document implementation for on-disk data directories.

use async_trait::async_trait;
use std::{
	collections::HashMap,
	path::PathBuf,
	sync::Arc,
};
use tokio::sync::RwLock;

use crate::{models::AddressDocument, repositories::error::RepositoryError};

/// Interface for address document storage implementations
#[async_trait]
pub trait AddressRepositoryTrait: Send + Sync {
	/// Retrieves an address document by its lowercase address
	async fn get_by_address(
		&self,
		address: &str,
	) -> Result<Option<AddressDocument>, RepositoryError>;

	/// Inserts or replaces the document for an address
	async fn upsert(&self, document: &AddressDocument) -> Result<(), RepositoryError>;

	/// Number of stored address documents
	async fn count(&self) -> Result<usize, RepositoryError>;
}

/// In-memory address storage, shared behind a read-write lock
#[derive(Clone, Default)]
pub struct InMemoryAddressRepository {
	documents: Arc<RwLock<HashMap<String, AddressDocument>>>,
}

impl InMemoryAddressRepository {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl AddressRepositoryTrait for InMemoryAddressRepository {
	async fn get_by_address(
		&self,
		address: &str,
	) -> Result<Option<AddressDocument>, RepositoryError> {
		let documents = self.documents.read().await;
		Ok(documents.get(&address.to_lowercase()).cloned())
	}

	async fn upsert(&self, document: &AddressDocument) -> Result<(), RepositoryError> {
		let mut documents = self.documents.write().await;
		documents.insert(document.address.to_lowercase(), document.clone());
		Ok(())
	}

	async fn count(&self) -> Result<usize, RepositoryError> {
		Ok(self.documents.read().await.len())
	}
}

/// File-based address storage, one JSON document per address
///
/// Documents live under `{data_dir}/addresses/{address}.json`. Writes are
/// full-file replacements; reads tolerate missing files.
#[derive(Clone)]
pub struct FileAddressRepository {
	storage_path: PathBuf,
}

impl FileAddressRepository {
	/// Creates file-based storage rooted at the given data directory
	pub fn new(data_dir: PathBuf) -> Self {
		Self {
			storage_path: data_dir.join("addresses"),
		}
	}

	fn document_path(&self, address: &str) -> PathBuf {
		self.storage_path.join(format!("{}.json", address.to_lowercase()))
	}
}

#[async_trait]
impl AddressRepositoryTrait for FileAddressRepository {
	async fn get_by_address(
		&self,
		address: &str,
	) -> Result<Option<AddressDocument>, RepositoryError> {
		let path = self.document_path(address);
		if !path.exists() {
			return Ok(None);
		}

		let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
			RepositoryError::load_error(
				format!("Failed to read address document: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;

		serde_json::from_str(&content).map(Some).map_err(|e| {
			RepositoryError::load_error(
				format!("Failed to parse address document: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})
	}

	async fn upsert(&self, document: &AddressDocument) -> Result<(), RepositoryError> {
		tokio::fs::create_dir_all(&self.storage_path)
			.await
			.map_err(|e| {
				RepositoryError::internal_error(
					format!("Failed to create addresses directory: {}", e),
					Some(Box::new(e)),
					None,
				)
			})?;

		let path = self.document_path(&document.address);
		let content = serde_json::to_string_pretty(document).map_err(|e| {
			RepositoryError::internal_error(
				format!("Failed to serialize address document: {}", e),
				Some(Box::new(e)),
				None,
			)
		})?;

		tokio::fs::write(&path, content).await.map_err(|e| {
			RepositoryError::internal_error(
				format!("Failed to write address document: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})
	}

	async fn count(&self) -> Result<usize, RepositoryError> {
		if !self.storage_path.exists() {
			return Ok(0);
		}

		let mut entries = tokio::fs::read_dir(&self.storage_path).await.map_err(|e| {
			RepositoryError::load_error(
				format!("Failed to read addresses directory: {}", e),
				Some(Box::new(e)),
				None,
			)
		})?;

		let mut count = 0;
		while let Some(entry) = entries.next_entry().await.map_err(|e| {
			RepositoryError::load_error(
				format!("Failed to read directory entry: {}", e),
				Some(Box::new(e)),
				None,
			)
		})? {
			if entry.path().extension().is_some_and(|ext| ext == "json") {
				count += 1;
			}
		}
		Ok(count)
	}
}
