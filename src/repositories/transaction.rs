//! Transaction document storage.
//!
//! Stores the canonical transaction documents the pipeline produces, with
//! an in-memory implementation for tests and dry runs and a JSON-file-per-
//! document implementation for on-disk data directories. The deployment
//! lookup (`find_by_contract_address`) backs deployment-context recovery
//! for addresses created before the current run.

use async_trait::async_trait;
use std::{
	collections::HashMap,
	path::PathBuf,
	sync::Arc,
};
use tokio::sync::RwLock;

use crate::{models::TxDocument, repositories::error::RepositoryError};

fn receipt_contract_address(document: &TxDocument) -> Option<String> {
	document
		.receipt
		.get("contractAddress")
		.and_then(|v| v.as_str())
		.map(|s| s.to_lowercase())
}

/// Interface for transaction document storage implementations
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
	/// Retrieves a transaction document by its lowercase `0x` hash
	async fn get_by_hash(&self, hash: &str) -> Result<Option<TxDocument>, RepositoryError>;

	/// Inserts or replaces the document for a transaction
	async fn insert(&self, document: &TxDocument) -> Result<(), RepositoryError>;

	/// Finds the transaction whose receipt deployed the given contract
	async fn find_by_contract_address(
		&self,
		address: &str,
	) -> Result<Option<TxDocument>, RepositoryError>;

	/// Number of stored transaction documents
	async fn count(&self) -> Result<usize, RepositoryError>;
}

/// In-memory transaction storage, shared behind a read-write lock
#[derive(Clone, Default)]
pub struct InMemoryTransactionRepository {
	documents: Arc<RwLock<HashMap<String, TxDocument>>>,
}

impl InMemoryTransactionRepository {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryTransactionRepository {
	async fn get_by_hash(&self, hash: &str) -> Result<Option<TxDocument>, RepositoryError> {
		let documents = self.documents.read().await;
		Ok(documents.get(&hash.to_lowercase()).cloned())
	}

	async fn insert(&self, document: &TxDocument) -> Result<(), RepositoryError> {
		let mut documents = self.documents.write().await;
		documents.insert(document.hash(), document.clone());
		Ok(())
	}

	async fn find_by_contract_address(
		&self,
		address: &str,
	) -> Result<Option<TxDocument>, RepositoryError> {
		let needle = address.to_lowercase();
		let documents = self.documents.read().await;
		Ok(documents
			.values()
			.find(|doc| receipt_contract_address(doc).as_deref() == Some(needle.as_str()))
			.cloned())
	}

	async fn count(&self) -> Result<usize, RepositoryError> {
		Ok(self.documents.read().await.len())
	}
}

/// File-based transaction storage, one JSON document per transaction
///
/// Documents live under `{data_dir}/transactions/{hash}.json`. Writes are
/// full-file replacements; reads tolerate missing files.
#[derive(Clone)]
pub struct FileTransactionRepository {
	storage_path: PathBuf,
}

impl FileTransactionRepository {
	/// Creates file-based storage rooted at the given data directory
	pub fn new(data_dir: PathBuf) -> Self {
		Self {
			storage_path: data_dir.join("transactions"),
		}
	}

	fn document_path(&self, hash: &str) -> PathBuf {
		self.storage_path.join(format!("{}.json", hash.to_lowercase()))
	}

	async fn read_document(&self, path: &PathBuf) -> Result<TxDocument, RepositoryError> {
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			RepositoryError::load_error(
				format!("Failed to read transaction document: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;

		serde_json::from_str(&content).map_err(|e| {
			RepositoryError::load_error(
				format!("Failed to parse transaction document: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})
	}
}

#[async_trait]
impl TransactionRepositoryTrait for FileTransactionRepository {
	async fn get_by_hash(&self, hash: &str) -> Result<Option<TxDocument>, RepositoryError> {
		let path = self.document_path(hash);
		if !path.exists() {
			return Ok(None);
		}
		self.read_document(&path).await.map(Some)
	}

	async fn insert(&self, document: &TxDocument) -> Result<(), RepositoryError> {
		tokio::fs::create_dir_all(&self.storage_path)
			.await
			.map_err(|e| {
				RepositoryError::internal_error(
					format!("Failed to create transactions directory: {}", e),
					Some(Box::new(e)),
					None,
				)
			})?;

		let path = self.document_path(&document.hash());
		let content = serde_json::to_string_pretty(document).map_err(|e| {
			RepositoryError::internal_error(
				format!("Failed to serialize transaction document: {}", e),
				Some(Box::new(e)),
				None,
			)
		})?;

		tokio::fs::write(&path, content).await.map_err(|e| {
			RepositoryError::internal_error(
				format!("Failed to write transaction document: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})
	}

	/// Scans the data directory for a deployment receipt.
	///
	/// Linear over stored documents, acceptable for the one-shot CLI flows
	/// this storage backs.
	async fn find_by_contract_address(
		&self,
		address: &str,
	) -> Result<Option<TxDocument>, RepositoryError> {
		if !self.storage_path.exists() {
			return Ok(None);
		}
		let needle = address.to_lowercase();

		let mut entries = tokio::fs::read_dir(&self.storage_path).await.map_err(|e| {
			RepositoryError::load_error(
				format!("Failed to read transactions directory: {}", e),
				Some(Box::new(e)),
				None,
			)
		})?;

		while let Some(entry) = entries.next_entry().await.map_err(|e| {
			RepositoryError::load_error(
				format!("Failed to read directory entry: {}", e),
				Some(Box::new(e)),
				None,
			)
		})? {
			let path = entry.path();
			if !path.extension().is_some_and(|ext| ext == "json") {
				continue;
			}
			let document = self.read_document(&path).await?;
			if receipt_contract_address(&document).as_deref() == Some(needle.as_str()) {
				return Ok(Some(document));
			}
		}
		Ok(None)
	}

	async fn count(&self) -> Result<usize, RepositoryError> {
		if !self.storage_path.exists() {
			return Ok(0);
		}

		let mut entries = tokio::fs::read_dir(&self.storage_path).await.map_err(|e| {
			RepositoryError::load_error(
				format!("Failed to read transactions directory: {}", e),
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
