//! Persistence adapter for generations.
//!
//! Every operation returns an explicit `StoreError` on failure. Callers decide
//! the degraded value (sentinel id, placeholder list, diagnostic string); the
//! adapter never substitutes data on their behalf.

use crate::config::DatabaseConfig;
use crate::models::{RecentItem, StoredGeneration};
use crate::services::database::ContentDb;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No connection settings were provided.
    #[error("store is not configured")]
    NotConfigured,

    /// Settings exist but no client could be built from them.
    #[error("store client unavailable: {0}")]
    Connection(String),

    /// A client exists but the call failed.
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// Connectivity of the backing store as seen by the last probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Unconfigured,
    Unreachable,
    Connected,
}

impl StoreStatus {
    pub fn from_probe<T>(probe: &Result<T, StoreError>) -> Self {
        match probe {
            Ok(_) => StoreStatus::Connected,
            Err(StoreError::NotConfigured) => StoreStatus::Unconfigured,
            Err(_) => StoreStatus::Unreachable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Unconfigured => "unconfigured",
            StoreStatus::Unreachable => "unreachable",
            StoreStatus::Connected => "connected",
        }
    }
}

impl std::fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait GenerationStore: Send + Sync {
    /// Insert a generation and return its store-assigned id.
    async fn insert_generation(&self, generation: &StoredGeneration) -> Result<String, StoreError>;

    /// Up to `limit` generations, newest first.
    async fn recent_generations(&self, limit: i64) -> Result<Vec<RecentItem>, StoreError>;

    /// Up to `limit` collection names; doubles as a connectivity check.
    async fn list_collections(&self, limit: usize) -> Result<Vec<String>, StoreError>;
}

/// Store used when no client exists: every call fails with the same error.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    error: StoreError,
}

impl UnavailableStore {
    pub fn unconfigured() -> Self {
        Self {
            error: StoreError::NotConfigured,
        }
    }

    pub fn connection_failed(reason: impl Into<String>) -> Self {
        Self {
            error: StoreError::Connection(reason.into()),
        }
    }
}

#[async_trait]
impl GenerationStore for UnavailableStore {
    async fn insert_generation(&self, _generation: &StoredGeneration) -> Result<String, StoreError> {
        Err(self.error.clone())
    }

    async fn recent_generations(&self, _limit: i64) -> Result<Vec<RecentItem>, StoreError> {
        Err(self.error.clone())
    }

    async fn list_collections(&self, _limit: usize) -> Result<Vec<String>, StoreError> {
        Err(self.error.clone())
    }
}

/// Build the store for the given settings. Never fails: missing or unusable
/// settings yield an `UnavailableStore`.
pub async fn connect_store(config: &DatabaseConfig) -> Arc<dyn GenerationStore> {
    let (Some(url), Some(name)) = (config.url.as_deref(), config.name.as_deref()) else {
        tracing::warn!("DATABASE_URL/DATABASE_NAME not set; generations will not be persisted");
        return Arc::new(UnavailableStore::unconfigured());
    };

    match ContentDb::connect(url, name, &config.collection).await {
        Ok(db) => {
            // Index creation blocks on server selection; keep it off the startup path.
            let background = db.clone();
            tokio::spawn(async move {
                if let Err(e) = background.initialize_indexes().await {
                    tracing::warn!(error = %e, "Failed to initialize MongoDB indexes");
                }
            });
            Arc::new(db)
        }
        Err(e) => {
            tracing::warn!(error = %e, "MongoDB client unavailable; running without persistence");
            Arc::new(UnavailableStore::connection_failed(e.to_string()))
        }
    }
}
