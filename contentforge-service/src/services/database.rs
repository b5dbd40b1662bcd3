//! MongoDB-backed generation store.

use crate::models::generation::render_inserted_id;
use crate::models::{RecentItem, StoredGeneration, StoredGenerationSummary};
use crate::services::metrics;
use crate::services::store::{GenerationStore, StoreError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;
use std::time::Instant;

#[derive(Clone)]
pub struct ContentDb {
    db: Database,
    collection: String,
}

impl ContentDb {
    /// Build a client. The driver connects lazily, so this only fails on an
    /// unparseable URI or failed SRV lookup.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Creating MongoDB client");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        Ok(Self {
            db,
            collection: collection.to_string(),
        })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!(collection = %self.collection, "Creating MongoDB indexes");

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_idx".to_string())
                    .build(),
            )
            .build();

        self.generations()
            .create_index(created_at_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create created_at index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    fn generations(&self) -> Collection<StoredGeneration> {
        self.db.collection(&self.collection)
    }

    fn summaries(&self) -> Collection<StoredGenerationSummary> {
        self.db.collection(&self.collection)
    }
}

fn operation_error(operation: &str, e: mongodb::error::Error) -> StoreError {
    tracing::warn!(operation = %operation, error = %e, "MongoDB operation failed");
    StoreError::Operation(e.to_string())
}

#[async_trait]
impl GenerationStore for ContentDb {
    async fn insert_generation(&self, generation: &StoredGeneration) -> Result<String, StoreError> {
        tracing::debug!(collection = %self.collection, "Inserting generation");
        let start = Instant::now();
        let result = self.generations().insert_one(generation, None).await;
        metrics::record_store_operation("insert", start.elapsed().as_secs_f64());

        let inserted = result.map_err(|e| operation_error("insert", e))?;
        Ok(render_inserted_id(&inserted.inserted_id))
    }

    async fn recent_generations(&self, limit: i64) -> Result<Vec<RecentItem>, StoreError> {
        tracing::debug!(collection = %self.collection, limit, "Fetching recent generations");
        let start = Instant::now();
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .projection(doc! { "_id": 1, "prompt": 1, "created_at": 1 })
            .build();

        let result: Result<Vec<StoredGenerationSummary>, mongodb::error::Error> = async {
            let cursor = self.summaries().find(Document::new(), options).await?;
            cursor.try_collect().await
        }
        .await;
        metrics::record_store_operation("recent", start.elapsed().as_secs_f64());

        let docs = result.map_err(|e| operation_error("recent", e))?;
        Ok(docs.into_iter().map(RecentItem::from).collect())
    }

    async fn list_collections(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let start = Instant::now();
        let result = self.db.list_collection_names(None).await;
        metrics::record_store_operation("list_collections", start.elapsed().as_secs_f64());

        let mut names = result.map_err(|e| operation_error("list_collections", e))?;
        names.truncate(limit);
        Ok(names)
    }
}
