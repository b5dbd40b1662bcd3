//! In-process generation store for tests and local runs.

use crate::models::generation::new_object_id;
use crate::models::{RecentItem, StoredGeneration};
use crate::services::store::{GenerationStore, StoreError};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug)]
pub struct InMemoryStore {
    collections: Vec<String>,
    entries: Mutex<Vec<(String, StoredGeneration)>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: vec!["generation".to_string()],
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<(String, StoredGeneration)>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Operation("in-memory store poisoned".to_string()))
    }
}

#[async_trait]
impl GenerationStore for InMemoryStore {
    async fn insert_generation(&self, generation: &StoredGeneration) -> Result<String, StoreError> {
        let id = new_object_id();
        self.lock()?.push((id.clone(), generation.clone()));
        Ok(id)
    }

    async fn recent_generations(&self, limit: i64) -> Result<Vec<RecentItem>, StoreError> {
        let entries = self.lock()?;
        let mut items: Vec<&(String, StoredGeneration)> = entries.iter().collect();
        // Stable sort keeps insertion order reversed for equal timestamps.
        items.reverse();
        items.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));

        // Same convention as MongoDB: 0 means no limit, negatives count by magnitude.
        let take = match limit.unsigned_abs() {
            0 => items.len(),
            n => usize::try_from(n).unwrap_or(usize::MAX),
        };

        Ok(items
            .into_iter()
            .take(take)
            .map(|(id, g)| RecentItem {
                id: id.clone(),
                prompt: g.prompt.clone(),
                created_at: Some(g.created_at.to_rfc3339()),
            })
            .collect())
    }

    async fn list_collections(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        Ok(self.collections.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationRequest;
    use chrono::{Duration, Utc};

    fn stored(prompt: &str, age_secs: i64) -> StoredGeneration {
        let request = GenerationRequest {
            prompt: prompt.to_string(),
            tone: "Casual".to_string(),
            sentiment: "Neutral".to_string(),
            length: "Short".to_string(),
            creativity: 0.35,
            variants: 1,
        };
        StoredGeneration::new(
            &request,
            &["text".to_string()],
            Utc::now() - Duration::seconds(age_secs),
        )
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_limited() {
        let store = InMemoryStore::new();
        store.insert_generation(&stored("oldest", 30)).await.unwrap();
        store.insert_generation(&stored("newest", 0)).await.unwrap();
        store.insert_generation(&stored("middle", 10)).await.unwrap();

        let recent = store.recent_generations(2).await.unwrap();
        let prompts: Vec<_> = recent.iter().map(|r| r.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["newest", "middle"]);
        assert!(recent.iter().all(|r| r.created_at.is_some()));
    }

    #[tokio::test]
    async fn zero_limit_returns_everything() {
        let store = InMemoryStore::new();
        for i in 0..4 {
            store.insert_generation(&stored("p", i)).await.unwrap();
        }
        assert_eq!(store.recent_generations(0).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn insert_assigns_object_id() {
        let store = InMemoryStore::new();
        let id = store.insert_generation(&stored("p", 0)).await.unwrap();
        assert_eq!(id.len(), 24);
        assert_eq!(store.len(), 1);
    }
}
