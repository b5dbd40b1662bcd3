//! `GET /test`: store connectivity report. Always answers 200.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::config::DatabaseConfig;
use crate::services::{StoreError, StoreStatus};
use crate::startup::AppState;

const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub store_status: String,
    pub collections: Vec<String>,
}

impl DiagnosticReport {
    /// Build the report from settings and the outcome of a collection listing.
    pub fn from_probe(config: &DatabaseConfig, probe: Result<Vec<String>, StoreError>) -> Self {
        let status = StoreStatus::from_probe(&probe);

        let (database, connection_status, collections) = match probe {
            Ok(collections) => ("✅ Connected & Working".to_string(), "Connected", collections),
            Err(StoreError::NotConfigured) => (
                "⚠️  Available but not initialized".to_string(),
                "Not Connected",
                Vec::new(),
            ),
            Err(StoreError::Connection(e)) => (
                format!("❌ Error: {}", clip(&e)),
                "Not Connected",
                Vec::new(),
            ),
            Err(StoreError::Operation(e)) => (
                format!("⚠️  Connected but Error: {}", clip(&e)),
                "Connected",
                Vec::new(),
            ),
        };

        DiagnosticReport {
            backend: "✅ Running".to_string(),
            database,
            database_url: presence(config.url.is_some()),
            database_name: presence(config.name.is_some()),
            connection_status: connection_status.to_string(),
            store_status: status.to_string(),
            collections,
        }
    }
}

fn presence(set: bool) -> String {
    let label = if set { "✅ Set" } else { "❌ Not Set" };
    label.to_string()
}

fn clip(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}

#[tracing::instrument(skip(state))]
pub async fn test_database(State(state): State<AppState>) -> Json<DiagnosticReport> {
    let probe = state.store.list_collections(MAX_COLLECTIONS).await;
    if let Err(e) = &probe {
        tracing::info!(error = %e, "Store probe failed");
    }
    Json(DiagnosticReport::from_probe(&state.config.database, probe))
}
