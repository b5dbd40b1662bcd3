#![allow(dead_code)]

use contentforge_service::config::{ContentForgeConfig, DatabaseConfig};
use contentforge_service::services::{GenerationStore, UnavailableStore};
use contentforge_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

pub fn test_config(database: DatabaseConfig) -> ContentForgeConfig {
    ContentForgeConfig {
        common: CoreConfig { port: 0 },
        database,
    }
}

impl TestApp {
    /// Spawn the service with no store configured.
    pub async fn spawn() -> Self {
        Self::spawn_with_store(
            DatabaseConfig::unconfigured(),
            Arc::new(UnavailableStore::unconfigured()),
        )
        .await
    }

    pub async fn spawn_with_store(
        database: DatabaseConfig,
        store: Arc<dyn GenerationStore>,
    ) -> Self {
        let app = Application::build_with_store(test_config(database), store)
            .await
            .expect("Failed to build test application");

        let port = app.http_port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }
}
