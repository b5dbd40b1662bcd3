use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Collection that stores generation documents unless overridden.
const DEFAULT_GENERATION_COLLECTION: &str = "generation";

#[derive(Debug, Clone, Deserialize)]
pub struct ContentForgeConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub database: DatabaseConfig,
}

/// Store connection settings. Both `url` and `name` are optional: without
/// them the service still starts and serves degraded responses.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub name: Option<String>,
    pub collection: String,
}

impl DatabaseConfig {
    /// Settings with no store configured.
    pub fn unconfigured() -> Self {
        Self {
            url: None,
            name: None,
            collection: DEFAULT_GENERATION_COLLECTION.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.name.is_some()
    }
}

impl ContentForgeConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(ContentForgeConfig {
            common: common_config,
            database: DatabaseConfig {
                url: get_optional_env("DATABASE_URL"),
                name: get_optional_env("DATABASE_NAME"),
                collection: get_optional_env("GENERATION_COLLECTION")
                    .unwrap_or_else(|| DEFAULT_GENERATION_COLLECTION.to_string()),
            },
        })
    }
}

/// Read an environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
