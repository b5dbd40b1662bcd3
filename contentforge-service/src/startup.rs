//! Application startup and lifecycle management.

use crate::config::ContentForgeConfig;
use crate::handlers::{diagnostics, generate, health, recent, root};
use crate::services::metrics::http_metrics_middleware;
use crate::services::{connect_store, GenerationStore};
use axum::{
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, security_headers_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ContentForgeConfig,
    pub store: Arc<dyn GenerationStore>,
}

impl AppState {
    pub fn new(config: ContentForgeConfig, store: Arc<dyn GenerationStore>) -> Self {
        Self { config, store }
    }
}

/// Build the HTTP router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::read_root))
        .route("/api/hello", get(root::hello))
        .route("/test", get(diagnostics::test_database))
        .route("/api/generate", post(generate::generate_content))
        .route("/api/recent", get(recent::recent_generations))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics_endpoint))
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Store problems never fail the build; only binding the listener can.
    pub async fn build(config: ContentForgeConfig) -> Result<Self, AppError> {
        let store = connect_store(&config.database).await;
        Self::build_with_store(config, store).await
    }

    /// Build the application around an existing store.
    pub async fn build_with_store(
        config: ContentForgeConfig,
        store: Arc<dyn GenerationStore>,
    ) -> Result<Self, AppError> {
        // Bind HTTP listener (port 0 = random port for testing)
        let http_addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", http_addr, e);
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(
            port = http_port,
            persistence = config.database.is_configured(),
            "ContentForge service listening"
        );

        Ok(Self {
            http_port,
            http_listener,
            state: AppState::new(config, store),
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.http_listener, router).await
    }

    /// Run the application until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_with_graceful_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state);
        axum::serve(self.http_listener, router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
