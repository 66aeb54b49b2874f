//! HTTP server assembly.
//!
//! Builds the combined router over one shared application state and serves
//! it. Each request is processed synchronously; the only suspension points
//! are at the socket, so no application-level coordination exists beyond
//! the store's transaction lock.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::attribute_routes::attribute_routes;
use super::config::HttpServerConfig;
use super::project_routes::project_routes;
use crate::catalog::CatalogManager;
use crate::observability::Logger;
use crate::projects::ProjectService;
use crate::store::Store;
use crate::sync::Synchronizer;

/// Shared application state: every service is a cheap clone over the same
/// store.
pub struct AppState {
    pub store: Store,
    pub catalog: CatalogManager,
    pub projects: ProjectService,
    pub synchronizer: Synchronizer,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            catalog: CatalogManager::new(store.clone()),
            projects: ProjectService::new(store.clone()),
            synchronizer: Synchronizer::new(store.clone()),
            store,
        }
    }
}

/// The HTTP server.
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given store with custom configuration.
    pub fn with_config(store: Store, config: HttpServerConfig) -> Self {
        let router = build_router(Arc::new(AppState::new(store)), &config);
        Self { config, router }
    }

    /// Create a server with default configuration.
    pub fn new(store: Store) -> Self {
        Self::with_config(store, HttpServerConfig::default())
    }

    /// The assembled router, for serving or for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind and serve until the process exits.
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;
        Logger::info("server_started", &[("addr", &addr)]);
        axum::serve(listener, self.router).await
    }
}

fn build_router(state: Arc<AppState>, config: &HttpServerConfig) -> Router {
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(health))
        .merge(attribute_routes(state.clone()))
        .merge(project_routes(state))
        .layer(cors)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_services_share_the_store() {
        let state = AppState::new(Store::new());
        state.store.transaction(|t| {
            t.project_ids.next();
        });
        // catalog sees the same sequence state through its clone
        let next = state.store.transaction(|t| t.project_ids.next());
        assert_eq!(next, 2);
    }

    #[test]
    fn test_router_builds_with_and_without_origins() {
        let _ = HttpServer::new(Store::new()).router();
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..Default::default()
        };
        let _ = HttpServer::with_config(Store::new(), config).router();
    }
}
