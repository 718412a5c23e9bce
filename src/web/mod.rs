pub mod error;
mod extract;
mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::Method;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::db::{Database, Repository};
use crate::service::ForumService;

pub use routes::router;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: ForumService,
}

impl AppState {
    /// Build state over any repository implementation.
    #[must_use]
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self {
            service: ForumService::new(repo),
        }
    }

    /// Build state over the SQLite repository for `db`.
    #[must_use]
    pub fn from_database(db: &Database) -> Self {
        Self::new(Arc::new(db.repository()))
    }
}

/// Start the web server and run until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn serve<F>(config: Config, db: Database, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let app = create_app(AppState::from_database(&db), &config);

    info!(addr = %addr, prefix = %config.api_prefix, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router, with routes mounted under the
/// configured prefix.
pub fn create_app(state: AppState, config: &Config) -> Router {
    let routes = if config.api_prefix.is_empty() {
        router()
    } else {
        Router::new().nest(&config.api_prefix, router())
    };

    let mut app = routes;
    if config.cors_enabled {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        );
    }

    app.layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
