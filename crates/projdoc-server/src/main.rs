//! Projdoc HTTP API Server
//!
//! Provides REST API endpoints for browsing document templates and for
//! creating, editing and versioning project documents.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    response::Json,
    routing::get,
};
use projdoc_registry::{DocumentService, DocumentStore, MemoryStorage, ServiceOptions, SqliteStorage};
use serde_json::{Value, json};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

mod config;
mod error;
mod extract;
mod models;
mod routes;


use config::ServerConfig;
use error::{ApiError, Result};

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub service: DocumentService,
    pub config: ServerConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    let default_filter = if config.debug {
        "projdoc_server=debug,projdoc_registry=debug,tower_http=debug"
    } else {
        "projdoc_server=info,projdoc_registry=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        )
        .init();

    info!("Starting Projdoc Server on {}:{}", config.host, config.port);

    let store = open_store(&config).await?;
    let service = DocumentService::with_options(
        store,
        ServiceOptions {
            check_read_access: config.check_read_access,
            validate_content_on_write: config.validate_content_on_write,
        },
    );

    let state = AppState {
        service,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| ApiError::Config(format!("Invalid bind address {}", config.host)))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Open the document store named by `DATABASE_URL`
async fn open_store(config: &ServerConfig) -> Result<Arc<dyn DocumentStore>> {
    if config.uses_memory_store() {
        warn!("Using in-memory document store; data is lost on restart");
        return Ok(Arc::new(MemoryStorage::new()));
    }

    if let Some(dir) = sqlite_parent_dir(&config.database_url) {
        tokio::fs::create_dir_all(dir).await?;
    }

    let storage = SqliteStorage::new(&config.database_url).await?;
    info!("Opened SQLite store at {}", config.database_url);
    Ok(Arc::new(storage))
}

fn sqlite_parent_dir(url: &str) -> Option<&std::path::Path> {
    let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    std::path::Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = state.config.max_body_bytes;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // API routes
        .nest("/api", api_routes())
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", routes::templates::router())
        .nest("/projects", routes::projects::router())
        .nest("/project-documents", routes::documents::router())
        .nest("/users", routes::users::router())
}

/// Health check endpoint
async fn health_check() -> Result<Json<Value>> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "projdoc-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": time::OffsetDateTime::now_utc()
    })))
}
