//! Server configuration management

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// `sqlite:` connection string, or `memory` for the in-memory store
    pub database_url: String,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,

    /// Apply project access checks to read endpoints
    pub check_read_access: bool,

    /// Reject document content that does not match its template shape
    pub validate_content_on_write: bool,

    /// Request body limit in bytes
    pub max_body_bytes: usize,

    /// Whether to enable debug logging
    pub debug: bool,
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|s| matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid PORT value".to_string()))?,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./data/projdoc.db".to_string()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            check_read_access: env_flag("CHECK_READ_ACCESS", true),
            validate_content_on_write: env_flag("VALIDATE_CONTENT_ON_WRITE", false),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| (2 * 1024 * 1024).to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid MAX_BODY_BYTES value".to_string()))?,
            debug: env_flag("DEBUG", false),
        })
    }

    /// Whether the in-memory store was requested
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.eq_ignore_ascii_case("memory")
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: "memory".to_string(),
            cors_origins: vec!["*".to_string()],
            check_read_access: true,
            validate_content_on_write: false,
            max_body_bytes: 2 * 1024 * 1024,
            debug: false,
        }
    }
}
