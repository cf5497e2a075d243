//! Error handling for the API server

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use projdoc_registry::RegistryError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// A single rejected request field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Missing caller identity")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::TemplateNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Validation(_) | ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Registry(e) => match e {
                RegistryError::ProjectNotFound(_)
                | RegistryError::DocumentNotFound(_)
                | RegistryError::VersionNotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
                RegistryError::AccessDenied(_) => (StatusCode::FORBIDDEN, e.to_string()),
                RegistryError::Conflict { .. } => (StatusCode::CONFLICT, e.to_string()),
                RegistryError::TenantContextRequired
                | RegistryError::UnknownTemplateType(_)
                | RegistryError::InvalidStatus(_)
                | RegistryError::InvalidContent(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                RegistryError::Storage(_)
                | RegistryError::Serialization(_)
                | RegistryError::Time(_) => {
                    error!("Registry failure: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            ApiError::Config(_) => {
                error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ApiError::Io(_) => {
                error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16()
        });
        if let ApiError::Validation(fields) = &self {
            body["fields"] = json!(fields);
        }

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn template_not_found(template_type: &str) -> Self {
        Self::TemplateNotFound(template_type.to_string())
    }
}
