//! Error types for the projdoc registry

use thiserror::Error;

/// Registry-specific errors
///
/// Not-found and access variants are kept distinct so the HTTP layer can
/// map them to 404 and 403.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Tenant context required")]
    TenantContextRequired,

    #[error("Project not found: {0}")]
    ProjectNotFound(i64),

    #[error("Document not found: {0}")]
    DocumentNotFound(i64),

    #[error("Version {version} not found for document {document_id}")]
    VersionNotFound { document_id: i64, version: i64 },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unknown template type: {0}")]
    UnknownTemplateType(String),

    #[error("Invalid document status: {0}")]
    InvalidStatus(String),

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Version conflict: expected version {expected}, found {actual}")]
    Conflict { expected: i64, actual: i64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Time error: {0}")]
    Time(String),
}

impl RegistryError {
    /// True for every "does not exist" variant
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::ProjectNotFound(_)
                | RegistryError::DocumentNotFound(_)
                | RegistryError::VersionNotFound { .. }
        )
    }
}

impl From<projdoc::TemplateError> for RegistryError {
    fn from(e: projdoc::TemplateError) -> Self {
        match e {
            projdoc::TemplateError::UnknownType(t) => RegistryError::UnknownTemplateType(t),
            other => RegistryError::InvalidContent(other.to_string()),
        }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
