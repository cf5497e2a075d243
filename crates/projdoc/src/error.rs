//! Error types for the projdoc template catalogue

use thiserror::Error;

/// Template-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// No template is registered under the given type name
    #[error("Unknown template type: {0}")]
    UnknownType(String),

    #[error("Unknown document category: {0}")]
    UnknownCategory(String),

    /// Content does not match the shape registered for its template type
    #[error("Invalid content for {template_type}: {reason}")]
    InvalidContent {
        template_type: String,
        reason: String,
    },
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
