//! Template-related API models

use serde::{Deserialize, Serialize};

/// Template validation request
#[derive(Debug, Deserialize)]
pub struct TemplateValidationRequest {
    pub content: serde_json::Value,
}

/// Template validation response
#[derive(Debug, Serialize)]
pub struct TemplateValidationResponse {
    pub valid: bool,
    pub errors: Vec<ValidationMessage>,
    pub warnings: Vec<ValidationMessage>,
}

#[derive(Debug, Serialize)]
pub struct ValidationMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
