//! Project and profile API models

use crate::error::FieldError;
use crate::extract::Validate;
use crate::models::api::check_name;
use projdoc_registry::ProjectVisibility;
use serde::Deserialize;

/// Request to create a project owned by the caller
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub visibility: ProjectVisibility,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

impl Validate for CreateProjectRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name("name", &self.name, &mut errors);
        if self.member_ids.iter().any(|m| m.trim().is_empty()) {
            errors.push(FieldError::new("memberIds", "must not contain empty ids"));
        }
        errors
    }
}

/// The caller's display profile
#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    pub name: String,
    pub email: String,
}

impl Validate for SaveProfileRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name("name", &self.name, &mut errors);
        if !self.email.contains('@') {
            errors.push(FieldError::new("email", "must be an email address"));
        }
        errors
    }
}
