//! Common API types and field checks
use crate::error::FieldError;
use serde::Serialize;
use serde_json::Value;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: String) -> Self {
        Self {
            data,
            message: Some(message),
        }
    }
}

pub fn check_name(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be empty"));
    } else if value.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new(
            field,
            format!("must be at most {} characters", MAX_NAME_LEN),
        ));
    }
}

pub fn check_description(field: &str, value: Option<&str>, errors: &mut Vec<FieldError>) {
    if value.is_some_and(|v| v.chars().count() > MAX_DESCRIPTION_LEN) {
        errors.push(FieldError::new(
            field,
            format!("must be at most {} characters", MAX_DESCRIPTION_LEN),
        ));
    }
}

pub fn check_content(field: &str, value: Option<&Value>, errors: &mut Vec<FieldError>) {
    if value.is_some_and(|v| !v.is_object()) {
        errors.push(FieldError::new(field, "must be a JSON object"));
    }
}

pub fn check_version(field: &str, value: Option<i64>, errors: &mut Vec<FieldError>) {
    if value.is_some_and(|v| v < 1) {
        errors.push(FieldError::new(field, "must be at least 1"));
    }
}
