//! Request extractors: caller identity and validated JSON bodies

use crate::error::{ApiError, FieldError};
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use projdoc_registry::{RequestContext, TenantId, UserId};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Header carrying the authenticated user id, set by the upstream gateway
pub const USER_HEADER: &str = "x-user-id";

/// Header carrying the caller's tenant
pub const TENANT_HEADER: &str = "x-tenant-id";

/// The authenticated caller and their tenant context
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_HEADER).ok_or(ApiError::Unauthorized)?;
        let tenant_id = header_value(parts, TENANT_HEADER).map(TenantId);

        Ok(Caller(RequestContext {
            user_id: UserId(user_id),
            tenant_id,
        }))
    }
}

/// Turn a body deserialization failure into the field it concerns
///
/// Serde reports a missing field against the enclosing object, so the field
/// name is recovered from the message and joined onto that path.
fn body_field_error(err: &serde_path_to_error::Error<serde_json::Error>) -> FieldError {
    let path = err.path().to_string();
    let message = err.inner().to_string();

    let missing = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next());

    let field = match (path.as_str(), missing) {
        (".", Some(name)) => name.to_string(),
        (parent, Some(name)) => format!("{}.{}", parent, name),
        (".", None) => "body".to_string(),
        (path, None) => path.to_string(),
    };

    FieldError::new(field, message)
}

/// Request bodies that can check their own fields
pub trait Validate {
    /// All field problems, empty when the body is acceptable
    fn validate(&self) -> Vec<FieldError>;
}

/// JSON body that has been deserialized and passed `Validate`
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state).await?;
        let value: T = serde_path_to_error::deserialize(raw)
            .map_err(|e| ApiError::Validation(vec![body_field_error(&e)]))?;

        let errors = value.validate();
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(ValidJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UpdateStatusRequest;
    use serde_json::json;

    fn field_error<T: DeserializeOwned + std::fmt::Debug>(body: Value) -> FieldError {
        let err = serde_path_to_error::deserialize::<_, T>(body).unwrap_err();
        body_field_error(&err)
    }

    #[test]
    fn test_body_errors_name_the_field() {
        let missing = field_error::<UpdateStatusRequest>(json!({ "expectedVersion": 2 }));
        assert_eq!(missing.field, "status");
        assert!(missing.message.contains("missing field"));

        let bad_variant = field_error::<UpdateStatusRequest>(json!({ "status": "DONE" }));
        assert_eq!(bad_variant.field, "status");
        assert!(bad_variant.message.contains("DONE"));

        let wrong_type =
            field_error::<UpdateStatusRequest>(json!({ "status": "DRAFT", "expectedVersion": "two" }));
        assert_eq!(wrong_type.field, "expectedVersion");

        let scalar_body = field_error::<UpdateStatusRequest>(json!("IN_REVIEW"));
        assert_eq!(scalar_body.field, "body");
    }
}
