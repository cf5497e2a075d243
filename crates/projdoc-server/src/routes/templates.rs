//! Template catalogue routes

use crate::{
    AppState,
    error::{ApiError, Result},
    models::{ApiResponse, TemplateValidationRequest, TemplateValidationResponse, ValidationMessage},
};
use axum::{
    Json, Router,
    extract::Path,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use projdoc::{CategoryInfo, DocumentContent, DocumentTemplate, TemplateInfo, TemplateType, templates};
use tracing::debug;

/// Create template routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates))
        .route("/categories", get(list_categories))
        .route("/{template_type}", get(get_template))
        .route("/{template_type}/validate", post(validate_content))
}

fn parse_template_type(raw: &str) -> Result<TemplateType> {
    raw.parse()
        .map_err(|_| ApiError::template_not_found(raw))
}

/// List every template, grouped by category
async fn list_templates() -> Json<ApiResponse<Vec<TemplateInfo>>> {
    Json(ApiResponse::new(templates::list_all_template_info()))
}

async fn list_categories() -> Json<ApiResponse<Vec<CategoryInfo>>> {
    Json(ApiResponse::new(templates::list_categories()))
}

/// Get a template with its default content
async fn get_template(
    WithRejection(Path(template_type), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<ApiResponse<&'static DocumentTemplate>>> {
    debug!("Getting template: {}", template_type);

    let template_type = parse_template_type(&template_type)?;
    let template = templates::get_template(template_type)
        .ok_or_else(|| ApiError::template_not_found(template_type.as_str()))?;

    Ok(Json(ApiResponse::new(template)))
}

/// Check content against a template's shape without storing anything
async fn validate_content(
    WithRejection(Path(template_type), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<TemplateValidationRequest>, ApiError>,
) -> Result<Json<ApiResponse<TemplateValidationResponse>>> {
    debug!("Validating content for template: {}", template_type);

    let template_type = parse_template_type(&template_type)?;

    let response = match DocumentContent::parse(template_type, &request.content) {
        Ok(_) => TemplateValidationResponse {
            valid: true,
            errors: Vec::new(),
            warnings: DocumentContent::unknown_keys(template_type, &request.content)
                .into_iter()
                .map(|key| ValidationMessage {
                    message: format!("'{}' is not part of the {} shape", key, template_type),
                    field: Some(key),
                })
                .collect(),
        },
        Err(e) => TemplateValidationResponse {
            valid: false,
            errors: vec![ValidationMessage {
                message: e.to_string(),
                field: None,
            }],
            warnings: Vec::new(),
        },
    };

    Ok(Json(ApiResponse::new(response)))
}
