//! Project routes and the project-scoped document collection

use crate::{
    AppState,
    error::{ApiError, Result},
    extract::{Caller, ValidJson},
    models::{ApiResponse, CreateDocumentRequest, CreateProjectRequest, DocumentListQuery},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use projdoc_registry::{DocumentStats, Project, ProjectDocument, UserId};
use tracing::{debug, info};

/// Create project routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_project))
        .route("/{project_id}", get(get_project))
        .route(
            "/{project_id}/documents",
            get(list_documents).post(create_document),
        )
        .route("/{project_id}/documents/stats", get(document_stats))
}

async fn create_project(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ValidJson(request): ValidJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>)> {
    info!("Creating project '{}' for user {}", request.name, ctx.user_id);

    let members = request
        .member_ids
        .into_iter()
        .map(|m| UserId(m.trim().to_string()))
        .collect();

    let project = state
        .service
        .create_project(&ctx, request.name.trim().to_string(), request.visibility, members)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(project))))
}

async fn get_project(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path(project_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<ApiResponse<Project>>> {
    debug!("Getting project {}", project_id);

    let project = state.service.get_project(&ctx, project_id).await?;
    Ok(Json(ApiResponse::new(project)))
}

/// List a project's documents with optional filters
async fn list_documents(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path(project_id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<DocumentListQuery>, ApiError>,
) -> Result<Json<ApiResponse<Vec<ProjectDocument>>>> {
    debug!("Listing documents for project {}", project_id);

    let filter = query.into_filter()?;
    let documents = state
        .service
        .list_documents(&ctx, project_id, &filter)
        .await?;

    Ok(Json(ApiResponse::new(documents)))
}

/// Create a document from a template
async fn create_document(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path(project_id), _): WithRejection<Path<i64>, ApiError>,
    ValidJson(request): ValidJson<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProjectDocument>>)> {
    info!(
        "Creating {} document in project {}",
        request.template_type, project_id
    );

    let document = state
        .service
        .create_document(&ctx, project_id, request.into_input()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            document,
            "Document created".to_string(),
        )),
    ))
}

async fn document_stats(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path(project_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<ApiResponse<DocumentStats>>> {
    let stats = state.service.document_stats(&ctx, project_id).await?;
    Ok(Json(ApiResponse::new(stats)))
}
