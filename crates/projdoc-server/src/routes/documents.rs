//! Single-document routes: editing, status, cloning and version history

use crate::{
    AppState,
    error::{ApiError, Result},
    extract::{Caller, ValidJson},
    models::{
        ApiResponse, CloneDocumentRequest, RestoreVersionRequest, UpdateDocumentRequest,
        UpdateStatusRequest,
    },
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use axum_extra::extract::WithRejection;
use projdoc_registry::{DocumentDetails, DocumentVersion, ProjectDocument};
use tracing::{debug, info};

/// Create document routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(get_document)
                .put(update_document)
                .delete(delete_document),
        )
        .route("/{id}/status", patch(update_status))
        .route("/{id}/clone", post(clone_document))
        .route("/{id}/versions", get(list_versions))
        .route("/{id}/versions/restore", post(restore_version))
        .route("/{id}/versions/{version}", get(get_version))
}

/// Get a document with its last editor, project and recent versions
async fn get_document(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<ApiResponse<DocumentDetails>>> {
    debug!("Getting document {}", id);

    let details = state.service.get_document(&ctx, id).await?;
    Ok(Json(ApiResponse::new(details)))
}

async fn update_document(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    ValidJson(request): ValidJson<UpdateDocumentRequest>,
) -> Result<Json<ApiResponse<ProjectDocument>>> {
    info!("Updating document {} by user {}", id, ctx.user_id);

    let document = state
        .service
        .update_document(&ctx, id, request.into())
        .await?;

    Ok(Json(ApiResponse::new(document)))
}

async fn delete_document(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode> {
    info!("Deleting document {} by user {}", id, ctx.user_id);

    state.service.delete_document(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_status(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    ValidJson(request): ValidJson<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<ProjectDocument>>> {
    info!("Setting status of document {} to {}", id, request.status);

    let document = state
        .service
        .update_status(&ctx, id, request.status, request.expected_version)
        .await?;

    Ok(Json(ApiResponse::new(document)))
}

/// Copy a document as a new draft, optionally into another project
async fn clone_document(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    ValidJson(request): ValidJson<CloneDocumentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProjectDocument>>)> {
    info!("Cloning document {}", id);

    let document = state
        .service
        .clone_document(&ctx, id, request.into())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(document))))
}

/// Full version history, newest first
async fn list_versions(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<ApiResponse<Vec<DocumentVersion>>>> {
    let versions = state.service.list_versions(&ctx, id).await?;
    Ok(Json(ApiResponse::new(versions)))
}

/// A single snapshot; `data` is null when that version was never recorded
async fn get_version(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path((id, version)), _): WithRejection<Path<(i64, i64)>, ApiError>,
) -> Result<Json<ApiResponse<Option<DocumentVersion>>>> {
    debug!("Getting version {} of document {}", version, id);

    let snapshot = state.service.get_version(&ctx, id, version).await?;
    Ok(Json(ApiResponse::new(snapshot)))
}

async fn restore_version(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    ValidJson(request): ValidJson<RestoreVersionRequest>,
) -> Result<Json<ApiResponse<ProjectDocument>>> {
    info!("Restoring document {} to version {}", id, request.version);

    let version = request.version;
    let document = state
        .service
        .restore_version(&ctx, id, request.into())
        .await?;

    Ok(Json(ApiResponse::with_message(
        document,
        format!("Restored to version {}", version),
    )))
}
