//! Caller profile routes

use crate::{
    AppState,
    error::Result,
    extract::{Caller, ValidJson},
    models::{ApiResponse, SaveProfileRequest},
};
use axum::{Json, Router, extract::State, routing::put};
use projdoc_registry::User;
use tracing::info;

pub fn router() -> Router<AppState> {
    Router::new().route("/me", put(save_profile))
}

/// Store the caller's display name and email for editor attribution
async fn save_profile(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ValidJson(request): ValidJson<SaveProfileRequest>,
) -> Result<Json<ApiResponse<User>>> {
    info!("Saving profile for user {}", ctx.user_id);

    let user = state
        .service
        .save_profile(&ctx, request.name.trim().to_string(), request.email)
        .await?;

    Ok(Json(ApiResponse::new(user)))
}
