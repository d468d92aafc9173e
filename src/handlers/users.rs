use axum::{extract::State, Json};
use chrono::Utc;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{UpdateProfileRequest, User};
use crate::services::user_service;

/// GET /api/v1/users/me
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Caller profile", body = User),
        (status = 404, description = "No profile stored yet")
    )
)]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<User>, ApiError> {
    user_service::find_user(&state.pool, &user.user_id)
        .await
        .map_err(ApiError::from)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("profile".to_string()))
}

/// PUT /api/v1/users/me
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Profile upserted", body = User))
)]
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("name is required".to_string()));
    }
    if !request.email.contains('@') {
        return Err(ApiError::Validation("email is invalid".to_string()));
    }

    let now = Utc::now();
    let profile = User {
        id: user.user_id,
        name,
        email: request.email,
        role: user.role,
        created_at: now,
        updated_at: now,
    };
    user_service::upsert_user(&state.pool, &profile)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(profile))
}
