use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::farms::{ensure_farm_read, require_farm};
use crate::handlers::Pagination;
use crate::models::{CreateInspectionRequest, Inspection, ListResponse};
use crate::services::inspection_service;

/// POST /api/v1/farms/:id/inspections
#[utoipa::path(
    post,
    path = "/api/v1/farms/{id}/inspections",
    params(("id" = String, Path, description = "Farm id")),
    request_body = CreateInspectionRequest,
    responses(
        (status = 201, description = "Inspection recorded", body = Inspection),
        (status = 403, description = "Caller cannot inspect")
    )
)]
pub async fn create_inspection(
    State(state): State<AppState>,
    user: AuthUser,
    Path(farm_id): Path<String>,
    Json(request): Json<CreateInspectionRequest>,
) -> Result<(StatusCode, Json<Inspection>), ApiError> {
    if !user.can_inspect() {
        return Err(ApiError::Forbidden(
            "only inspectors can record inspections".to_string(),
        ));
    }
    let farm = require_farm(&state, &farm_id).await?;

    let now = Utc::now();
    let inspection = Inspection {
        id: uuid::Uuid::new_v4().to_string(),
        farm_id: farm.id,
        inspector_user_id: user.user_id,
        inspected_at: request.inspected_at.unwrap_or(now),
        result: request.result,
        failed_checks: request.failed_checks,
        notes: request.notes,
        created_at: now,
    };
    inspection_service::create_inspection(&state.pool, &inspection)
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(inspection)))
}

/// GET /api/v1/farms/:id/inspections
#[utoipa::path(
    get,
    path = "/api/v1/farms/{id}/inspections",
    params(("id" = String, Path, description = "Farm id"), Pagination),
    responses((status = 200, description = "Inspection history, most recent first"))
)]
pub async fn list_inspections(
    State(state): State<AppState>,
    user: AuthUser,
    Path(farm_id): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ListResponse<Inspection>>, ApiError> {
    let farm = require_farm(&state, &farm_id).await?;
    ensure_farm_read(&state, &farm, &user).await?;

    let total = inspection_service::count_inspections_by_farm(&state.pool, &farm.id)
        .await
        .map_err(ApiError::from)?;
    let items = inspection_service::list_inspections_by_farm(
        &state.pool,
        &farm.id,
        pagination.limit(),
        pagination.offset(),
    )
    .await
    .map_err(ApiError::from)?;

    Ok(Json(ListResponse {
        items,
        total,
        limit: pagination.limit(),
        offset: pagination.offset(),
    }))
}
