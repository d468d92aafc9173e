use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::Pagination;
use crate::models::{CreateFarmRequest, Farm, ListResponse, Role, UpdateFarmRequest};
use crate::services::{farm_service, inspection_service};

/// Owner or admin. Inspectors get read access separately where it applies.
fn ensure_farm_owner(farm: &Farm, user: &AuthUser) -> Result<(), ApiError> {
    if user.is_admin() || farm.owner_user_id == user.user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden("not your farm".to_string()))
    }
}

pub async fn require_farm(state: &AppState, farm_id: &str) -> Result<Farm, ApiError> {
    farm_service::find_farm(&state.pool, farm_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound(format!("farm {}", farm_id)))
}

/// Read access to a farm: owner, admin, or an inspector with an inspection
/// on file for it.
pub async fn ensure_farm_read(
    state: &AppState,
    farm: &Farm,
    user: &AuthUser,
) -> Result<(), ApiError> {
    if user.is_admin() || farm.owner_user_id == user.user_id {
        return Ok(());
    }
    if user.role == Role::Inspector
        && inspection_service::inspector_has_inspection(&state.pool, &farm.id, &user.user_id)
            .await
            .map_err(ApiError::from)?
    {
        return Ok(());
    }
    Err(ApiError::Forbidden("not your farm".to_string()))
}

/// POST /api/v1/farms
#[utoipa::path(
    post,
    path = "/api/v1/farms",
    request_body = CreateFarmRequest,
    responses(
        (status = 201, description = "Farm created", body = Farm),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_farm(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateFarmRequest>,
) -> Result<(StatusCode, Json<Farm>), ApiError> {
    if user.role == Role::Inspector {
        return Err(ApiError::Forbidden(
            "inspectors cannot register farms".to_string(),
        ));
    }
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("farm name is required".to_string()));
    }
    if let (Some(lat), Some(lon)) = (request.latitude, request.longitude) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ApiError::Validation("coordinates out of range".to_string()));
        }
    }

    let now = Utc::now();
    let farm = Farm {
        id: uuid::Uuid::new_v4().to_string(),
        owner_user_id: user.user_id,
        name: name.to_string(),
        farm_type: request.farm_type,
        biosecurity_tier: request.biosecurity_tier,
        latitude: request.latitude,
        longitude: request.longitude,
        created_at: now,
        updated_at: now,
    };
    farm_service::create_farm(&state.pool, &farm)
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(farm)))
}

/// GET /api/v1/farms
#[utoipa::path(
    get,
    path = "/api/v1/farms",
    params(Pagination),
    responses((status = 200, description = "Farms owned by the caller"))
)]
pub async fn list_farms(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ListResponse<Farm>>, ApiError> {
    let total = farm_service::count_farms_by_owner(&state.pool, &user.user_id)
        .await
        .map_err(ApiError::from)?;
    let items = farm_service::list_farms_by_owner(
        &state.pool,
        &user.user_id,
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

/// GET /api/v1/farms/:id
#[utoipa::path(
    get,
    path = "/api/v1/farms/{id}",
    params(("id" = String, Path, description = "Farm id")),
    responses(
        (status = 200, description = "Farm detail", body = Farm),
        (status = 404, description = "Unknown farm")
    )
)]
pub async fn get_farm(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Farm>, ApiError> {
    let farm = require_farm(&state, &id).await?;
    ensure_farm_read(&state, &farm, &user).await?;
    Ok(Json(farm))
}

/// PUT /api/v1/farms/:id
pub async fn update_farm(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateFarmRequest>,
) -> Result<Json<Farm>, ApiError> {
    let mut farm = require_farm(&state, &id).await?;
    ensure_farm_owner(&farm, &user)?;

    if let Some(name) = request.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::Validation("farm name is required".to_string()));
        }
        farm.name = name;
    }
    if let Some(farm_type) = request.farm_type {
        farm.farm_type = farm_type;
    }
    if let Some(tier) = request.biosecurity_tier {
        farm.biosecurity_tier = Some(tier);
    }
    if request.latitude.is_some() {
        farm.latitude = request.latitude;
    }
    if request.longitude.is_some() {
        farm.longitude = request.longitude;
    }

    farm_service::update_farm(&state.pool, &farm)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(farm))
}

/// DELETE /api/v1/farms/:id
pub async fn delete_farm(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let farm = require_farm(&state, &id).await?;
    ensure_farm_owner(&farm, &user)?;
    farm_service::delete_farm(&state.pool, &id)
        .await
        .map_err(ApiError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
