use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::error;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::farms::require_farm;
use crate::handlers::Pagination;
use crate::models::{
    CreateReportRequest, CreateReportResponse, ListResponse, Report, ReportStatus, Role,
};
use crate::services::report_worker::ReportJob;
use crate::services::{inspection_service, report_service};

/// POST /api/v1/reports
///
/// Accepts the request, persists a pending row, and hands the id to the
/// background worker. The caller gets a 202 immediately; generation outcomes
/// land on the report row, never on this response.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 202, description = "Report accepted for generation", body = CreateReportResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Unknown farm")
    )
)]
pub async fn create_report(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<CreateReportResponse>), ApiError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("report title is required".to_string()));
    }

    let parameters = request.parameters.unwrap_or(crate::models::ReportParameters {
        start_date: None,
        end_date: None,
        include_details: false,
    });
    if let (Some(start), Some(end)) = (parameters.start_date, parameters.end_date) {
        if end < start {
            return Err(ApiError::Validation(
                "end_date must not precede start_date".to_string(),
            ));
        }
    }

    if let Some(farm_id) = &request.farm_id {
        let farm = require_farm(&state, farm_id).await?;
        if !user.is_admin() && farm.owner_user_id != user.user_id {
            return Err(ApiError::Forbidden("not your farm".to_string()));
        }
    }

    let now = Utc::now();
    let report = Report {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id,
        farm_id: request.farm_id,
        report_type: request.report_type,
        title: title.to_string(),
        start_date: parameters.start_date,
        end_date: parameters.end_date,
        include_details: parameters.include_details,
        status: ReportStatus::Pending,
        content: None,
        error_message: None,
        generated_at: None,
        created_at: now,
        updated_at: now,
    };
    report_service::create_report(&state.pool, &report)
        .await
        .map_err(ApiError::from)?;

    if let Err(e) = state.job_tx.try_send(ReportJob {
        report_id: report.id.clone(),
    }) {
        error!("report {} could not be queued: {}", report.id, e);
        // A row that will never be picked up is worse than a failed one.
        report_service::mark_failed(&state.pool, &report.id, "report queue unavailable")
            .await
            .map_err(ApiError::from)?;
        return Err(ApiError::Internal("report queue unavailable".to_string()));
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateReportResponse {
            report_id: report.id,
            status: ReportStatus::Processing,
        }),
    ))
}

/// GET /api/v1/reports
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    params(Pagination),
    responses((status = 200, description = "Reports owned by the caller"))
)]
pub async fn list_reports(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ListResponse<Report>>, ApiError> {
    let total = report_service::count_reports_by_user(&state.pool, &user.user_id)
        .await
        .map_err(ApiError::from)?;
    let items = report_service::list_reports_by_user(
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

/// GET /api/v1/reports/:id
///
/// Owner and admin always; an inspector may read when they have an
/// inspection on the report's farm.
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    params(("id" = String, Path, description = "Report id")),
    responses(
        (status = 200, description = "Full report incl. status and content", body = Report),
        (status = 404, description = "Unknown report")
    )
)]
pub async fn get_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Report>, ApiError> {
    let report = report_service::find_report(&state.pool, &id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound(format!("report {}", id)))?;

    if report.user_id == user.user_id || user.is_admin() {
        return Ok(Json(report));
    }
    if user.role == Role::Inspector {
        if let Some(farm_id) = &report.farm_id {
            if inspection_service::inspector_has_inspection(&state.pool, farm_id, &user.user_id)
                .await
                .map_err(ApiError::from)?
            {
                return Ok(Json(report));
            }
        }
    }
    Err(ApiError::Forbidden("not your report".to_string()))
}

/// DELETE /api/v1/reports/:id
pub async fn delete_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let report = report_service::find_report(&state.pool, &id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound(format!("report {}", id)))?;

    if report.user_id != user.user_id && !user.is_admin() {
        return Err(ApiError::Forbidden("not your report".to_string()));
    }
    report_service::delete_report(&state.pool, &id)
        .await
        .map_err(ApiError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
