use axum::{
    extract::{Path, State},
    Json,
};

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::farms::{ensure_farm_read, require_farm};
use crate::models::{InsightRequest, InsightResponse};
use crate::services::generative::InsightError;
use crate::services::insights::{self, NarrativeResult};
use crate::services::inspection_service;

/// POST /api/v1/farms/:id/insights
///
/// Free-standing generative insight with no template fallback: an oracle
/// failure here surfaces as a typed upstream error instead of degrading.
#[utoipa::path(
    post,
    path = "/api/v1/farms/{id}/insights",
    params(("id" = String, Path, description = "Farm id")),
    request_body = InsightRequest,
    responses(
        (status = 200, description = "Generated insight", body = InsightResponse),
        (status = 502, description = "Generative service unavailable")
    )
)]
pub async fn farm_insights(
    State(state): State<AppState>,
    user: AuthUser,
    Path(farm_id): Path<String>,
    Json(request): Json<InsightRequest>,
) -> Result<Json<InsightResponse>, ApiError> {
    let farm = require_farm(&state, &farm_id).await?;
    ensure_farm_read(&state, &farm, &user).await?;

    let client = state
        .generative
        .as_ref()
        .ok_or(ApiError::Insight(InsightError::Disabled))?;

    let inspections = inspection_service::find_recent_inspections(
        &state.pool,
        &farm.id,
        state.recent_inspection_limit,
    )
    .await
    .map_err(ApiError::from)?;

    let mut prompt = insights::build_insight_prompt(
        Some(&farm),
        &inspections,
        crate::models::ReportType::AiInsights,
    );
    if let Some(question) = request.question.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        prompt.push_str("\n\nOperator question: ");
        prompt.push_str(question);
    }

    let raw = client.generate(&prompt).await?;
    let insight = NarrativeResult::parse(&raw).into_json();

    Ok(Json(InsightResponse {
        farm_id: farm.id,
        insight,
    }))
}
