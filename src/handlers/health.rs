use axum::{response::IntoResponse, Json};

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service health"))
)]
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "farm-reports",
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}
