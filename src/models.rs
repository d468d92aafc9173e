use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Farmer,
    Inspector,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Inspector => "inspector",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "farmer" => Some(Role::Farmer),
            "inspector" => Some(Role::Inspector),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Farms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FarmType {
    Poultry,
    Swine,
    Dairy,
    Mixed,
    Crop,
}

impl FarmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmType::Poultry => "poultry",
            FarmType::Swine => "swine",
            FarmType::Dairy => "dairy",
            FarmType::Mixed => "mixed",
            FarmType::Crop => "crop",
        }
    }

    pub fn parse(s: &str) -> Option<FarmType> {
        match s {
            "poultry" => Some(FarmType::Poultry),
            "swine" => Some(FarmType::Swine),
            "dairy" => Some(FarmType::Dairy),
            "mixed" => Some(FarmType::Mixed),
            "crop" => Some(FarmType::Crop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BiosecurityTier {
    Basic,
    Intermediate,
    Advanced,
    Premium,
}

impl BiosecurityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BiosecurityTier::Basic => "basic",
            BiosecurityTier::Intermediate => "intermediate",
            BiosecurityTier::Advanced => "advanced",
            BiosecurityTier::Premium => "premium",
        }
    }

    pub fn parse(s: &str) -> Option<BiosecurityTier> {
        match s {
            "basic" => Some(BiosecurityTier::Basic),
            "intermediate" => Some(BiosecurityTier::Intermediate),
            "advanced" => Some(BiosecurityTier::Advanced),
            "premium" => Some(BiosecurityTier::Premium),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Farm {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub farm_type: FarmType,
    pub biosecurity_tier: Option<BiosecurityTier>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Farm {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Inspections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InspectionResult {
    Pass,
    Attention,
    Fail,
}

impl InspectionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionResult::Pass => "pass",
            InspectionResult::Attention => "attention",
            InspectionResult::Fail => "fail",
        }
    }

    pub fn parse(s: &str) -> Option<InspectionResult> {
        match s {
            "pass" => Some(InspectionResult::Pass),
            "attention" => Some(InspectionResult::Attention),
            "fail" => Some(InspectionResult::Fail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Inspection {
    pub id: String,
    pub farm_id: String,
    pub inspector_user_id: String,
    pub inspected_at: DateTime<Utc>,
    pub result: InspectionResult,
    pub failed_checks: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    ProductionSummary,
    HealthReport,
    BiosecurityAudit,
    FinancialReport,
    ComplianceReport,
    RiskAssessment,
    AiInsights,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::ProductionSummary => "production_summary",
            ReportType::HealthReport => "health_report",
            ReportType::BiosecurityAudit => "biosecurity_audit",
            ReportType::FinancialReport => "financial_report",
            ReportType::ComplianceReport => "compliance_report",
            ReportType::RiskAssessment => "risk_assessment",
            ReportType::AiInsights => "ai_insights",
        }
    }

    pub fn parse(s: &str) -> Option<ReportType> {
        match s {
            "production_summary" => Some(ReportType::ProductionSummary),
            "health_report" => Some(ReportType::HealthReport),
            "biosecurity_audit" => Some(ReportType::BiosecurityAudit),
            "financial_report" => Some(ReportType::FinancialReport),
            "compliance_report" => Some(ReportType::ComplianceReport),
            "risk_assessment" => Some(ReportType::RiskAssessment),
            "ai_insights" => Some(ReportType::AiInsights),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Processing => "processing",
            ReportStatus::Completed => "completed",
            ReportStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<ReportStatus> {
        match s {
            "pending" => Some(ReportStatus::Pending),
            "processing" => Some(ReportStatus::Processing),
            "completed" => Some(ReportStatus::Completed),
            "failed" => Some(ReportStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Completed | ReportStatus::Failed)
    }
}

/// Report generation window. Both ends optional; an open window means
/// "whatever history is on file".
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportWindow {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ReportWindow {
    /// Forecast depth in days for the weather provider, clamped to the
    /// provider's short-range horizon.
    pub fn forecast_days(&self) -> u32 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end > start => {
                let days = (end - start).num_days().max(1) as u32;
                days.min(7)
            }
            _ => 3,
        }
    }
}

/// Persisted report row. `content` and `error_message` are mutually
/// exclusive: content only on `completed`, error only on `failed`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Report {
    pub id: String,
    pub user_id: String,
    pub farm_id: Option<String>,
    pub report_type: ReportType,
    pub title: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub include_details: bool,
    pub status: ReportStatus,
    #[schema(value_type = Object)]
    pub content: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    pub fn window(&self) -> ReportWindow {
        ReportWindow {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

// ---------------------------------------------------------------------------
// Ephemeral pipeline values (never persisted on their own)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub date: NaiveDate,
    pub temperature_avg: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity_percent: f64,
    pub precipitation_mm: f64,
    pub wind_kph: f64,
    pub condition: String,
    pub synthetic: bool,
    pub forecast: Vec<DailyForecast>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub precipitation_mm: f64,
    pub condition: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub inspection_score: f64,
    pub weather_score: f64,
    pub biosecurity_score: f64,
    pub overall_score: f64,
}

// ---------------------------------------------------------------------------
// Report content payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// One step up, saturating at critical.
    pub fn escalate(self) -> RiskLevel {
        match self {
            RiskLevel::Low => RiskLevel::Medium,
            RiskLevel::Medium => RiskLevel::High,
            RiskLevel::High | RiskLevel::Critical => RiskLevel::Critical,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskEntry {
    pub risk: String,
    pub level: RiskLevel,
    pub score: f64,
    pub impact: String,
    pub mitigation: String,
    pub timeline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingGroup {
    pub category: String,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub priority: String,
    pub effort: String,
    pub impact: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

/// The free-form structured payload stored on a completed report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportContent {
    pub summary: String,
    pub key_metrics: std::collections::BTreeMap<String, serde_json::Value>,
    pub findings: Vec<FindingGroup>,
    pub risks: Vec<RiskEntry>,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub charts: Vec<ChartSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub degradation_notes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateFarmRequest {
    pub name: String,
    pub farm_type: FarmType,
    pub biosecurity_tier: Option<BiosecurityTier>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateFarmRequest {
    pub name: Option<String>,
    pub farm_type: Option<FarmType>,
    pub biosecurity_tier: Option<BiosecurityTier>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateInspectionRequest {
    pub inspected_at: Option<DateTime<Utc>>,
    pub result: InspectionResult,
    #[serde(default)]
    pub failed_checks: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReportParameters {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub include_details: bool,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateReportRequest {
    pub title: String,
    pub report_type: ReportType,
    pub farm_id: Option<String>,
    #[serde(default)]
    pub parameters: Option<ReportParameters>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreateReportResponse {
    pub report_id: String,
    pub status: ReportStatus,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct InsightRequest {
    pub question: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct InsightResponse {
    pub farm_id: String,
    #[schema(value_type = Object)]
    pub insight: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_type_round_trip() {
        for t in [
            ReportType::ProductionSummary,
            ReportType::HealthReport,
            ReportType::BiosecurityAudit,
            ReportType::FinancialReport,
            ReportType::ComplianceReport,
            ReportType::RiskAssessment,
            ReportType::AiInsights,
        ] {
            assert_eq!(ReportType::parse(t.as_str()), Some(t));
        }
        assert_eq!(ReportType::parse("weather_report"), None);
    }

    #[test]
    fn test_report_type_serde_uses_snake_case() {
        let json = serde_json::to_string(&ReportType::BiosecurityAudit).unwrap();
        assert_eq!(json, "\"biosecurity_audit\"");
        let back: ReportType = serde_json::from_str("\"ai_insights\"").unwrap();
        assert_eq!(back, ReportType::AiInsights);
    }

    #[test]
    fn test_status_terminality() {
        assert!(!ReportStatus::Pending.is_terminal());
        assert!(!ReportStatus::Processing.is_terminal());
        assert!(ReportStatus::Completed.is_terminal());
        assert!(ReportStatus::Failed.is_terminal());
    }

    #[test]
    fn test_risk_level_escalation_saturates() {
        assert_eq!(RiskLevel::Low.escalate(), RiskLevel::Medium);
        assert_eq!(RiskLevel::High.escalate(), RiskLevel::Critical);
        assert_eq!(RiskLevel::Critical.escalate(), RiskLevel::Critical);
    }

    #[test]
    fn test_forecast_days_clamped() {
        let w = ReportWindow {
            start_date: Some("2026-01-01T00:00:00Z".parse().unwrap()),
            end_date: Some("2026-03-01T00:00:00Z".parse().unwrap()),
        };
        assert_eq!(w.forecast_days(), 7);

        let w = ReportWindow::default();
        assert_eq!(w.forecast_days(), 3);

        let w = ReportWindow {
            start_date: Some("2026-01-01T00:00:00Z".parse().unwrap()),
            end_date: Some("2026-01-03T00:00:00Z".parse().unwrap()),
        };
        assert_eq!(w.forecast_days(), 2);
    }

    #[test]
    fn test_farm_coordinates_require_both() {
        let mut farm = Farm {
            id: "f1".into(),
            owner_user_id: "u1".into(),
            name: "Hilltop".into(),
            farm_type: FarmType::Poultry,
            biosecurity_tier: None,
            latitude: Some(12.9),
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(farm.coordinates(), None);
        farm.longitude = Some(77.6);
        assert_eq!(farm.coordinates(), Some((12.9, 77.6)));
    }
}
