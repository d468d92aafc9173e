use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models::{
    BiosecurityTier, CreateFarmRequest, CreateInspectionRequest, CreateReportRequest,
    CreateReportResponse, Farm, FarmType, InsightRequest, InsightResponse, Inspection,
    InspectionResult, Report, ReportParameters, ReportStatus, ReportType, Role, UpdateFarmRequest,
    UpdateProfileRequest, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::farms::create_farm,
        crate::handlers::farms::list_farms,
        crate::handlers::farms::get_farm,
        crate::handlers::inspections::create_inspection,
        crate::handlers::inspections::list_inspections,
        crate::handlers::users::get_me,
        crate::handlers::users::update_me,
        crate::handlers::reports::create_report,
        crate::handlers::reports::list_reports,
        crate::handlers::reports::get_report,
        crate::handlers::insights::farm_insights,
    ),
    components(schemas(
        Farm,
        FarmType,
        BiosecurityTier,
        Inspection,
        InspectionResult,
        User,
        Role,
        Report,
        ReportType,
        ReportStatus,
        CreateFarmRequest,
        UpdateFarmRequest,
        CreateInspectionRequest,
        UpdateProfileRequest,
        CreateReportRequest,
        ReportParameters,
        CreateReportResponse,
        InsightRequest,
        InsightResponse,
    )),
    tags(
        (name = "farm-reports", description = "Farm biosecurity records and report generation")
    )
)]
pub struct ApiDoc;

pub fn routes() -> SwaggerUi {
    let openapi = ApiDoc::openapi();
    SwaggerUi::new("/api/v1/docs").url("/api/v1/openapi.json", openapi)
}
