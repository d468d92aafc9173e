use sqlx::MySqlPool;
use tokio::sync::mpsc;

use crate::services::generative::GenerativeClient;
use crate::services::report_worker::ReportJob;

#[derive(Clone)]
pub struct AppState {
    pub pool: MySqlPool,
    pub job_tx: mpsc::Sender<ReportJob>,
    pub generative: Option<GenerativeClient>,
    pub recent_inspection_limit: u32,
}
