use std::sync::Arc;

use chrono::Utc;
use sqlx::MySqlPool;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::models::{Report, ReportContent, ReportStatus};
use crate::services::generative::GenerativeClient;
use crate::services::insights::{self, InsightCatalog, NarrativeResult, RandomSamples, SampleSource};
use crate::services::scoring;
use crate::services::weather::WeatherService;
use crate::services::{farm_service, inspection_service, report_service};

/// One queued generation attempt. The queue is keyed by report id; the single
/// consumer below is the only writer of report status and content.
#[derive(Debug, Clone)]
pub struct ReportJob {
    pub report_id: String,
}

#[derive(Clone)]
pub struct WorkerContext {
    pub pool: MySqlPool,
    pub weather: WeatherService,
    pub generative: Option<GenerativeClient>,
    pub catalog: Arc<InsightCatalog>,
    pub recent_inspection_limit: u32,
}

/// Structural failures only. Degraded weather or narrative inputs are handled
/// inline and never surface here.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("farm not found")]
    FarmNotFound,

    #[error("store operation failed: {0}")]
    Store(#[from] anyhow::Error),
}

pub fn spawn_report_worker(
    ctx: WorkerContext,
    mut rx: mpsc::Receiver<ReportJob>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("report worker started");
        while let Some(job) = rx.recv().await {
            process_job(&ctx, &job).await;
        }
        info!("report worker shutting down");
    })
}

async fn process_job(ctx: &WorkerContext, job: &ReportJob) {
    let report = match report_service::find_report(&ctx.pool, &job.report_id).await {
        Ok(Some(report)) => report,
        Ok(None) => {
            warn!("report {} vanished before generation", job.report_id);
            return;
        }
        Err(e) => {
            error!("report {} lookup failed: {:#}", job.report_id, e);
            return;
        }
    };

    if report.status != ReportStatus::Pending {
        warn!(
            "skipping report {} in status {}",
            report.id,
            report.status.as_str()
        );
        return;
    }

    // The processing marker is persisted before any external call, so an
    // interrupted run leaves a durable marker rather than a silent pending row.
    match report_service::mark_processing(&ctx.pool, &report.id).await {
        Ok(true) => {}
        Ok(false) => {
            warn!("report {} was already claimed", report.id);
            return;
        }
        Err(e) => {
            error!("report {} could not be claimed: {:#}", report.id, e);
            return;
        }
    }

    match generate(ctx, &report).await {
        Ok(content) => {
            let json = match serde_json::to_string(&content) {
                Ok(json) => json,
                Err(e) => {
                    record_failure(ctx, &report.id, &format!("content serialization failed: {}", e))
                        .await;
                    return;
                }
            };
            match report_service::mark_completed(&ctx.pool, &report.id, &json, Utc::now()).await {
                Ok(()) => info!("report {} completed", report.id),
                Err(e) => error!("report {} result could not be persisted: {:#}", report.id, e),
            }
        }
        Err(e) => {
            warn!("report {} generation failed: {:#}", report.id, e);
            record_failure(ctx, &report.id, &e.to_string()).await;
        }
    }
}

async fn record_failure(ctx: &WorkerContext, report_id: &str, message: &str) {
    if let Err(e) = report_service::mark_failed(&ctx.pool, report_id, message).await {
        error!("report {} failure could not be persisted: {:#}", report_id, e);
    }
}

/// Runs the pipeline for one report: farm and history lookup, weather,
/// scoring, then synthesis. Weather and scoring always complete before
/// synthesis begins.
async fn generate(ctx: &WorkerContext, report: &Report) -> Result<ReportContent, GenerationError> {
    let farm = match &report.farm_id {
        Some(farm_id) => Some(
            farm_service::find_farm(&ctx.pool, farm_id)
                .await?
                .ok_or(GenerationError::FarmNotFound)?,
        ),
        None => None,
    };

    let inspections = match &farm {
        Some(f) => {
            inspection_service::find_recent_inspections(
                &ctx.pool,
                &f.id,
                ctx.recent_inspection_limit,
            )
            .await?
        }
        None => Vec::new(),
    };

    let mut degradation_notes = Vec::new();

    let coords = farm.as_ref().and_then(|f| f.coordinates());
    let weather = ctx.weather.fetch(coords, &report.window()).await;
    if weather.synthetic {
        degradation_notes.push(
            if coords.is_none() {
                "no farm coordinates; synthetic conditions used"
            } else {
                "weather provider unavailable; synthetic conditions used"
            }
            .to_string(),
        );
    }

    let scores = scoring::score(farm.as_ref(), &inspections, &weather);

    let narrative = match &ctx.generative {
        Some(client) => {
            let prompt =
                insights::build_insight_prompt(farm.as_ref(), &inspections, report.report_type);
            match client.generate(&prompt).await {
                Ok(raw) => Some(NarrativeResult::parse(&raw)),
                Err(e) => {
                    warn!("narrative augmentation failed for report {}: {}", report.id, e);
                    degradation_notes
                        .push("narrative service unavailable; template insights only".to_string());
                    None
                }
            }
        }
        None => None,
    };

    let mut samples = RandomSamples::seeded(chart_seed(&report.id));
    let samples = report
        .include_details
        .then_some(&mut samples as &mut dyn SampleSource);

    Ok(insights::synthesize(
        farm.as_ref(),
        &weather,
        &scores,
        &inspections,
        report.report_type,
        &ctx.catalog,
        narrative,
        degradation_notes,
        samples,
    ))
}

/// Chart filler varies per report but stays reproducible for a given id.
fn chart_seed(report_id: &str) -> u64 {
    report_id
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
            (h ^ b as u64).wrapping_mul(0x100_0000_01b3)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_seed_is_stable_per_report() {
        let a = chart_seed("7b0c5a3e-1111-2222-3333-444455556666");
        let b = chart_seed("7b0c5a3e-1111-2222-3333-444455556666");
        let c = chart_seed("other-report");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_farm_not_found_maps_to_a_failed_category() {
        let e = GenerationError::FarmNotFound;
        assert_eq!(e.to_string(), "farm not found");
    }
}
