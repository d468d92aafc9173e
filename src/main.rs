use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::signal;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app_state;
mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod models;
mod openapi;
mod services;

use app_state::AppState;
use config::Config;
use services::generative::GenerativeClient;
use services::insights::InsightCatalog;
use services::report_worker::{self, WorkerContext};
use services::weather::WeatherService;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farm_reports=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting farm-reports");
    let cfg = Config::from_env()?;
    tracing::info!("database: {}", cfg.mysql_masked_url());

    let pool = database::create_pool(&cfg).await?;
    database::schema::initialize_schema(&pool).await?;

    let weather = WeatherService::new(cfg.weather_base_url.clone(), cfg.weather_timeout)?;
    let generative = match &cfg.gemini_api_key {
        Some(key) => Some(GenerativeClient::new(
            key.clone(),
            cfg.gemini_model.clone(),
            cfg.gemini_base_url.clone(),
            cfg.gemini_timeout,
        )?),
        None => {
            tracing::warn!("GEMINI_API_KEY not set; narrative augmentation disabled");
            None
        }
    };
    let catalog = Arc::new(InsightCatalog::default_catalog());

    let (job_tx, job_rx) = mpsc::channel(cfg.report_queue_depth);
    let worker = report_worker::spawn_report_worker(
        WorkerContext {
            pool: pool.clone(),
            weather,
            generative: generative.clone(),
            catalog,
            recent_inspection_limit: cfg.recent_inspection_limit,
        },
        job_rx,
    );

    let state = AppState {
        pool,
        job_tx,
        generative,
        recent_inspection_limit: cfg.recent_inspection_limit,
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("farm-reports listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the queue sender) is gone once serve returns;
    // the worker drains whatever was already queued, then exits.
    let _ = worker.await;
    tracing::info!("server shutdown complete");
    Ok(())
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/v1/farms",
            post(handlers::farms::create_farm).get(handlers::farms::list_farms),
        )
        .route(
            "/api/v1/farms/:id",
            get(handlers::farms::get_farm)
                .put(handlers::farms::update_farm)
                .delete(handlers::farms::delete_farm),
        )
        .route(
            "/api/v1/farms/:id/inspections",
            post(handlers::inspections::create_inspection)
                .get(handlers::inspections::list_inspections),
        )
        .route(
            "/api/v1/farms/:id/insights",
            post(handlers::insights::farm_insights),
        )
        .route(
            "/api/v1/users/me",
            get(handlers::users::get_me).put(handlers::users::update_me),
        )
        .route(
            "/api/v1/reports",
            post(handlers::reports::create_report).get(handlers::reports::list_reports),
        )
        .route(
            "/api/v1/reports/:id",
            get(handlers::reports::get_report).delete(handlers::reports::delete_report),
        )
        .merge(openapi::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, shutting down");
        },
        _ = terminate => {
            tracing::info!("received terminate signal, shutting down");
        },
    }
}
