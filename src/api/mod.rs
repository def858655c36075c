use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::EngineConfig;
use crate::models::{ApiResponse, FixtureRequest, MatchAnalysis};
use crate::services::EstimationEngine;

/// Largest batch accepted by `POST /estimate/batch`.
pub const MAX_BATCH: usize = 100;

pub async fn serve(port: u16, engine: EstimationEngine) -> anyhow::Result<()> {
    let app = create_router(Arc::new(engine));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("OddsForge estimation API listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

/// The engine is immutable, so handlers share it without locking.
pub fn create_router(engine: Arc<EstimationEngine>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/config", get(get_config_handler))
        .route("/estimate", post(estimate_handler))
        .route("/estimate/batch", post(estimate_batch_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(engine)
}

// Health check endpoint
async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("OddsForge estimation API is running"))
}

// GET /config - Effective engine coefficients
async fn get_config_handler(State(engine): State<Arc<EstimationEngine>>) -> Json<ApiResponse<EngineConfig>> {
    Json(ApiResponse::success(engine.config().clone()))
}

// POST /estimate - Analyze a single fixture
async fn estimate_handler(
    State(engine): State<Arc<EstimationEngine>>,
    Json(request): Json<FixtureRequest>,
) -> Json<ApiResponse<MatchAnalysis>> {
    let analysis = engine.analyze(&request);
    tracing::info!(
        "Estimated {} vs {}: {}/{}/{}",
        analysis.home_team,
        analysis.away_team,
        analysis.estimate.outcome.home,
        analysis.estimate.outcome.draw,
        analysis.estimate.outcome.away
    );
    Json(ApiResponse::success(analysis))
}

// POST /estimate/batch - Analyze several fixtures in one call
async fn estimate_batch_handler(
    State(engine): State<Arc<EstimationEngine>>,
    Json(requests): Json<Vec<FixtureRequest>>,
) -> (StatusCode, Json<ApiResponse<Vec<MatchAnalysis>>>) {
    if requests.len() > MAX_BATCH {
        tracing::warn!("Rejected batch of {} fixtures (max {})", requests.len(), MAX_BATCH);
        let message = format!("batch of {} fixtures exceeds the limit of {}", requests.len(), MAX_BATCH);
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)));
    }

    let analyses: Vec<MatchAnalysis> = requests.iter().map(|r| engine.analyze(r)).collect();
    tracing::info!("Estimated batch of {} fixtures", analyses.len());
    (StatusCode::OK, Json(ApiResponse::success(analyses)))
}
