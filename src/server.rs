//! HTTP server for athlete comparisons

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::{Comparator, ComparisonOutcome, ComparisonResult};

/// Compare request body
#[derive(Debug, Deserialize)]
pub struct CompareRequestHttp {
    pub player1: String,
    pub player2: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Compare handler
async fn compare_handler(
    State(comparator): State<Arc<Comparator>>,
    Json(req): Json<CompareRequestHttp>,
) -> Result<Json<ComparisonResult>, HandlerError> {
    info!("Received compare request: '{}' vs '{}'", req.player1, req.player2);

    match comparator.compare(&req.player1, &req.player2).await {
        Ok(ComparisonOutcome::Compared(result)) => Ok(Json(*result)),
        Ok(ComparisonOutcome::NotFound { unresolved }) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Player not found".to_string(),
                details: Some(unresolved.join(", ")),
            }),
        )),
        Err(e) if e.is_input_error() => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "Unusable athlete record".to_string(),
                details: Some(e.to_string()),
            }),
        )),
        Err(e) => {
            error!("Comparison failed: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Comparison failed".to_string(),
                    details: Some(e.to_string()),
                }),
            ))
        }
    }
}

/// Health check handler
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "hoopsim".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create and configure the HTTP server
pub fn create_router(comparator: Arc<Comparator>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/compare", post(compare_handler))
        .with_state(comparator)
}

/// Run the HTTP server
pub async fn run_server(comparator: Arc<Comparator>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting hoopsim server on {}", addr);

    let app = create_router(comparator);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
