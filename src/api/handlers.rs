//! API handlers
//!
//! All handlers return `Response` via [`ApiResponse::ok`] or [`ApiErrorResponse`].

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::envelope::{ApiErrorResponse, ApiResponse};
use super::request::SolveRequest;
use crate::catalog::Catalog;
use crate::config::ServiceConfig;
use crate::solver::{self, SearchError};
use crate::types::{AttributeRequest, PerAttribute, SearchOutcome};

/// Shared, read-only state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(catalog: Catalog, config: ServiceConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ingredients: usize,
    pub styles: usize,
}

/// Result of `POST /api/v1/solve`.
#[derive(Debug, Serialize)]
pub struct SolveResponse {
    pub style: String,
    /// The attribute requests after parsing and clamping
    pub requests: PerAttribute<AttributeRequest>,
    #[serde(flatten)]
    pub outcome: SearchOutcome,
    /// Human-readable rendering of `notes`
    pub messages: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Response {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        ingredients: state.catalog.len(),
        styles: state.catalog.styles().len(),
    })
}

/// GET /api/v1/styles
pub async fn get_styles(State(state): State<AppState>) -> Response {
    ApiResponse::ok(state.catalog.styles())
}

/// GET /api/v1/ingredients
pub async fn get_ingredients(State(state): State<AppState>) -> Response {
    ApiResponse::ok(state.catalog.ingredients())
}

/// GET /api/v1/config
pub async fn get_config(State(state): State<AppState>) -> Response {
    ApiResponse::ok(state.config.as_ref())
}

/// POST /api/v1/solve
///
/// The search itself is CPU-bound and runs on the blocking pool.
pub async fn solve(
    State(state): State<AppState>,
    body: Result<Json<SolveRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return ApiErrorResponse::bad_request(rejection.body_text()),
    };
    if body.style.trim().is_empty() {
        return ApiErrorResponse::bad_request("style is required");
    }

    let parsed = body.parse(&state.config.solver, &state.catalog);
    let catalog = Arc::clone(&state.catalog);
    let requests = parsed.requests.clone();
    let style = parsed.style.clone();

    let joined = tokio::task::spawn_blocking(move || {
        solver::search(&catalog, &parsed.style, &parsed.requests, &parsed.params)
    })
    .await;

    match joined {
        Ok(Ok(outcome)) => {
            info!(
                style = %style,
                solutions = outcome.solutions.len(),
                total = outcome.total_solutions,
                partial = outcome.partial,
                "Solve request completed"
            );
            let messages = outcome.notes.iter().map(ToString::to_string).collect();
            ApiResponse::ok(SolveResponse {
                style,
                requests,
                outcome,
                messages,
            })
        }
        Ok(Err(e @ SearchError::UnknownStyle(_))) => ApiErrorResponse::not_found(e.to_string()),
        Err(e) => {
            warn!(error = %e, "Search task failed");
            ApiErrorResponse::internal(format!("Search task failed: {e}"))
        }
    }
}
