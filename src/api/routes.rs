//! API route definitions
//!
//! - /api/v1/styles - Styles with base, required minimums and band catalog
//! - /api/v1/ingredients - Ingredient list
//! - /api/v1/config - Active service configuration
//! - /api/v1/solve - Run one search
//! - /health - Liveness

use axum::{routing::{get, post}, Router};

use super::handlers::{self, AppState};

/// Create all versioned API routes
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/styles", get(handlers::get_styles))
        .route("/ingredients", get(handlers::get_ingredients))
        .route("/config", get(handlers::get_config))
        .route("/solve", post(handlers::solve))
        .with_state(state)
}

/// Health endpoint at root level
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .with_state(state)
}
