//! HTTP API module
//! 
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/presets", get(list_presets_handler).post(create_preset_handler))
        .route(
            "/presets/:id",
            get(get_preset_handler)
                .put(update_preset_handler)
                .delete(delete_preset_handler),
        )
        .route("/presets/:id/select", post(select_preset_handler))
        .route("/session", get(session_handler))
        .route("/session/toggle", post(toggle_handler))
        .route("/session/reset", post(reset_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
