//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    error::TimerError,
    state::{PresetSummary, SessionView, WorkoutPreset},
};

/// API response structure for session control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, session: SessionView) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            session,
        }
    }

    /// Response whose status mirrors the session's running flag
    pub fn for_session(message: String, session: SessionView) -> Self {
        let status = if session.running { "running" } else { "paused" };
        Self::new(status.to_string(), message, session)
    }
}

/// A preset together with its session totals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetResponse {
    #[serde(flatten)]
    pub preset: WorkoutPreset,
    pub summary: PresetSummary,
    pub active: bool,
}

impl PresetResponse {
    pub fn new(preset: WorkoutPreset, active_preset_id: &str) -> Self {
        let active = preset.id == active_preset_id;
        Self {
            summary: preset.summary(),
            preset,
            active,
        }
    }
}

/// Preset listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetListResponse {
    pub active_preset_id: String,
    pub presets: Vec<PresetResponse>,
}

/// Status response with the session and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub session: SessionView,
    pub cues_emitted: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body returned for failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl TimerError {
    fn status_code(&self) -> StatusCode {
        match self {
            TimerError::InvalidPreset(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TimerError::PresetNotFound(_) => StatusCode::NOT_FOUND,
            TimerError::LastPreset | TimerError::SessionComplete => StatusCode::CONFLICT,
            TimerError::LockPoisoned(_)
            | TimerError::EmptyPresetStore
            | TimerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TimerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.to_string(),
            timestamp: Utc::now(),
        };
        (status, Json(body)).into_response()
    }
}
