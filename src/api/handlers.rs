//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use crate::{
    error::TimerError,
    state::{AppState, DeleteOutcome, PresetForm, SessionView},
};
use super::responses::{
    ApiResponse, HealthResponse, PresetListResponse, PresetResponse, StatusResponse,
};

type ApiResult<T> = Result<Json<T>, TimerError>;

/// Handle GET /presets - List presets and the active selection
pub async fn list_presets_handler(State(state): State<Arc<AppState>>) -> ApiResult<PresetListResponse> {
    let (presets, active_preset_id) = state.presets()?;
    let presets = presets
        .into_iter()
        .map(|preset| PresetResponse::new(preset, &active_preset_id))
        .collect();

    Ok(Json(PresetListResponse {
        active_preset_id,
        presets,
    }))
}

/// Handle GET /presets/:id - Show one preset
pub async fn get_preset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<PresetResponse> {
    let preset = state.preset(&id)?.ok_or(TimerError::PresetNotFound(id))?;
    let active_preset_id = state.session_view()?.preset_id.unwrap_or_default();
    Ok(Json(PresetResponse::new(preset, &active_preset_id)))
}

/// Handle POST /presets - Create a preset from the form
pub async fn create_preset_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<PresetForm>,
) -> Result<(StatusCode, Json<PresetResponse>), TimerError> {
    form.validate()?;
    let preset = state.create_preset(form)?;
    info!("Create endpoint called - preset {} added", preset.id);

    let active_preset_id = state.session_view()?.preset_id.unwrap_or_default();
    Ok((
        StatusCode::CREATED,
        Json(PresetResponse::new(preset, &active_preset_id)),
    ))
}

/// Handle PUT /presets/:id - Replace a preset's fields
pub async fn update_preset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(form): Json<PresetForm>,
) -> ApiResult<PresetResponse> {
    form.validate()?;
    let preset = state
        .update_preset(&id, form)?
        .ok_or(TimerError::PresetNotFound(id))?;
    info!("Update endpoint called - preset {} edited", preset.id);

    let active_preset_id = state.session_view()?.preset_id.unwrap_or_default();
    Ok(Json(PresetResponse::new(preset, &active_preset_id)))
}

/// Handle DELETE /presets/:id - Remove a preset
pub async fn delete_preset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse> {
    match state.delete_preset(&id)? {
        DeleteOutcome::Removed { .. } => {
            info!("Delete endpoint called - preset {} removed", id);
            Ok(Json(ApiResponse::for_session(
                format!("Preset {} deleted", id),
                state.session_view()?,
            )))
        }
        DeleteOutcome::LastPreset => Err(TimerError::LastPreset),
        DeleteOutcome::NotFound => Err(TimerError::PresetNotFound(id)),
    }
}

/// Handle POST /presets/:id/select - Make a preset active
pub async fn select_preset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse> {
    let session = state
        .select_preset(&id)?
        .ok_or_else(|| TimerError::PresetNotFound(id.clone()))?;
    info!("Select endpoint called - preset {} active", id);

    Ok(Json(ApiResponse::for_session(
        format!("Preset {} selected", session.preset_name),
        session,
    )))
}

/// Handle GET /session - Current countdown for display
pub async fn session_handler(State(state): State<Arc<AppState>>) -> ApiResult<SessionView> {
    Ok(Json(state.session_view()?))
}

/// Handle POST /session/toggle - Start or pause the countdown
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let session = state.start_pause()?;
    let message = if session.running { "Timer started" } else { "Timer paused" };
    info!("Toggle endpoint called - {}", message.to_lowercase());

    Ok(Json(ApiResponse::for_session(message.to_string(), session)))
}

/// Handle POST /session/reset - Restart the active preset from rep 1
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let session = state.reset()?;
    info!("Reset endpoint called");

    Ok(Json(ApiResponse::for_session("Timer reset".to_string(), session)))
}

/// Handle GET /status - Return session and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let session = state.session_view()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        session,
        cues_emitted: state.cues_emitted(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
