//! Error types shared across the crate

use thiserror::Error;

/// Errors surfaced by the timer service
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("failed to lock workout state: {0}")]
    LockPoisoned(String),

    #[error("invalid preset: {0}")]
    InvalidPreset(String),

    #[error("a preset store needs at least one preset")]
    EmptyPresetStore,

    #[error("preset not found: {0}")]
    PresetNotFound(String),

    #[error("cannot delete the last preset")]
    LastPreset,

    #[error("workout complete, reset to start again")]
    SessionComplete,

    #[error("invalid configuration: {0}")]
    Config(String),
}
