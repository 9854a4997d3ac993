//! State management module
//! 
//! This module contains the preset store, the timer session state machine and
//! the shared application state that ties them to the tick source and cues.

pub mod app_state;
pub mod preset;
pub mod session;
pub mod view;
pub mod workout;

// Re-export main types
pub use app_state::{AppState, TickControl};
pub use preset::{DeleteOutcome, PresetForm, PresetStore, PresetSummary, WorkoutPreset};
pub use session::{Effect, Phase, TimerSession, Transition};
pub use view::{NextPhase, SessionView};
pub use workout::Workout;
