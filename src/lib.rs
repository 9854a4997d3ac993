//! Interval Timer - A state-managed HTTP server for interval workouts
//! 
//! This library keeps named workout presets, runs a work/rest countdown for
//! the selected one and plays an audible cue at every phase transition.

pub mod config;
pub mod cue;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
