//! Read-only projection of the session for display surfaces

use serde::{Deserialize, Serialize};

use super::{Phase, TimerSession, WorkoutPreset};
use crate::utils::format_time;

/// Upcoming phase shown under the countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPhase {
    pub label: String,
    pub duration_seconds: u32,
    pub duration: String,
}

/// Everything a display needs, already formatted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// False only when no preset could be resolved
    pub selected: bool,
    pub preset_id: Option<String>,
    pub preset_name: String,
    pub phase: Phase,
    pub phase_label: String,
    pub time_left_seconds: u32,
    pub time_left: String,
    pub current_rep: u32,
    pub total_reps: u32,
    pub progress_percent: f64,
    pub running: bool,
    pub can_start_pause: bool,
    pub next: Option<NextPhase>,
    pub completion_message: Option<String>,
}

impl SessionView {
    pub fn new(session: &TimerSession, preset: Option<&WorkoutPreset>) -> Self {
        let Some(preset) = preset else {
            return Self::unselected();
        };

        let next = match session.phase {
            Phase::Working => Some(NextPhase::new("Next: Rest", preset.rest_time)),
            Phase::Resting => Some(NextPhase::new("Next: Workout", preset.workout_time)),
            Phase::Complete => None,
        };
        let completion_message = (session.phase == Phase::Complete)
            .then(|| format!("Great job finishing all {} reps!", preset.total_reps));

        Self {
            selected: true,
            preset_id: Some(preset.id.clone()),
            preset_name: preset.name.clone(),
            phase: session.phase,
            phase_label: session.phase.label().to_string(),
            time_left_seconds: session.time_left_seconds,
            time_left: format_time(u64::from(session.time_left_seconds)),
            current_rep: session.current_rep,
            total_reps: preset.total_reps,
            progress_percent: progress_percent(session.current_rep, preset.total_reps),
            running: session.running,
            can_start_pause: session.phase != Phase::Complete,
            next,
            completion_message,
        }
    }

    /// Neutral "no workout selected" state
    pub fn unselected() -> Self {
        Self {
            selected: false,
            preset_id: None,
            preset_name: "Select a Workout".to_string(),
            phase: Phase::Working,
            phase_label: String::new(),
            time_left_seconds: 0,
            time_left: format_time(0),
            current_rep: 0,
            total_reps: 0,
            progress_percent: 0.0,
            running: false,
            can_start_pause: false,
            next: None,
            completion_message: None,
        }
    }
}

impl NextPhase {
    fn new(label: &str, duration_seconds: u32) -> Self {
        Self {
            label: label.to_string(),
            duration_seconds,
            duration: format_time(u64::from(duration_seconds)),
        }
    }
}

fn progress_percent(current_rep: u32, total_reps: u32) -> f64 {
    if total_reps == 0 {
        return 0.0;
    }
    (f64::from(current_rep) / f64::from(total_reps) * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::SessionView;
    use crate::state::{Phase, TimerSession, WorkoutPreset};

    fn preset() -> WorkoutPreset {
        WorkoutPreset {
            id: "7".to_string(),
            name: "Sprints".to_string(),
            workout_time: 90,
            rest_time: 15,
            total_reps: 4,
            auto_continue: true,
        }
    }

    #[test]
    fn working_view() {
        let p = preset();
        let view = SessionView::new(&TimerSession::initial(&p), Some(&p));

        assert!(view.selected);
        assert_eq!(view.phase_label, "WORKOUT");
        assert_eq!(view.time_left, "01:30");
        assert_eq!(view.progress_percent, 25.0);
        assert!(view.can_start_pause);
        let next = view.next.unwrap();
        assert_eq!(next.label, "Next: Rest");
        assert_eq!(next.duration, "00:15");
    }

    #[test]
    fn complete_view() {
        let p = preset();
        let session = TimerSession {
            phase: Phase::Complete,
            current_rep: 4,
            time_left_seconds: 0,
            ..TimerSession::initial(&p)
        };
        let view = SessionView::new(&session, Some(&p));

        assert!(!view.can_start_pause);
        assert!(view.next.is_none());
        assert_eq!(view.progress_percent, 100.0);
        assert_eq!(
            view.completion_message.as_deref(),
            Some("Great job finishing all 4 reps!")
        );
    }

    #[test]
    fn missing_preset_renders_neutral_view() {
        let p = preset();
        let view = SessionView::new(&TimerSession::initial(&p), None);

        assert!(!view.selected);
        assert!(view.preset_id.is_none());
        assert_eq!(view.time_left, "00:00");
        assert!(!view.can_start_pause);
    }
}
