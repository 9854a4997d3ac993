//! Timer session and its phase state machine
//!
//! Every handler is a pure function of the current session (and the active
//! preset, read fresh on each call) returning the next session together with
//! the side effects the caller must carry out.

use serde::{Deserialize, Serialize};

use super::WorkoutPreset;

/// Segment of the workout cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Working,
    Resting,
    Complete,
}

impl Phase {
    /// Display label for the phase
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Working => "WORKOUT",
            Phase::Resting => "REST",
            Phase::Complete => "COMPLETE!",
        }
    }
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Play the completion cue once
    EmitCue,
    /// Start a fresh tick subscription
    SubscribeTick,
    /// Cancel the live tick subscription, if any
    UnsubscribeTick,
}

/// Countdown state for the selected preset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSession {
    pub active_preset_id: String,
    pub phase: Phase,
    pub current_rep: u32,
    pub time_left_seconds: u32,
    pub running: bool,
}

/// Next session plus the effects to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: TimerSession,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn new(session: TimerSession, effects: Vec<Effect>) -> Self {
        Self { session, effects }
    }

    fn unchanged(session: &TimerSession) -> Self {
        Self::new(session.clone(), Vec::new())
    }

    pub fn emits_cue(&self) -> bool {
        self.effects.contains(&Effect::EmitCue)
    }
}

impl TimerSession {
    /// Fresh session: rep 1, working, full work time, paused
    pub fn initial(preset: &WorkoutPreset) -> Self {
        Self {
            active_preset_id: preset.id.clone(),
            phase: Phase::Working,
            current_rep: 1,
            time_left_seconds: preset.workout_time,
            running: false,
        }
    }

    /// Reinitialize against a newly selected preset
    pub fn on_preset_selected(&self, preset: &WorkoutPreset) -> Transition {
        Transition::new(Self::initial(preset), vec![Effect::UnsubscribeTick])
    }

    /// Restore the starting state of the active preset
    pub fn on_reset(&self, preset: &WorkoutPreset) -> Transition {
        self.on_preset_selected(preset)
    }

    /// Toggle running. Disabled once complete.
    pub fn on_start_pause(&self) -> Transition {
        if self.phase == Phase::Complete {
            return Transition::unchanged(self);
        }

        let mut next = self.clone();
        next.running = !self.running;
        let effect = if next.running {
            Effect::SubscribeTick
        } else {
            Effect::UnsubscribeTick
        };
        Transition::new(next, vec![effect])
    }

    /// Advance one tick.
    ///
    /// Counts down while running. The tick that reaches zero (or any tick that
    /// finds the countdown already at zero while running) cues and applies
    /// the phase transition.
    pub fn on_tick(&self, preset: &WorkoutPreset) -> Transition {
        if !self.running || self.phase == Phase::Complete {
            return Transition::unchanged(self);
        }

        let mut next = self.clone();
        next.time_left_seconds = next.time_left_seconds.saturating_sub(1);
        if next.time_left_seconds > 0 {
            return Transition::new(next, Vec::new());
        }

        let mut effects = vec![Effect::EmitCue];
        match next.phase {
            Phase::Working => {
                if preset.auto_continue {
                    next.phase = Phase::Resting;
                    next.time_left_seconds = preset.rest_time;
                } else {
                    // Held at zero until reset.
                    next.running = false;
                }
            }
            Phase::Resting => {
                if next.current_rep < preset.total_reps {
                    next.current_rep += 1;
                    next.phase = Phase::Working;
                    next.time_left_seconds = preset.workout_time;
                    next.running = preset.auto_continue;
                } else {
                    next.phase = Phase::Complete;
                    next.time_left_seconds = 0;
                    next.running = false;
                }
            }
            Phase::Complete => {}
        }

        if !next.running {
            effects.push(Effect::UnsubscribeTick);
        }
        Transition::new(next, effects)
    }
}

#[cfg(test)]
mod tests {
    use super::{Effect, Phase, TimerSession, Transition};
    use crate::state::WorkoutPreset;

    fn preset(auto_continue: bool) -> WorkoutPreset {
        WorkoutPreset {
            id: "p".to_string(),
            name: "Test".to_string(),
            workout_time: 30,
            rest_time: 10,
            total_reps: 2,
            auto_continue,
        }
    }

    /// Feed `n` ticks, returning the final session and the number of cues
    fn tick_n(session: TimerSession, preset: &WorkoutPreset, n: u32) -> (TimerSession, usize) {
        let mut session = session;
        let mut cues = 0;
        for _ in 0..n {
            let Transition { session: next, effects } = session.on_tick(preset);
            cues += effects.iter().filter(|e| **e == Effect::EmitCue).count();
            session = next;
        }
        (session, cues)
    }

    fn started(preset: &WorkoutPreset) -> TimerSession {
        TimerSession::initial(preset).on_start_pause().session
    }

    #[test]
    fn initial_session() {
        let session = TimerSession::initial(&preset(true));
        assert_eq!(session.phase, Phase::Working);
        assert_eq!(session.current_rep, 1);
        assert_eq!(session.time_left_seconds, 30);
        assert!(!session.running);
    }

    #[test]
    fn ticks_do_nothing_while_paused() {
        let p = preset(true);
        let (session, cues) = tick_n(TimerSession::initial(&p), &p, 5);
        assert_eq!(session.time_left_seconds, 30);
        assert_eq!(cues, 0);
    }

    #[test]
    fn full_auto_continue_cycle() {
        let p = preset(true);

        let (session, cues) = tick_n(started(&p), &p, 30);
        assert_eq!(session.phase, Phase::Resting);
        assert_eq!(session.time_left_seconds, 10);
        assert_eq!(session.current_rep, 1);
        assert_eq!(cues, 1);

        let (session, cues) = tick_n(session, &p, 10);
        assert_eq!(session.phase, Phase::Working);
        assert_eq!(session.time_left_seconds, 30);
        assert_eq!(session.current_rep, 2);
        assert!(session.running);
        assert_eq!(cues, 1);

        let (session, work_cues) = tick_n(session, &p, 30);
        assert_eq!(session.phase, Phase::Resting);
        let (session, rest_cues) = tick_n(session, &p, 10);
        assert_eq!(session.phase, Phase::Complete);
        assert_eq!(session.time_left_seconds, 0);
        assert!(!session.running);
        assert_eq!(work_cues + rest_cues, 2);
    }

    #[test]
    fn completion_cancels_tick_subscription() {
        let p = preset(true);
        let (session, _) = tick_n(started(&p), &p, 30 + 10 + 30 + 9);

        let last = session.on_tick(&p);
        assert_eq!(last.session.phase, Phase::Complete);
        assert_eq!(last.effects, vec![Effect::EmitCue, Effect::UnsubscribeTick]);
    }

    #[test]
    fn manual_preset_pauses_after_work() {
        let p = preset(false);
        let (session, cues) = tick_n(started(&p), &p, 30);

        assert_eq!(session.phase, Phase::Working);
        assert_eq!(session.time_left_seconds, 0);
        assert!(!session.running);
        assert_eq!(cues, 1);
    }

    #[test]
    fn held_work_phase_cues_again_on_restart() {
        let p = preset(false);
        let (held, _) = tick_n(started(&p), &p, 30);

        let restarted = held.on_start_pause();
        assert_eq!(restarted.effects, vec![Effect::SubscribeTick]);

        let next = restarted.session.on_tick(&p);
        assert!(next.emits_cue());
        assert_eq!(next.session.phase, Phase::Working);
        assert_eq!(next.session.time_left_seconds, 0);
        assert!(!next.session.running);
    }

    #[test]
    fn rest_into_work_follows_auto_continue() {
        // auto_continue switched off while resting
        let mut p = preset(true);
        let (resting, _) = tick_n(started(&p), &p, 30);
        p.auto_continue = false;

        let (session, cues) = tick_n(resting, &p, 10);
        assert_eq!(session.phase, Phase::Working);
        assert_eq!(session.current_rep, 2);
        assert_eq!(session.time_left_seconds, 30);
        assert!(!session.running);
        assert_eq!(cues, 1);
    }

    #[test]
    fn single_rep_still_rests_before_complete() {
        let p = WorkoutPreset {
            total_reps: 1,
            ..preset(true)
        };

        let (session, _) = tick_n(started(&p), &p, 30);
        assert_eq!(session.phase, Phase::Resting);
        assert_eq!(session.time_left_seconds, 10);

        let (session, _) = tick_n(session, &p, 9);
        assert_eq!(session.phase, Phase::Resting);
        let (session, cues) = tick_n(session, &p, 1);
        assert_eq!(session.phase, Phase::Complete);
        assert_eq!(cues, 1);
    }

    #[test]
    fn start_pause_toggles_and_requests_subscription() {
        let p = preset(true);
        let start = TimerSession::initial(&p).on_start_pause();
        assert!(start.session.running);
        assert_eq!(start.effects, vec![Effect::SubscribeTick]);

        let pause = start.session.on_start_pause();
        assert!(!pause.session.running);
        assert_eq!(pause.effects, vec![Effect::UnsubscribeTick]);
    }

    #[test]
    fn start_pause_disabled_when_complete() {
        let p = preset(true);
        let (done, _) = tick_n(started(&p), &p, 80);
        assert_eq!(done.phase, Phase::Complete);

        let attempt = done.on_start_pause();
        assert_eq!(attempt.session, done);
        assert!(attempt.effects.is_empty());
        assert_eq!(done.on_tick(&p).session, done);
    }

    #[test]
    fn reset_restores_start_from_any_state() {
        let p = preset(true);
        let (mid, _) = tick_n(started(&p), &p, 47);
        assert_eq!(mid.current_rep, 2);

        let reset = mid.on_reset(&p);
        assert_eq!(reset.session, TimerSession::initial(&p));
        assert_eq!(reset.effects, vec![Effect::UnsubscribeTick]);
    }

    #[test]
    fn selecting_preset_reinitializes() {
        let a = preset(true);
        let b = WorkoutPreset {
            id: "b".to_string(),
            workout_time: 45,
            ..preset(false)
        };
        let (mid, _) = tick_n(started(&a), &a, 12);

        let selected = mid.on_preset_selected(&b);
        assert_eq!(selected.session.active_preset_id, "b");
        assert_eq!(selected.session.time_left_seconds, 45);
        assert_eq!(selected.session.phase, Phase::Working);
        assert!(!selected.session.running);
        assert!(selected.effects.contains(&Effect::UnsubscribeTick));
    }

    #[test]
    fn edited_parameters_apply_at_next_transition() {
        let mut p = preset(true);
        let (session, _) = tick_n(started(&p), &p, 10);
        p.workout_time = 60;
        p.rest_time = 25;

        // Current countdown untouched
        let (session, _) = tick_n(session, &p, 20);
        assert_eq!(session.phase, Phase::Resting);
        assert_eq!(session.time_left_seconds, 25);
    }

    #[test]
    fn phase_labels() {
        assert_eq!(Phase::Working.label(), "WORKOUT");
        assert_eq!(Phase::Resting.label(), "REST");
        assert_eq!(Phase::Complete.label(), "COMPLETE!");
    }
}
