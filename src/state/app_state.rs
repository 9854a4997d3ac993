//! Main application state management

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
    panic::{self, AssertUnwindSafe},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{DeleteOutcome, Effect, PresetForm, SessionView, Workout, WorkoutPreset};
use crate::{cue::CuePlayer, error::TimerError, utils::format_uptime};

/// Tick subscription published to the tick driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickControl {
    /// Whether ticks should currently be produced
    pub active: bool,
    /// Number of the live subscription; ticks carry it back
    pub subscription: u64,
}

/// Main application state that owns the workout and wires its effects
#[derive(Debug)]
pub struct AppState {
    /// Preset store and timer session
    pub workout: Arc<Mutex<Workout>>,
    /// Cue played on every phase transition
    cue: Arc<dyn CuePlayer>,
    /// Nominal tick period
    pub tick_period: Duration,
    /// Channel driving the tick source
    pub tick_control_tx: watch::Sender<TickControl>,
    next_subscription: AtomicU64,
    cues_emitted: AtomicU64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState around an existing workout
    pub fn new(
        port: u16,
        host: String,
        tick_period: Duration,
        cue: Arc<dyn CuePlayer>,
        workout: Workout,
    ) -> Self {
        let (tick_control_tx, _) = watch::channel(TickControl::default());

        Self {
            workout: Arc::new(Mutex::new(workout)),
            cue,
            tick_period,
            tick_control_tx,
            next_subscription: AtomicU64::new(0),
            cues_emitted: AtomicU64::new(0),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    fn lock_workout(&self) -> Result<MutexGuard<'_, Workout>, TimerError> {
        self.workout
            .lock()
            .map_err(|e| TimerError::LockPoisoned(e.to_string()))
    }

    /// Run `updater` against the workout and apply the effects it returns.
    ///
    /// Tick subscription changes land before the lock is released so a tick
    /// can never observe a session whose subscription change is still
    /// pending. Cues play after the lock is released.
    fn mutate_workout<R, F>(&self, updater: F) -> Result<R, TimerError>
    where
        F: FnOnce(&mut Workout) -> (R, Vec<Effect>),
    {
        let mut workout = self.lock_workout()?;
        let (result, effects) = updater(&mut *workout);
        let cues = self.apply_effects(&effects);
        drop(workout);

        self.play_cues(cues);
        Ok(result)
    }

    /// Like `mutate_workout`, then records `action` as the last action
    fn update_workout<R, F>(&self, action: &str, updater: F) -> Result<R, TimerError>
    where
        F: FnOnce(&mut Workout) -> (R, Vec<Effect>),
    {
        let result = self.mutate_workout(updater)?;
        self.record_action(action);
        Ok(result)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Apply subscription effects and count the cues. Returns how many cues
    /// are still to be played.
    fn apply_effects(&self, effects: &[Effect]) -> usize {
        let mut cues = 0;
        for effect in effects {
            match effect {
                Effect::EmitCue => {
                    self.cues_emitted.fetch_add(1, Ordering::Relaxed);
                    cues += 1;
                }
                Effect::SubscribeTick => {
                    let subscription = self.next_subscription.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!("Subscribing tick source #{}", subscription);
                    self.tick_control_tx.send_replace(TickControl {
                        active: true,
                        subscription,
                    });
                }
                Effect::UnsubscribeTick => {
                    let cancelled = self.tick_control_tx.send_if_modified(|control| {
                        let was_active = control.active;
                        control.active = false;
                        was_active
                    });
                    if cancelled {
                        debug!("Tick source unsubscribed");
                    }
                }
            }
        }
        cues
    }

    /// Must be called without the workout lock held.
    fn play_cues(&self, count: usize) {
        for _ in 0..count {
            let played = panic::catch_unwind(AssertUnwindSafe(|| self.cue.play_completion_cue()));
            if played.is_err() {
                warn!("Completion cue panicked, timer continues");
            }
        }
    }

    /// All presets in order, plus the active preset id
    pub fn presets(&self) -> Result<(Vec<WorkoutPreset>, String), TimerError> {
        let workout = self.lock_workout()?;
        Ok((
            workout.presets().list().to_vec(),
            workout.session().active_preset_id.clone(),
        ))
    }

    pub fn preset(&self, id: &str) -> Result<Option<WorkoutPreset>, TimerError> {
        Ok(self.lock_workout()?.presets().get(id).cloned())
    }

    pub fn create_preset(&self, form: PresetForm) -> Result<WorkoutPreset, TimerError> {
        let id = self.update_workout("create-preset", |workout| (workout.create(form), Vec::new()))?;
        self.preset(&id)?.ok_or(TimerError::PresetNotFound(id))
    }

    /// Edit a preset. `None` when the id is unknown.
    pub fn update_preset(
        &self,
        id: &str,
        form: PresetForm,
    ) -> Result<Option<WorkoutPreset>, TimerError> {
        self.update_workout("update-preset", |workout| {
            let updated = workout
                .update(id, form)
                .then(|| workout.presets().get(id).cloned())
                .flatten();
            (updated, Vec::new())
        })
    }

    pub fn delete_preset(&self, id: &str) -> Result<DeleteOutcome, TimerError> {
        self.update_workout("delete-preset", |workout| workout.delete(id))
    }

    /// Select a preset. `None` when the id is unknown.
    pub fn select_preset(&self, id: &str) -> Result<Option<SessionView>, TimerError> {
        self.update_workout("select-preset", |workout| match workout.select(id) {
            Some(effects) => (Some(workout.view()), effects),
            None => (None, Vec::new()),
        })
    }

    /// Toggle running. Fails with `SessionComplete` once the workout is over.
    ///
    /// A refused toggle is not recorded as the last action.
    pub fn start_pause(&self) -> Result<SessionView, TimerError> {
        let view = self.mutate_workout(|workout| {
            if !workout.view().can_start_pause {
                return (Err(TimerError::SessionComplete), Vec::new());
            }
            let effects = workout.start_pause();
            (Ok(workout.view()), effects)
        })??;
        self.record_action("start-pause");
        Ok(view)
    }

    pub fn reset(&self) -> Result<SessionView, TimerError> {
        self.update_workout("reset", |workout| {
            let effects = workout.reset();
            (workout.view(), effects)
        })
    }

    /// Advance the session by one tick of `subscription`.
    ///
    /// Ticks from a subscription that is no longer live are dropped.
    pub fn on_tick(&self, subscription: u64) -> Result<(), TimerError> {
        let mut workout = self.lock_workout()?;
        let control = *self.tick_control_tx.borrow();
        if !control.active || control.subscription != subscription {
            debug!("Dropping stale tick from subscription #{}", subscription);
            return Ok(());
        }

        let effects = workout.tick();
        debug!(
            "Tick: {:?} {}s left (rep {})",
            workout.session().phase,
            workout.session().time_left_seconds,
            workout.session().current_rep
        );
        let cues = self.apply_effects(&effects);
        drop(workout);

        self.play_cues(cues);
        Ok(())
    }

    pub fn session_view(&self) -> Result<SessionView, TimerError> {
        Ok(self.lock_workout()?.view())
    }

    /// Number of cues emitted since startup
    pub fn cues_emitted(&self) -> u64 {
        self.cues_emitted.load(Ordering::Relaxed)
    }

    /// Cancel any live tick subscription
    pub fn shutdown(&self) {
        match self.lock_workout() {
            Ok(_workout) => {
                self.apply_effects(&[Effect::UnsubscribeTick]);
            }
            Err(e) => {
                warn!("{}, cancelling ticks anyway", e);
                self.apply_effects(&[Effect::UnsubscribeTick]);
            }
        }
        info!("Tick source released");
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
