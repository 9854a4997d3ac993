//! Owned container for the preset store and the timer session

use tracing::{info, warn};

use super::{
    DeleteOutcome, Effect, PresetForm, PresetStore, SessionView, TimerSession, Transition,
    WorkoutPreset,
};

/// Preset store plus the session running against its active preset.
///
/// The session only stores the active preset id; preset parameters are read
/// from the store on every event, so edits reach the engine at its next
/// transition.
#[derive(Debug, Clone)]
pub struct Workout {
    presets: PresetStore,
    session: TimerSession,
}

impl Workout {
    /// Start with the first preset of `presets` selected
    pub fn new(presets: PresetStore) -> Self {
        let session = TimerSession::initial(presets.first());
        Self { presets, session }
    }

    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    pub fn active_preset(&self) -> Option<&WorkoutPreset> {
        self.presets.get(&self.session.active_preset_id)
    }

    pub fn view(&self) -> SessionView {
        SessionView::new(&self.session, self.active_preset())
    }

    pub fn create(&mut self, form: PresetForm) -> String {
        self.presets.create(form)
    }

    /// Edit a preset in place. The live countdown is left alone.
    pub fn update(&mut self, id: &str, form: PresetForm) -> bool {
        self.presets.update(id, form)
    }

    pub fn delete(&mut self, id: &str) -> (DeleteOutcome, Vec<Effect>) {
        let outcome = self.presets.delete(id);
        let effects = match &outcome {
            DeleteOutcome::Removed { fallback_id } if self.session.active_preset_id == id => {
                info!("Active preset {} deleted, selecting {}", id, fallback_id);
                let fallback_id = fallback_id.clone();
                self.select(&fallback_id).unwrap_or_default()
            }
            _ => Vec::new(),
        };
        (outcome, effects)
    }

    /// Select a preset. `None` when the id is unknown.
    ///
    /// Selecting the preset that is already active changes nothing.
    pub fn select(&mut self, id: &str) -> Option<Vec<Effect>> {
        let preset = self.presets.get(id)?;
        if self.session.active_preset_id == id {
            return Some(Vec::new());
        }
        info!("Selected preset {} ({})", preset.id, preset.name);
        let transition = self.session.on_preset_selected(preset);
        Some(self.apply(transition))
    }

    pub fn tick(&mut self) -> Vec<Effect> {
        let Some(preset) = self.active_preset() else {
            warn!("Tick without an active preset");
            return Vec::new();
        };
        let transition = self.session.on_tick(preset);
        if transition.emits_cue() {
            let next = &transition.session;
            info!(
                "Phase transition: {:?} -> {:?} (rep {}/{}, running={})",
                self.session.phase, next.phase, next.current_rep, preset.total_reps, next.running
            );
        }
        self.apply(transition)
    }

    pub fn start_pause(&mut self) -> Vec<Effect> {
        let transition = self.session.on_start_pause();
        if transition.session.running != self.session.running {
            info!("Timer {}", if transition.session.running { "started" } else { "paused" });
        }
        self.apply(transition)
    }

    pub fn reset(&mut self) -> Vec<Effect> {
        let Some(preset) = self.active_preset() else {
            warn!("Reset without an active preset");
            return Vec::new();
        };
        info!("Resetting session for preset {}", preset.id);
        let transition = self.session.on_reset(preset);
        self.apply(transition)
    }

    fn apply(&mut self, transition: Transition) -> Vec<Effect> {
        self.session = transition.session;
        transition.effects
    }
}

impl Default for Workout {
    fn default() -> Self {
        Self::new(PresetStore::seeded())
    }
}
