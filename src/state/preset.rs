//! Workout presets and the in-memory preset store

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{error::TimerError, utils::format_time};

/// A named, reusable workout configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPreset {
    /// Assigned at creation, never changed afterwards
    pub id: String,
    pub name: String,
    /// Seconds of the work phase
    pub workout_time: u32,
    /// Seconds of the rest phase
    pub rest_time: u32,
    pub total_reps: u32,
    /// Roll from work into rest (and rest into work) without operator input
    pub auto_continue: bool,
}

impl WorkoutPreset {
    fn from_form(id: String, form: PresetForm) -> Self {
        Self {
            id,
            name: form.name,
            workout_time: form.workout_time,
            rest_time: form.rest_time,
            total_reps: form.total_reps,
            auto_continue: form.auto_continue,
        }
    }

    /// Totals for one full session of this preset
    pub fn summary(&self) -> PresetSummary {
        PresetSummary::for_preset(self)
    }
}

/// Form record produced by the input surface for create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetForm {
    pub name: String,
    pub workout_time: u32,
    pub rest_time: u32,
    pub total_reps: u32,
    pub auto_continue: bool,
}

impl PresetForm {
    /// Input-surface guard applied before submission.
    ///
    /// The store accepts whatever it is given; callers facing untrusted input
    /// run this first.
    pub fn validate(&self) -> Result<(), TimerError> {
        if self.name.trim().is_empty() {
            return Err(TimerError::InvalidPreset("name must not be empty".to_string()));
        }
        let fields = [
            ("workoutTime", self.workout_time),
            ("restTime", self.rest_time),
            ("totalReps", self.total_reps),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(TimerError::InvalidPreset(format!("{} must be at least 1", field)));
            }
        }
        Ok(())
    }
}

impl Default for PresetForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            workout_time: 30,
            rest_time: 10,
            total_reps: 5,
            auto_continue: true,
        }
    }
}

impl From<&WorkoutPreset> for PresetForm {
    fn from(preset: &WorkoutPreset) -> Self {
        Self {
            name: preset.name.clone(),
            workout_time: preset.workout_time,
            rest_time: preset.rest_time,
            total_reps: preset.total_reps,
            auto_continue: preset.auto_continue,
        }
    }
}

/// Session totals of a preset, raw seconds plus `mm:ss` renderings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSummary {
    pub total_workout_seconds: u64,
    pub total_rest_seconds: u64,
    pub total_duration_seconds: u64,
    pub total_workout: String,
    pub total_rest: String,
    pub total_duration: String,
}

impl PresetSummary {
    fn for_preset(preset: &WorkoutPreset) -> Self {
        // No rest after the last rep is counted here, even though the engine plays one.
        // Each product fits in u64; only the sum can exceed it.
        let reps = u64::from(preset.total_reps);
        let total_workout_seconds = u64::from(preset.workout_time) * reps;
        let total_rest_seconds = u64::from(preset.rest_time) * reps.saturating_sub(1);
        let total_duration_seconds = total_workout_seconds.saturating_add(total_rest_seconds);

        Self {
            total_workout_seconds,
            total_rest_seconds,
            total_duration_seconds,
            total_workout: format_time(total_workout_seconds),
            total_rest: format_time(total_rest_seconds),
            total_duration: format_time(total_duration_seconds),
        }
    }
}

/// Result of a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Preset removed; `fallback_id` is the first remaining preset
    Removed { fallback_id: String },
    /// Refused because it would leave the store empty
    LastPreset,
    NotFound,
}

/// Ordered list of presets, never empty
#[derive(Debug, Clone)]
pub struct PresetStore {
    presets: Vec<WorkoutPreset>,
}

impl PresetStore {
    /// Build a store from an initial list
    pub fn new(presets: Vec<WorkoutPreset>) -> Result<Self, TimerError> {
        if presets.is_empty() {
            return Err(TimerError::EmptyPresetStore);
        }
        Ok(Self { presets })
    }

    /// Store seeded with the built-in presets
    pub fn seeded() -> Self {
        Self {
            presets: vec![
                WorkoutPreset {
                    id: "1".to_string(),
                    name: "Quick HIIT".to_string(),
                    workout_time: 30,
                    rest_time: 10,
                    total_reps: 8,
                    auto_continue: true,
                },
                WorkoutPreset {
                    id: "2".to_string(),
                    name: "Strength Training".to_string(),
                    workout_time: 45,
                    rest_time: 60,
                    total_reps: 5,
                    auto_continue: false,
                },
            ],
        }
    }

    pub fn list(&self) -> &[WorkoutPreset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn get(&self, id: &str) -> Option<&WorkoutPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// First preset in order. The store is never empty.
    pub fn first(&self) -> &WorkoutPreset {
        &self.presets[0]
    }

    /// Append a preset built from `form` and return its fresh id
    pub fn create(&mut self, form: PresetForm) -> String {
        let id = self.next_id();
        info!("Creating preset {} ({})", id, form.name);
        self.presets.push(WorkoutPreset::from_form(id.clone(), form));
        id
    }

    /// Replace every field but the id. Returns false when `id` is unknown.
    pub fn update(&mut self, id: &str, form: PresetForm) -> bool {
        match self.presets.iter_mut().find(|p| p.id == id) {
            Some(preset) => {
                info!("Updating preset {} ({} -> {})", id, preset.name, form.name);
                *preset = WorkoutPreset::from_form(preset.id.clone(), form);
                true
            }
            None => {
                debug!("Ignoring update for unknown preset {}", id);
                false
            }
        }
    }

    /// Remove a preset unless it is the only one left
    pub fn delete(&mut self, id: &str) -> DeleteOutcome {
        let Some(index) = self.presets.iter().position(|p| p.id == id) else {
            debug!("Ignoring delete for unknown preset {}", id);
            return DeleteOutcome::NotFound;
        };
        if self.presets.len() <= 1 {
            debug!("Refusing to delete {}, it is the last preset", id);
            return DeleteOutcome::LastPreset;
        }

        let removed = self.presets.remove(index);
        info!("Deleted preset {} ({})", removed.id, removed.name);
        DeleteOutcome::Removed {
            fallback_id: self.presets[0].id.clone(),
        }
    }

    /// Millisecond creation timestamp, bumped until unused
    fn next_id(&self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        while self.contains(&candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }
}

impl Default for PresetStore {
    fn default() -> Self {
        Self::seeded()
    }
}
