//! Completion cue emission
//!
//! The engine only knows [`CuePlayer::play_completion_cue`]. Players schedule
//! the three-pulse [`ToneSequence`] on a spawned task and swallow their own
//! failures, so a broken audio path never stalls the countdown.

pub mod bell;
pub mod command;

use std::{future::Future, time::Duration};
use tracing::{debug, warn};

pub use bell::BellCue;
pub use command::CommandCue;

/// Fire-and-forget cue capability
pub trait CuePlayer: Send + Sync + std::fmt::Debug {
    fn play_completion_cue(&self);
}

/// One pulse of the cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: u32,
    /// Offset from the start of the sequence
    pub start: Duration,
    pub duration: Duration,
    pub gain: f32,
}

impl Tone {
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }
}

/// Ordered pulses making up a cue
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSequence {
    tones: Vec<Tone>,
}

impl ToneSequence {
    /// High, lower, then highest pitch over 3.5 seconds
    pub fn completion() -> Self {
        Self {
            tones: vec![
                Tone {
                    frequency_hz: 1000,
                    start: Duration::ZERO,
                    duration: Duration::from_millis(800),
                    gain: 0.4,
                },
                Tone {
                    frequency_hz: 800,
                    start: Duration::from_millis(1000),
                    duration: Duration::from_millis(800),
                    gain: 0.4,
                },
                Tone {
                    frequency_hz: 1200,
                    start: Duration::from_millis(2000),
                    duration: Duration::from_millis(1500),
                    gain: 0.5,
                },
            ],
        }
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    /// Pulses with a positive gain
    pub fn audible(&self) -> impl Iterator<Item = &Tone> {
        self.tones.iter().filter(|tone| tone.gain > 0.0)
    }

    pub fn total_duration(&self) -> Duration {
        self.tones.iter().map(Tone::end).max().unwrap_or(Duration::ZERO)
    }
}

impl Default for ToneSequence {
    fn default() -> Self {
        Self::completion()
    }
}

/// Cue that only logs
#[derive(Debug, Default, Clone)]
pub struct SilentCue;

impl CuePlayer for SilentCue {
    fn play_completion_cue(&self) {
        debug!("Completion cue (silent)");
    }
}

/// Run a cue future on the current tokio runtime, logging its failure.
///
/// Outside a runtime the cue is dropped with a warning.
pub(crate) fn spawn_cue<F>(kind: &'static str, task: F)
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = task.await {
                    warn!("{} cue failed: {}", kind, e);
                }
            });
        }
        Err(_) => warn!("No async runtime available, skipping {} cue", kind),
    }
}

#[cfg(test)]
mod tests {
    use super::{CuePlayer, SilentCue, ToneSequence};
    use std::time::Duration;

    #[test]
    fn completion_sequence_shape() {
        let sequence = ToneSequence::completion();
        let pitches: Vec<u32> = sequence.tones().iter().map(|t| t.frequency_hz).collect();

        assert_eq!(pitches, vec![1000, 800, 1200]);
        assert_eq!(sequence.total_duration(), Duration::from_millis(3500));
    }

    #[test]
    fn muted_pulses_are_not_audible() {
        let mut sequence = ToneSequence::completion();
        assert_eq!(sequence.audible().count(), 3);

        sequence.tones[1].gain = 0.0;
        let audible: Vec<u32> = sequence.audible().map(|t| t.frequency_hz).collect();
        assert_eq!(audible, vec![1000, 1200]);
    }

    #[test]
    fn pulses_do_not_overlap() {
        let sequence = ToneSequence::completion();
        for pair in sequence.tones().windows(2) {
            assert!(pair[0].end() <= pair[1].start);
        }
    }

    #[test]
    fn cue_outside_runtime_is_harmless() {
        SilentCue.play_completion_cue();
        super::spawn_cue("test", async { Err(anyhow::anyhow!("never runs")) });
    }
}
