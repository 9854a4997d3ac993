//! Terminal bell cue

use tokio::{
    io::AsyncWriteExt,
    time::{sleep_until, Instant},
};
use tracing::debug;

use super::{spawn_cue, CuePlayer, ToneSequence};

/// Rings the terminal bell once per audible pulse, on the pulse schedule.
/// The bell has no volume, so a pulse with zero gain is skipped.
#[derive(Debug, Clone, Default)]
pub struct BellCue {
    sequence: ToneSequence,
}

impl BellCue {
    pub fn new(sequence: ToneSequence) -> Self {
        Self { sequence }
    }
}

impl CuePlayer for BellCue {
    fn play_completion_cue(&self) {
        let sequence = self.sequence.clone();
        spawn_cue("bell", async move {
            let started = Instant::now();
            let mut stdout = tokio::io::stdout();
            for tone in sequence.audible() {
                sleep_until(started + tone.start).await;
                debug!(
                    "Bell pulse at {} Hz for {:?} (gain {})",
                    tone.frequency_hz, tone.duration, tone.gain
                );
                stdout.write_all(b"\x07").await?;
                stdout.flush().await?;
            }
            Ok(())
        });
    }
}
