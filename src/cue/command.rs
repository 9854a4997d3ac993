//! External command cue

use std::process::Stdio;
use tokio::{
    process::Command,
    time::{sleep_until, Instant},
};
use tracing::{debug, warn};

use super::{spawn_cue, CuePlayer, Tone, ToneSequence};
use crate::error::TimerError;

/// Runs an external player once per pulse.
///
/// Arguments may carry `{hz}`, `{ms}` and `{gain}` placeholders, filled from
/// the pulse (e.g. `play -n synth {ms}e-3 sine {hz} vol {gain}`). Without a
/// `{hz}` placeholder the pitch is appended as the last argument
/// (e.g. `beep -l 800 -f`).
#[derive(Debug, Clone)]
pub struct CommandCue {
    program: String,
    args: Vec<String>,
    sequence: ToneSequence,
}

impl CommandCue {
    /// Parse a whitespace separated command line
    pub fn parse(command_line: &str, sequence: ToneSequence) -> Result<Self, TimerError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| TimerError::Config("cue command is empty".to_string()))?;

        Ok(Self {
            program,
            args: parts.collect(),
            sequence,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments for one pulse
    pub fn args_for(&self, tone: &Tone) -> Vec<String> {
        let hz = tone.frequency_hz.to_string();
        let ms = tone.duration.as_millis().to_string();
        let gain = format!("{:.2}", tone.gain);

        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                arg.replace("{hz}", &hz)
                    .replace("{ms}", &ms)
                    .replace("{gain}", &gain)
            })
            .collect();
        if !self.args.iter().any(|arg| arg.contains("{hz}")) {
            args.push(hz);
        }
        args
    }
}

impl CuePlayer for CommandCue {
    fn play_completion_cue(&self) {
        let cue = self.clone();
        spawn_cue("command", async move {
            let started = Instant::now();
            let mut children = Vec::new();
            for tone in cue.sequence.tones() {
                sleep_until(started + tone.start).await;
                debug!(
                    "Running {} for {} Hz pulse at gain {}",
                    cue.program, tone.frequency_hz, tone.gain
                );
                let child = Command::new(&cue.program)
                    .args(cue.args_for(tone))
                    .stdout(Stdio::null())
                    .stderr(Stdio::piped())
                    .spawn()?;
                children.push(child);
            }

            for child in children {
                let output = child.wait_with_output().await?;
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!("Cue command {} failed: {}", cue.program, stderr.trim());
                }
            }
            Ok(())
        });
    }
}
