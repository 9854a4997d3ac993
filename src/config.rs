//! Configuration and CLI argument handling

use std::{sync::Arc, time::Duration};
use clap::{Parser, ValueEnum};

use crate::{
    cue::{BellCue, CommandCue, CuePlayer, SilentCue, ToneSequence},
    error::TimerError,
};

/// How phase transition cues are played
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CueKind {
    /// Terminal bell, one per pulse
    Bell,
    /// External command, one run per pulse
    Command,
    /// Log only
    Silent,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "interval-timer")]
#[command(about = "A state-managed HTTP server running interval workout presets")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Tick period in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_millis: u64,

    /// Cue played at every phase transition
    #[arg(long, value_enum, default_value = "bell")]
    pub cue: CueKind,

    /// Command run per cue pulse. `{hz}`, `{ms}` and `{gain}` are filled in; without `{hz}` the pitch is appended
    #[arg(long)]
    pub cue_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Tick period, never shorter than one millisecond
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }

    /// Build the configured cue player
    pub fn cue_player(&self) -> Result<Arc<dyn CuePlayer>, TimerError> {
        let sequence = ToneSequence::completion();
        Ok(match self.cue {
            CueKind::Bell => Arc::new(BellCue::new(sequence)),
            CueKind::Silent => Arc::new(SilentCue),
            CueKind::Command => {
                let command_line = self.cue_command.as_deref().ok_or_else(|| {
                    TimerError::Config("--cue command requires --cue-command".to_string())
                })?;
                Arc::new(CommandCue::parse(command_line, sequence)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, CueKind};
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["interval-timer"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.cue, CueKind::Bell);
        assert_eq!(config.tick_period(), Duration::from_secs(1));
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn zero_tick_is_clamped() {
        let config = Config::try_parse_from(["interval-timer", "--tick-millis", "0"]).unwrap();
        assert_eq!(config.tick_period(), Duration::from_millis(1));
    }

    #[test]
    fn command_cue_needs_command_line() {
        let config = Config::try_parse_from(["interval-timer", "--cue", "command"]).unwrap();
        assert!(config.cue_player().is_err());

        let config = Config::try_parse_from([
            "interval-timer",
            "--cue",
            "command",
            "--cue-command",
            "beep -f",
            "-v",
        ])
        .unwrap();
        assert!(config.cue_player().is_ok());
        assert_eq!(config.log_level(), "debug");
    }
}
