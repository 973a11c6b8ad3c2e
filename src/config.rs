//! Configuration and CLI argument handling

use clap::Parser;

use crate::{services::CueSettings, timer::BrewDurations};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "brew-timers")]
#[command(about = "Brew-stage and backwash-cycle timers served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial length of brew stage 1 in seconds
    #[arg(long, default_value = "30")]
    pub stage1: u64,

    /// Initial length of brew stage 2 in seconds
    #[arg(long, default_value = "150")]
    pub stage2: u64,

    /// Command to run for each cue, e.g. "paplay /usr/share/sounds/ding.oga"
    #[arg(long)]
    pub cue_command: Option<String>,

    /// Do not play cues
    #[arg(long)]
    pub no_sound: bool,

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

    pub fn brew_durations(&self) -> BrewDurations {
        BrewDurations::new(self.stage1, self.stage2)
    }

    pub fn cue_settings(&self) -> CueSettings {
        CueSettings::new(!self.no_sound, self.cue_command.as_deref())
    }
}
