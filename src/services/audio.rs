//! Cue playback

use std::{env, io::Write, path::Path};
use tokio::process::Command;
use tracing::{debug, info};

use crate::state::Cue;

/// How cues are played
#[derive(Debug, Clone, Default)]
pub struct CueSettings {
    pub enabled: bool,
    /// Program and arguments to run for each cue. The terminal bell is used
    /// when empty.
    pub command: Vec<String>,
}

impl CueSettings {
    /// Split a shell-style command line on whitespace
    pub fn new(enabled: bool, command_line: Option<&str>) -> Self {
        Self {
            enabled,
            command: command_line
                .map(|line| line.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

pub fn cue_name(cue: Cue) -> &'static str {
    match cue {
        Cue::StageChange => "stage_change",
        Cue::RoundStart => "round_start",
        Cue::OnToOff => "on_to_off",
        Cue::Complete => "complete",
    }
}

/// Play a single cue. The cue name is exported to the command as `BREW_CUE`.
pub async fn play_cue(settings: &CueSettings, cue: Cue) -> Result<(), String> {
    let Some((program, args)) = settings.command.split_first() else {
        return ring_bell();
    };

    debug!("Playing {} cue with {}", cue_name(cue), program);

    let output = Command::new(program)
        .args(args)
        .env("BREW_CUE", cue_name(cue))
        .output()
        .await
        .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} failed: {}", program, stderr.trim()));
    }

    Ok(())
}

fn ring_bell() -> Result<(), String> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(b"\x07")
        .and_then(|_| stdout.flush())
        .map_err(|e| format!("Failed to ring terminal bell: {}", e))
}

/// Check the configured cue program exists, either as a path or on `PATH`
pub fn check_cue_command(settings: &CueSettings) -> Result<(), String> {
    let Some(program) = settings.command.first() else {
        return Ok(());
    };

    let program_path = Path::new(program);
    let found = if program_path.components().count() > 1 {
        program_path.is_file()
    } else {
        env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
            .unwrap_or(false)
    };

    if found {
        info!("Cue command {} is available", program);
        Ok(())
    } else {
        Err(format!("Cue command {} was not found", program))
    }
}
