//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{TimerPhase, TimerState},
    timer::BrewInputs,
};

/// Response for every timer action endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    /// Build a response whose status is derived from the timer state
    pub fn new(message: impl Into<String>, timer: TimerState) -> Self {
        Self {
            status: status_label(&timer).to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Short status word for a timer: running, paused, idle or complete
pub fn status_label(timer: &TimerState) -> &'static str {
    match timer.phase {
        TimerPhase::Idle => "idle",
        TimerPhase::Complete => "complete",
        _ if timer.is_active() => "running",
        _ => "paused",
    }
}

/// Status of both timers plus server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub brew: TimerState,
    pub brew_inputs: BrewInputs,
    pub backwash: TimerState,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TimerKind;

    #[test]
    fn status_words() {
        let mut timer = TimerState::new(TimerKind::Brew, TimerPhase::RunningOn, 10, "Stage 1");
        assert!(timer.is_active());
        assert_eq!(status_label(&timer), "running");
        timer.paused = true;
        assert!(!timer.is_active());
        assert_eq!(status_label(&timer), "paused");
        timer.phase = TimerPhase::Complete;
        assert_eq!(status_label(&timer), "complete");
        timer.phase = TimerPhase::Idle;
        assert_eq!(status_label(&timer), "idle");
    }
}
