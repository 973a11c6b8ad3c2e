//! Timer state snapshot handed to the UI

use serde::{Deserialize, Serialize};

use super::TimerKind;
use crate::timer::format_remaining;

/// Coarse phase shared by both timers.
///
/// The brew timer maps stage 1 to `RunningOn` and stage 2 to `RunningOff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    Idle,
    RunningOn,
    RunningOff,
    Complete,
}

/// Point-in-time view of one timer instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub timer: TimerKind,
    pub phase: TimerPhase,
    pub paused: bool,
    pub remaining_seconds: u64,
    /// `remaining_seconds` rendered as `mm:ss`
    pub display: String,
    /// Current stage (brew) or completed round count (backwash)
    pub current: u32,
    /// Number of stages or rounds configured
    pub total: u32,
    /// Phase lengths in seconds, in the order they run
    pub configured_durations: Vec<u64>,
    pub label: String,
}

impl TimerState {
    pub fn new(
        timer: TimerKind,
        phase: TimerPhase,
        remaining_seconds: u64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            timer,
            phase,
            paused: false,
            remaining_seconds,
            display: format_remaining(remaining_seconds),
            current: 0,
            total: 0,
            configured_durations: Vec::new(),
            label: label.into(),
        }
    }

    /// True while ticks should be driving this timer
    pub fn is_active(&self) -> bool {
        matches!(self.phase, TimerPhase::RunningOn | TimerPhase::RunningOff) && !self.paused
    }
}
