//! Events published by the timers for whatever UI is listening

use serde::{Deserialize, Serialize};

use crate::timer::format_remaining;

/// Which timer instance an event or state belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    Brew,
    Backwash,
}

impl TimerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brew => "brew",
            Self::Backwash => "backwash",
        }
    }
}

/// Audible/visual cue emitted at a phase boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Brew stage 1 finished, stage 2 begins
    StageChange,
    /// A backwash round begins its "on" sub-phase
    RoundStart,
    /// A backwash round switches from "on" to "off"
    OnToOff,
    /// The whole timer finished
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// New `mm:ss` value, sent on every tick and every reset
    Display {
        timer: TimerKind,
        display: String,
        remaining_seconds: u64,
    },
    /// Status label changed (stage, round, on/off)
    Phase { timer: TimerKind, label: String },
    Cue { timer: TimerKind, cue: Cue },
    Completed { timer: TimerKind, message: String },
}

impl TimerEvent {
    pub fn display(timer: TimerKind, remaining_seconds: u64) -> Self {
        Self::Display {
            timer,
            display: format_remaining(remaining_seconds),
            remaining_seconds,
        }
    }

    pub fn phase(timer: TimerKind, label: impl Into<String>) -> Self {
        Self::Phase {
            timer,
            label: label.into(),
        }
    }

    pub fn cue(timer: TimerKind, cue: Cue) -> Self {
        Self::Cue { timer, cue }
    }

    pub fn completed(timer: TimerKind, message: impl Into<String>) -> Self {
        Self::Completed {
            timer,
            message: message.into(),
        }
    }

    pub fn timer(&self) -> TimerKind {
        match self {
            Self::Display { timer, .. }
            | Self::Phase { timer, .. }
            | Self::Cue { timer, .. }
            | Self::Completed { timer, .. } => *timer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = TimerEvent::display(TimerKind::Brew, 65);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "display");
        assert_eq!(json["timer"], "brew");
        assert_eq!(json["display"], "01:05");

        let cue = serde_json::to_value(TimerEvent::cue(TimerKind::Backwash, Cue::OnToOff)).unwrap();
        assert_eq!(cue["type"], "cue");
        assert_eq!(cue["cue"], "on_to_off");
    }
}
