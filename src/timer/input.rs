//! Normalization of user-edited duration inputs
//!
//! Inputs come from a form, so any field may be a number, a numeric string,
//! an empty string or missing entirely. Nothing here ever fails: whatever
//! cannot be read as a number counts as zero.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read a JSON value as a whole number, coercing anything unreadable to zero
pub fn coerce_whole(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => parse_whole(s),
        _ => 0,
    }
}

fn parse_whole(raw: &str) -> i64 {
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f as i64)
        })
        .unwrap_or(0)
}

/// A minutes/seconds pair as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationInput {
    #[serde(default)]
    pub minutes: Value,
    #[serde(default)]
    pub seconds: Value,
}

impl DurationInput {
    /// Build an input holding an already-normalized second count
    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            minutes: Value::from(seconds / 60),
            seconds: Value::from(seconds % 60),
        }
    }

    /// Total length in seconds, clamped at zero
    pub fn total_seconds(&self) -> u64 {
        let total = coerce_whole(&self.minutes)
            .saturating_mul(60)
            .saturating_add(coerce_whole(&self.seconds));
        u64::try_from(total).unwrap_or(0)
    }
}

/// Normalized stage lengths for the two-stage brew timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrewDurations {
    pub stage1: u64,
    pub stage2: u64,
}

impl BrewDurations {
    pub fn new(stage1: u64, stage2: u64) -> Self {
        Self { stage1, stage2 }
    }
}

/// The two duration pairs of the brew form, read only at reset time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrewInputs {
    #[serde(default)]
    pub stage1: DurationInput,
    #[serde(default)]
    pub stage2: DurationInput,
}

impl BrewInputs {
    pub fn from_durations(durations: BrewDurations) -> Self {
        Self {
            stage1: DurationInput::from_seconds(durations.stage1),
            stage2: DurationInput::from_seconds(durations.stage2),
        }
    }

    pub fn durations(&self) -> BrewDurations {
        BrewDurations::new(self.stage1.total_seconds(), self.stage2.total_seconds())
    }
}
