//! Single countdown stage

/// Result of arming or ticking a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageTick {
    /// Still counting; carries the new remaining value
    Running(u64),
    /// Reached zero on this call. Returned at most once per stage.
    Expired,
}

/// Counts a fixed number of whole seconds down to zero.
///
/// The stage never repeats: once it has reported `Expired` every further
/// `arm`/`tick` is inert until a new stage is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownStage {
    duration: u64,
    remaining: u64,
    paused: bool,
    fired: bool,
}

impl CountdownStage {
    /// Build a stage from a possibly negative duration; negatives count as zero
    pub fn new(duration_seconds: i64) -> Self {
        Self::from_secs(u64::try_from(duration_seconds).unwrap_or(0))
    }

    pub fn from_secs(duration: u64) -> Self {
        Self {
            duration,
            remaining: duration,
            paused: false,
            fired: false,
        }
    }

    /// Called when the stage becomes current. A zero-length stage expires
    /// here without waiting for a tick.
    pub fn arm(&mut self) -> Option<StageTick> {
        if !self.fired && self.remaining == 0 {
            self.fired = true;
            return Some(StageTick::Expired);
        }
        None
    }

    /// Advance by one second. Inert while paused or after expiry.
    pub fn tick(&mut self) -> Option<StageTick> {
        if self.fired || self.paused {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.fired = true;
            Some(StageTick::Expired)
        } else {
            Some(StageTick::Running(self.remaining))
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_expired(&self) -> bool {
        self.fired
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}
