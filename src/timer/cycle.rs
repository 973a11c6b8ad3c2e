//! Backwash cycle runner

use serde::{Deserialize, Serialize};

use super::{countdown::StageTick, CountdownStage, TimerMachine};
use crate::state::{Cue, TimerEvent, TimerKind, TimerPhase, TimerState};

const KIND: TimerKind = TimerKind::Backwash;

/// Lengths of one on/off round and how many rounds to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    pub on_seconds: u64,
    pub off_seconds: u64,
    pub total_rounds: u32,
}

impl CycleConfig {
    pub fn new(on_seconds: u64, off_seconds: u64, total_rounds: u32) -> Self {
        Self {
            on_seconds,
            off_seconds,
            total_rounds,
        }
    }

    /// Seconds a full run takes, zero-length phases included
    pub fn total_seconds(&self) -> u64 {
        self.on_seconds
            .saturating_add(self.off_seconds)
            .saturating_mul(u64::from(self.total_rounds))
    }
}

/// The fixed backwash buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePreset {
    /// 10s on, 10s off, 5 rounds
    Long,
    /// 5s on, 5s off, 10 rounds
    Short,
}

impl CyclePreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "long" => Some(Self::Long),
            "short" => Some(Self::Short),
            _ => None,
        }
    }

    pub fn config(&self) -> CycleConfig {
        match self {
            Self::Long => CycleConfig::new(10, 10, 5),
            Self::Short => CycleConfig::new(5, 5, 10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    On,
    Off,
    Complete,
}

/// Repeats an on/off countdown pair for a configured number of rounds
#[derive(Debug, Clone)]
pub struct CycleRunner {
    config: CycleConfig,
    phase: CyclePhase,
    round: u32,
    stage: CountdownStage,
}

impl Default for CycleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleRunner {
    pub fn new() -> Self {
        Self {
            config: CycleConfig::default(),
            phase: CyclePhase::Idle,
            round: 0,
            stage: CountdownStage::from_secs(0),
        }
    }

    /// Begin a fresh run of `config`, discarding whatever was in progress
    pub fn start(&mut self, config: CycleConfig) -> Vec<TimerEvent> {
        self.config = config;
        self.round = 0;
        let mut events = Vec::new();
        let expired = self.enter_round(&mut events);
        self.advance(expired, &mut events);
        events
    }

    /// Back to idle showing `00:00`. Stopping an idle runner does nothing.
    pub fn stop(&mut self) -> Vec<TimerEvent> {
        if self.phase == CyclePhase::Idle {
            return Vec::new();
        }
        self.phase = CyclePhase::Idle;
        self.round = 0;
        self.stage = CountdownStage::from_secs(0);
        vec![
            TimerEvent::display(KIND, 0),
            TimerEvent::phase(KIND, self.label()),
        ]
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Completed rounds
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn remaining(&self) -> u64 {
        self.stage.remaining()
    }

    pub fn config(&self) -> CycleConfig {
        self.config
    }

    /// Returns whether the new "on" stage expired on entry
    fn enter_round(&mut self, events: &mut Vec<TimerEvent>) -> bool {
        if self.round >= self.config.total_rounds {
            self.complete(events);
            return false;
        }
        events.push(TimerEvent::cue(KIND, Cue::RoundStart));
        self.phase = CyclePhase::On;
        self.stage = CountdownStage::from_secs(self.config.on_seconds);
        events.push(TimerEvent::display(KIND, self.stage.remaining()));
        events.push(TimerEvent::phase(KIND, self.label()));
        self.stage.arm().is_some()
    }

    fn enter_off(&mut self, events: &mut Vec<TimerEvent>) -> bool {
        events.push(TimerEvent::cue(KIND, Cue::OnToOff));
        self.phase = CyclePhase::Off;
        self.stage = CountdownStage::from_secs(self.config.off_seconds);
        events.push(TimerEvent::display(KIND, self.stage.remaining()));
        events.push(TimerEvent::phase(KIND, self.label()));
        self.stage.arm().is_some()
    }

    fn advance(&mut self, mut expired: bool, events: &mut Vec<TimerEvent>) {
        while expired {
            expired = match self.phase {
                CyclePhase::On => self.enter_off(events),
                CyclePhase::Off => {
                    self.round += 1;
                    self.enter_round(events)
                }
                CyclePhase::Idle | CyclePhase::Complete => false,
            };
        }
    }

    fn complete(&mut self, events: &mut Vec<TimerEvent>) {
        self.phase = CyclePhase::Complete;
        self.stage = CountdownStage::from_secs(0);
        events.push(TimerEvent::cue(KIND, Cue::Complete));
        events.push(TimerEvent::display(KIND, 0));
        events.push(TimerEvent::phase(KIND, self.label()));
        events.push(TimerEvent::completed(
            KIND,
            format!("Backwash complete after {} rounds", self.round),
        ));
    }

    fn label(&self) -> String {
        let total = self.config.total_rounds;
        match self.phase {
            CyclePhase::Idle => "Idle".to_string(),
            CyclePhase::On => format!("Round {}/{} - on", self.round + 1, total),
            CyclePhase::Off => format!("Round {}/{} - off", self.round + 1, total),
            CyclePhase::Complete => "Backwash complete".to_string(),
        }
    }
}

impl TimerMachine for CycleRunner {
    fn tick(&mut self) -> Vec<TimerEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        let mut events = Vec::new();
        match self.stage.tick() {
            Some(StageTick::Running(remaining)) => {
                events.push(TimerEvent::display(KIND, remaining));
            }
            Some(StageTick::Expired) => {
                events.push(TimerEvent::display(KIND, 0));
                self.advance(true, &mut events);
            }
            None => {}
        }
        events
    }

    fn is_running(&self) -> bool {
        matches!(self.phase, CyclePhase::On | CyclePhase::Off)
    }

    fn state(&self) -> TimerState {
        let phase = match self.phase {
            CyclePhase::Idle => TimerPhase::Idle,
            CyclePhase::On => TimerPhase::RunningOn,
            CyclePhase::Off => TimerPhase::RunningOff,
            CyclePhase::Complete => TimerPhase::Complete,
        };
        let mut state = TimerState::new(KIND, phase, self.stage.remaining(), self.label());
        state.current = self.round;
        state.total = self.config.total_rounds;
        state.configured_durations = vec![self.config.on_seconds, self.config.off_seconds];
        state
    }
}
