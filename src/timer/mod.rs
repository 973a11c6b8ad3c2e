//! Timer core
//!
//! Pure state machines with no notion of wall-clock time. Every transition
//! returns the events it produced; something else (see `tasks::driver`)
//! feeds them one tick per second.

pub mod countdown;
pub mod cycle;
pub mod format;
pub mod input;
pub mod two_stage;

pub use countdown::{CountdownStage, StageTick};
pub use cycle::{CycleConfig, CyclePhase, CyclePreset, CycleRunner};
pub use format::{format_mm_ss, format_remaining};
pub use input::{coerce_whole, BrewDurations, BrewInputs, DurationInput};
pub use two_stage::{BrewPhase, TwoStageTimer};

use crate::state::{TimerEvent, TimerState};

/// A timer that can be driven by a one-second tick source
pub trait TimerMachine: Send + 'static {
    /// Apply one elapsed second
    fn tick(&mut self) -> Vec<TimerEvent>;

    /// Whether ticks should currently be delivered
    fn is_running(&self) -> bool;

    fn state(&self) -> TimerState;
}
