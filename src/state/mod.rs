//! State management module
//!
//! Shared application state, the timer snapshots it hands out and the
//! events the timers publish.

pub mod app_state;
pub mod events;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use events::{Cue, TimerEvent, TimerKind};
pub use timer_state::{TimerPhase, TimerState};
