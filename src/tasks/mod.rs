//! Background tasks module
//!
//! Tick scheduling, the driver that ties a timer to its scheduler, and the
//! cue player that runs alongside the HTTP server.

pub mod cue_player;
pub mod driver;
pub mod scheduler;

// Re-export main types
pub use cue_player::cue_player_task;
pub use driver::TimerDriver;
pub use scheduler::{IntervalScheduler, ManualScheduler, Scheduler, TickCallback, TickFlow};
