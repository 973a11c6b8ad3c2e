//! Brew Timers - brew-stage and backwash-cycle timers served over HTTP
//!
//! The timer state machines live in [`timer`] and know nothing about wall
//! clocks. [`tasks`] drives them once per second, [`state`] owns one
//! instance per timer and [`api`] exposes them to whatever UI is rendering.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
