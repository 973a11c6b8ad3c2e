//! External services module
//!
//! Anything that reaches outside the process, currently only cue playback.

pub mod audio;

// Re-export main functions
pub use audio::{check_cue_command, play_cue, CueSettings};
