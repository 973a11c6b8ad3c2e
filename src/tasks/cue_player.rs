//! Cue player background task

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::{
    services::{audio::cue_name, play_cue, CueSettings},
    state::TimerEvent,
};

/// Background task that plays a cue for every `TimerEvent::Cue`.
///
/// Playback runs detached from the timers: a failure is logged and dropped
/// and never reaches timer state.
pub async fn cue_player_task(settings: CueSettings, mut events_rx: broadcast::Receiver<TimerEvent>) {
    info!("Starting cue player task (sound {})", if settings.enabled { "on" } else { "off" });

    loop {
        match events_rx.recv().await {
            Ok(TimerEvent::Cue { timer, cue }) => {
                if !settings.enabled {
                    debug!("Sound disabled, skipping {} cue for {}", cue_name(cue), timer.as_str());
                    continue;
                }
                let settings = settings.clone();
                tokio::spawn(async move {
                    if let Err(e) = play_cue(&settings, cue).await {
                        warn!("Cue playback failed for {}: {}", timer.as_str(), e);
                    }
                });
            }
            Ok(TimerEvent::Completed { timer, message }) => {
                info!("{}: {}", timer.as_str(), message);
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Cue player lagged behind, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Event channel closed, stopping cue player");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::{
        state::{AppState, TimerPhase},
        tasks::ManualScheduler,
        timer::{BrewDurations, CyclePreset},
    };

    #[tokio::test]
    async fn failing_cues_keep_player_and_timer_running() {
        let brew = ManualScheduler::new();
        let state = AppState::with_schedulers(
            20554,
            "127.0.0.1".to_string(),
            BrewDurations::new(0, 3),
            Box::new(brew.clone()),
            Box::new(ManualScheduler::new()),
        );
        let settings = CueSettings::new(true, Some("definitely-not-a-real-cue-player-binary"));
        let player = tokio::spawn(cue_player_task(settings, state.subscribe()));

        // Zero-length stage 1 fires a stage-change cue on start
        state.start_brew().unwrap();
        brew.advance(3);
        state.start_backwash(CyclePreset::Short).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!player.is_finished());
        assert_eq!(state.get_brew_state().unwrap().phase, TimerPhase::Complete);
        assert_eq!(state.get_backwash_state().unwrap().phase, TimerPhase::RunningOn);

        drop(state);
        tokio::time::timeout(Duration::from_secs(5), player)
            .await
            .expect("cue player should stop once the channel closes")
            .unwrap();
    }
}
