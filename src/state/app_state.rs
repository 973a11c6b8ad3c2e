//! Main application state management

use std::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::{TimerEvent, TimerState};
use crate::{
    tasks::{IntervalScheduler, Scheduler, TimerDriver},
    timer::{BrewDurations, BrewInputs, CyclePreset, CycleRunner, TwoStageTimer},
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Main application state: one independent timer instance per module
pub struct AppState {
    /// Two-stage brew timer
    pub brew: Mutex<TimerDriver<TwoStageTimer>>,
    /// Duration inputs as last edited; read only on reset
    pub brew_inputs: Mutex<BrewInputs>,
    /// Backwash cycle runner
    pub backwash: Mutex<TimerDriver<CycleRunner>>,
    /// Every timer event, for the cue player and `/events` subscribers
    pub events_tx: broadcast::Sender<TimerEvent>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create state backed by real one-second schedulers
    pub fn new(port: u16, host: String, durations: BrewDurations) -> Self {
        Self::with_schedulers(
            port,
            host,
            durations,
            Box::new(IntervalScheduler::new()),
            Box::new(IntervalScheduler::new()),
        )
    }

    /// Create state with explicit schedulers for the brew and backwash timers
    pub fn with_schedulers(
        port: u16,
        host: String,
        durations: BrewDurations,
        brew_scheduler: Box<dyn Scheduler>,
        backwash_scheduler: Box<dyn Scheduler>,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            brew: Mutex::new(TimerDriver::new(
                TwoStageTimer::new(durations),
                brew_scheduler,
                events_tx.clone(),
            )),
            brew_inputs: Mutex::new(BrewInputs::from_durations(durations)),
            backwash: Mutex::new(TimerDriver::new(
                CycleRunner::new(),
                backwash_scheduler,
                events_tx.clone(),
            )),
            events_tx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Subscribe to timer events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    /// Start or resume the brew timer
    pub fn start_brew(&self) -> Result<TimerState, String> {
        info!("Starting brew timer");
        let state = self.brew_driver()?.apply(|timer| timer.start())?;
        self.record_action("brew-start");
        Ok(state)
    }

    pub fn pause_brew(&self) -> Result<TimerState, String> {
        info!("Pausing brew timer");
        let state = self.brew_driver()?.apply(|timer| timer.pause())?;
        self.record_action("brew-pause");
        Ok(state)
    }

    /// Reset the brew timer from the current duration inputs
    pub fn reset_brew(&self) -> Result<TimerState, String> {
        let durations = self.inputs_lock()?.durations();
        info!(
            "Resetting brew timer: stage1={}s, stage2={}s",
            durations.stage1, durations.stage2
        );
        let state = self.brew_driver()?.apply(|timer| timer.reset(durations))?;
        self.record_action("brew-reset");
        Ok(state)
    }

    /// Store edited inputs. Edits reset the timer even mid-run.
    pub fn edit_brew_durations(&self, inputs: BrewInputs) -> Result<TimerState, String> {
        let durations = inputs.durations();
        *self.inputs_lock()? = inputs;
        info!(
            "Brew durations edited: stage1={}s, stage2={}s",
            durations.stage1, durations.stage2
        );
        let state = self
            .brew_driver()?
            .apply(|timer| timer.set_durations(durations))?;
        self.record_action("brew-durations");
        Ok(state)
    }

    /// Start a backwash preset, replacing any cycle already running
    pub fn start_backwash(&self, preset: CyclePreset) -> Result<TimerState, String> {
        let config = preset.config();
        info!(
            "Starting backwash: {}s on, {}s off, {} rounds",
            config.on_seconds, config.off_seconds, config.total_rounds
        );
        let state = self
            .backwash_driver()?
            .apply(|runner| runner.start(config))?;
        self.record_action("backwash-start");
        Ok(state)
    }

    pub fn stop_backwash(&self) -> Result<TimerState, String> {
        info!("Stopping backwash");
        let state = self.backwash_driver()?.apply(|runner| runner.stop())?;
        self.record_action("backwash-stop");
        Ok(state)
    }

    pub fn get_brew_state(&self) -> Result<TimerState, String> {
        self.brew_driver()?.state()
    }

    pub fn get_backwash_state(&self) -> Result<TimerState, String> {
        self.backwash_driver()?.state()
    }

    pub fn get_brew_inputs(&self) -> Result<BrewInputs, String> {
        self.inputs_lock().map(|inputs| inputs.clone())
    }

    /// Cancel every live tick handle
    pub fn shutdown(&self) {
        match self.brew_driver() {
            Ok(mut driver) => {
                if let Err(e) = driver.stop_ticking() {
                    warn!("Failed to stop brew timer: {}", e);
                }
            }
            Err(e) => warn!("{}", e),
        }
        match self.backwash_driver() {
            Ok(mut driver) => {
                if let Err(e) = driver.stop_ticking() {
                    warn!("Failed to stop backwash timer: {}", e);
                }
            }
            Err(e) => warn!("{}", e),
        }
        info!("Timers stopped");
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn brew_driver(&self) -> Result<MutexGuard<'_, TimerDriver<TwoStageTimer>>, String> {
        self.brew
            .lock()
            .map_err(|e| format!("Failed to lock brew timer: {}", e))
    }

    fn backwash_driver(&self) -> Result<MutexGuard<'_, TimerDriver<CycleRunner>>, String> {
        self.backwash
            .lock()
            .map_err(|e| format!("Failed to lock backwash timer: {}", e))
    }

    fn inputs_lock(&self) -> Result<MutexGuard<'_, BrewInputs>, String> {
        self.brew_inputs
            .lock()
            .map_err(|e| format!("Failed to lock brew inputs: {}", e))
    }
}
