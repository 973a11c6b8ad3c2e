//! Binds a timer machine to a tick scheduler

use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, error, trace};

use super::scheduler::{Scheduler, TickCallback, TickFlow};
use crate::{
    state::{TimerEvent, TimerState},
    timer::TimerMachine,
};

struct Shared<M> {
    machine: M,
    /// Identifies the only run whose ticks may reach `machine`
    generation: u64,
}

/// Owns one timer instance and its tick handle.
///
/// Every transition that changes the run bumps the generation, cancels the
/// current handle and, when the machine is still running, starts a fresh
/// one. A tick already in flight from the old handle sees a stale
/// generation and is dropped, so one handle drives the machine at a time.
pub struct TimerDriver<M: TimerMachine> {
    shared: Arc<Mutex<Shared<M>>>,
    scheduler: Box<dyn Scheduler>,
    events_tx: broadcast::Sender<TimerEvent>,
}

impl<M: TimerMachine> TimerDriver<M> {
    pub fn new(
        machine: M,
        scheduler: Box<dyn Scheduler>,
        events_tx: broadcast::Sender<TimerEvent>,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                machine,
                generation: 0,
            })),
            scheduler,
            events_tx,
        }
    }

    /// Run a transition and line the tick handle up with the result.
    ///
    /// A transition that emits no events changed nothing and leaves the
    /// current handle alone.
    pub fn apply<F>(&mut self, transition: F) -> Result<TimerState, String>
    where
        F: FnOnce(&mut M) -> Vec<TimerEvent>,
    {
        let (state, restart) = {
            let mut shared = self
                .shared
                .lock()
                .map_err(|e| format!("Failed to lock timer: {}", e))?;

            let events = transition(&mut shared.machine);
            if events.is_empty() {
                return Ok(shared.machine.state());
            }

            shared.generation += 1;
            publish(&self.events_tx, events);

            let restart = shared.machine.is_running().then_some(shared.generation);
            (shared.machine.state(), restart)
        };

        self.scheduler.cancel();
        if let Some(generation) = restart {
            debug!("Starting tick run {} for {}", generation, state.timer.as_str());
            let callback = self.tick_callback(generation);
            self.scheduler.start(callback);
        }

        Ok(state)
    }

    /// Cancel the tick handle without touching the machine
    pub fn stop_ticking(&mut self) -> Result<(), String> {
        {
            let mut shared = self
                .shared
                .lock()
                .map_err(|e| format!("Failed to lock timer: {}", e))?;
            shared.generation += 1;
        }
        self.scheduler.cancel();
        Ok(())
    }

    pub fn state(&self) -> Result<TimerState, String> {
        self.shared
            .lock()
            .map(|shared| shared.machine.state())
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    /// Whether a tick handle is currently live
    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_active()
    }

    fn tick_callback(&self, generation: u64) -> TickCallback {
        let shared = Arc::clone(&self.shared);
        let events_tx = self.events_tx.clone();

        Box::new(move || {
            let mut shared = match shared.lock() {
                Ok(shared) => shared,
                Err(e) => {
                    error!("Failed to lock timer for tick: {}", e);
                    return TickFlow::Stop;
                }
            };

            if shared.generation != generation {
                trace!("Dropping tick from superseded run {}", generation);
                return TickFlow::Stop;
            }

            let events = shared.machine.tick();
            publish(&events_tx, events);

            if shared.machine.is_running() {
                TickFlow::Continue
            } else {
                TickFlow::Stop
            }
        })
    }
}

fn publish(events_tx: &broadcast::Sender<TimerEvent>, events: Vec<TimerEvent>) {
    for event in events {
        // No subscribers is fine; the UI may simply not be listening
        if events_tx.send(event).is_err() {
            trace!("No event subscribers");
        }
    }
}
