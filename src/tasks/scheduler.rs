//! Tick scheduling
//!
//! A scheduler owns at most one recurring tick handle. Starting a new run
//! always cancels the previous one first.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::debug;

/// Period between ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// What the tick callback wants to happen next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    /// The run expired or was superseded; drop the handle
    Stop,
}

pub type TickCallback = Box<dyn FnMut() -> TickFlow + Send + 'static>;

/// Source of one-second ticks
pub trait Scheduler: Send {
    /// Deliver ticks to `on_tick` until it returns `TickFlow::Stop` or the
    /// run is cancelled. Any earlier run is cancelled first.
    fn start(&mut self, on_tick: TickCallback);

    /// Drop the live handle, if any. Safe to call repeatedly.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Wall-clock scheduler backed by a tokio interval task
#[derive(Debug)]
pub struct IntervalScheduler {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for IntervalScheduler {
    fn start(&mut self, mut on_tick: TickCallback) {
        self.cancel();

        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            // First tick lands one full period after start
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if on_tick() == TickFlow::Stop {
                    debug!("Tick run finished");
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Tick handle cancelled");
        }
    }

    fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Scheduler that only ticks when told to.
///
/// Clones share the same handle, so a test can keep one clone and hand the
/// other to a driver.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualInner>>,
}

#[derive(Default)]
struct ManualInner {
    callback: Option<TickCallback>,
    starts: usize,
    cancels: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver up to `ticks` ticks and return how many were delivered.
    /// Stops early once the callback asks to stop.
    pub fn advance(&self, ticks: usize) -> usize {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let mut delivered = 0;
        for _ in 0..ticks {
            let Some(callback) = inner.callback.as_mut() else {
                break;
            };
            delivered += 1;
            if callback() == TickFlow::Stop {
                inner.callback = None;
            }
        }
        delivered
    }

    /// Number of handles currently able to deliver ticks (0 or 1)
    pub fn live_handles(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        usize::from(inner.callback.is_some())
    }

    pub fn starts(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).starts
    }

    /// Number of live handles that were cancelled
    pub fn cancels(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).cancels
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("live_handles", &self.live_handles())
            .field("starts", &self.starts())
            .field("cancels", &self.cancels())
            .finish()
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, on_tick: TickCallback) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.callback.take().is_some() {
            inner.cancels += 1;
        }
        inner.callback = Some(on_tick);
        inner.starts += 1;
    }

    fn cancel(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.callback.take().is_some() {
            inner.cancels += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.live_handles() > 0
    }
}
