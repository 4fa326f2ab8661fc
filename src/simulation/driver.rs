//! Tick-driven execution
//!
//! Both controllers expose the same `advance_tick` entry point. The driver
//! calls it one tick at a time, waits between ticks, and honours cancellation
//! only between ticks so a tick's log entry and state always agree.

use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::config::SimConfig;
use super::step_log::StepLog;

/// Granularity of the interruptible inter-tick wait
const WAIT_SLICE: Duration = Duration::from_millis(50);

/// A controller that can be advanced one tick at a time
pub trait Simulation {
    type Record;

    /// Run one full tick and return the record it appended
    fn advance_tick(&mut self) -> &Self::Record;

    fn log(&self) -> &StepLog<Self::Record>;

    /// Halt the session without discarding state
    fn stop(&mut self) {}
}

/// Shared flag used to stop a running loop from outside
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// The underlying flag, for handlers that set it directly
    pub fn as_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

/// Continuous loop with a fixed delay between ticks
#[derive(Debug, Clone)]
pub struct TickDriver {
    delay: Duration,
    cancel: CancelToken,
}

impl TickDriver {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            cancel: CancelToken::new(),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(Duration::from_secs(config.tick_delay_secs))
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Advance `sim` until `max_ticks` is reached or the token is cancelled.
    ///
    /// `on_tick` sees every record as soon as its tick completes. The
    /// simulation is stopped on exit. Returns the number of ticks run.
    pub fn run<S, F>(&self, sim: &mut S, max_ticks: Option<u64>, mut on_tick: F) -> u64
    where
        S: Simulation,
        F: FnMut(&S::Record),
    {
        let limit_reached = |ticks: u64| max_ticks.is_some_and(|max| ticks >= max);
        let mut ticks = 0;

        while !self.cancel.is_cancelled() && !limit_reached(ticks) {
            let record = sim.advance_tick();
            on_tick(record);
            ticks += 1;

            if limit_reached(ticks) {
                break;
            }
            self.wait();
        }

        if self.cancel.is_cancelled() {
            info!("Simulation cancelled after {} ticks", ticks);
        }
        sim.stop();
        ticks
    }

    /// Sleep for the configured delay, returning early once cancelled
    fn wait(&self) {
        let deadline = Instant::now() + self.delay;
        loop {
            if self.cancel.is_cancelled() {
                debug!("Inter-tick wait interrupted");
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            std::thread::sleep(WAIT_SLICE.min(deadline - now));
        }
    }
}
