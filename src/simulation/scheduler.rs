//! Fairness-constrained signal scheduler
//!
//! Each tick gives right-of-way to the busiest directional queue, unless some
//! direction has waited `starvation_bound` rounds, in which case the first
//! such direction (in [`Direction::ALL`] order) is served instead. The served
//! direction and its opposite share the green phase.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::SimConfig;
use super::driver::Simulation;
use super::entropy;
use super::error::SimResult;
use super::step_log::{StepLog, StepRecord};
use super::types::{Direction, SignalState};

/// Which direction the scheduler would serve next, and why
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub direction: Direction,
    /// Chosen by the starvation override rather than by load
    pub forced: bool,
}

/// Signal controller for a single four-way intersection
#[derive(Debug, Clone)]
pub struct FairScheduler {
    config: SimConfig,
    loads: [u32; 4],
    wait_counters: [u32; 4],
    signal: SignalState,
    step: u64,
    log: StepLog<StepRecord>,
    /// Optional seeded RNG for reproducible sessions
    rng: Option<StdRng>,
}

impl FairScheduler {
    fn new_internal(config: SimConfig, loads: [u32; 4], rng: Option<StdRng>) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            loads,
            wait_counters: [0; 4],
            signal: SignalState::Inactive,
            step: 0,
            log: StepLog::new(),
            rng,
        })
    }

    /// Create a scheduler with user-supplied queue lengths in
    /// [`Direction::ALL`] order
    pub fn new(config: SimConfig, loads: [u32; 4]) -> SimResult<Self> {
        Self::new_internal(config, loads, None)
    }

    /// Same as [`FairScheduler::new`] but with a seeded RNG
    pub fn new_with_seed(config: SimConfig, loads: [u32; 4], seed: u64) -> SimResult<Self> {
        Self::new_internal(config, loads, Some(StdRng::seed_from_u64(seed)))
    }

    /// Create a scheduler whose queue lengths are drawn from the configured
    /// initial range
    pub fn with_random_loads(config: SimConfig, seed: Option<u64>) -> SimResult<Self> {
        let mut scheduler = Self::new_internal(config, [0; 4], seed.map(StdRng::seed_from_u64))?;
        let range = scheduler.config.initial_queue_range();
        for direction in Direction::ALL {
            scheduler.loads[direction.index()] = entropy::draw(&mut scheduler.rng, range.clone());
        }
        Ok(scheduler)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn load(&self, direction: Direction) -> u32 {
        self.loads[direction.index()]
    }

    pub fn loads(&self) -> [u32; 4] {
        self.loads
    }

    pub fn set_load(&mut self, direction: Direction, load: u32) {
        self.loads[direction.index()] = load;
    }

    pub fn wait_counter(&self, direction: Direction) -> u32 {
        self.wait_counters[direction.index()]
    }

    pub fn wait_counters(&self) -> [u32; 4] {
        self.wait_counters
    }

    pub fn set_wait_counter(&mut self, direction: Direction, rounds: u32) {
        self.wait_counters[direction.index()] = rounds;
    }

    pub fn signal_state(&self) -> SignalState {
        self.signal
    }

    /// Index of the last completed tick (0 before the first)
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn records(&self) -> &StepLog<StepRecord> {
        &self.log
    }

    /// Choose the direction to serve on the next tick without mutating state
    pub fn select_next(&self) -> Selection {
        let bound = self.config.starvation_bound;
        if let Some(direction) = Direction::ALL
            .into_iter()
            .find(|direction| self.wait_counters[direction.index()] >= bound)
        {
            return Selection {
                direction,
                forced: true,
            };
        }

        // Strict comparison keeps the earliest direction on ties
        let mut busiest = Direction::ALL[0];
        for direction in Direction::ALL {
            if self.loads[direction.index()] > self.loads[busiest.index()] {
                busiest = direction;
            }
        }
        Selection {
            direction: busiest,
            forced: false,
        }
    }

    /// Serve one direction and log the result
    pub fn advance(&mut self) -> &StepRecord {
        self.step += 1;

        let Selection { direction, forced } = self.select_next();
        if forced {
            info!(
                "{} waited {} rounds, forcing priority",
                direction,
                self.wait_counter(direction)
            );
        }

        self.signal = direction.group();

        let partner = direction.opposite();
        for other in Direction::ALL {
            let counter = &mut self.wait_counters[other.index()];
            if other == direction || other == partner {
                *counter = 0;
            } else {
                *counter = counter.saturating_add(1);
            }
        }

        let draw = entropy::draw(&mut self.rng, self.config.throughput_range());
        let queue = &mut self.loads[direction.index()];
        let moved = draw.min(*queue);
        *queue -= moved;

        debug!(
            "Step {}: {} green, {} moved {} vehicles",
            self.step, self.signal, direction, moved
        );

        self.log.push(StepRecord {
            step: self.step,
            signal_state: self.signal,
            direction,
            moved,
            forced,
            loads: self.loads,
            wait_counters: self.wait_counters,
        })
    }

    /// Turn the signal off. Queues, wait counters and the log are kept.
    pub fn halt(&mut self) {
        self.signal = SignalState::Inactive;
        info!("Simulation stopped at step {}", self.step);
    }
}

impl Simulation for FairScheduler {
    type Record = StepRecord;

    fn advance_tick(&mut self) -> &StepRecord {
        self.advance()
    }

    fn log(&self) -> &StepLog<StepRecord> {
        &self.log
    }

    fn stop(&mut self) {
        self.halt();
    }
}
