//! Tunable parameters for both simulation modes
//!
//! The defaults reproduce the reference behaviour of the signal controller
//! and the congestion router.

use std::ops::RangeInclusive;

use super::error::{SimError, SimResult};

/// Load above which a location counts as congested
pub const DEFAULT_CONGESTION_THRESHOLD: u32 = 3;

/// Vehicles released per green phase, drawn uniformly from this range
pub const DEFAULT_THROUGHPUT_MIN: u32 = 2;
pub const DEFAULT_THROUGHPUT_MAX: u32 = 5;

/// Rounds a direction may wait before it is forcibly served
pub const DEFAULT_STARVATION_BOUND: u32 = 3;

/// Green-phase dwell bounds in seconds. Declared but not enforced.
pub const DEFAULT_MIN_GREEN_TIME: u32 = 5;
pub const DEFAULT_MAX_GREEN_TIME: u32 = 15;

/// Seconds between ticks in the continuous loop
pub const DEFAULT_TICK_DELAY_SECS: u64 = 3;
pub const TICK_DELAY_RANGE: RangeInclusive<u64> = 1..=10;

/// Range used to seed and re-draw intersection volumes in routing mode
pub const DEFAULT_NOISE_MIN: u32 = 1;
pub const DEFAULT_NOISE_MAX: u32 = 5;

/// Range used for random initial queue lengths in scheduling mode
pub const DEFAULT_INITIAL_QUEUE_MIN: u32 = 1;
pub const DEFAULT_INITIAL_QUEUE_MAX: u32 = 10;

/// Configuration shared by the routing and scheduling controllers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Reroute when a location's load is strictly greater than this
    pub congestion_threshold: u32,
    pub throughput_min: u32,
    pub throughput_max: u32,
    pub starvation_bound: u32,
    /// Inert: the scheduler may switch away from a group on the very next
    /// tick regardless of how long it has been green.
    pub min_green_time: u32,
    /// Inert, see `min_green_time`.
    pub max_green_time: u32,
    pub tick_delay_secs: u64,
    pub noise_min: u32,
    pub noise_max: u32,
    pub initial_queue_min: u32,
    pub initial_queue_max: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            congestion_threshold: DEFAULT_CONGESTION_THRESHOLD,
            throughput_min: DEFAULT_THROUGHPUT_MIN,
            throughput_max: DEFAULT_THROUGHPUT_MAX,
            starvation_bound: DEFAULT_STARVATION_BOUND,
            min_green_time: DEFAULT_MIN_GREEN_TIME,
            max_green_time: DEFAULT_MAX_GREEN_TIME,
            tick_delay_secs: DEFAULT_TICK_DELAY_SECS,
            noise_min: DEFAULT_NOISE_MIN,
            noise_max: DEFAULT_NOISE_MAX,
            initial_queue_min: DEFAULT_INITIAL_QUEUE_MIN,
            initial_queue_max: DEFAULT_INITIAL_QUEUE_MAX,
        }
    }
}

impl SimConfig {
    pub fn throughput_range(&self) -> RangeInclusive<u32> {
        self.throughput_min..=self.throughput_max
    }

    pub fn noise_range(&self) -> RangeInclusive<u32> {
        self.noise_min..=self.noise_max
    }

    pub fn initial_queue_range(&self) -> RangeInclusive<u32> {
        self.initial_queue_min..=self.initial_queue_max
    }

    /// Check that every range is non-empty and the delay is within bounds
    pub fn validate(&self) -> SimResult<()> {
        check_range("throughput", self.throughput_min, self.throughput_max)?;
        check_range("noise", self.noise_min, self.noise_max)?;
        check_range(
            "initial queue",
            self.initial_queue_min,
            self.initial_queue_max,
        )?;
        check_range("green time", self.min_green_time, self.max_green_time)?;

        if self.starvation_bound == 0 {
            return Err(SimError::InvalidConfiguration(
                "starvation bound must be at least 1 round".to_string(),
            ));
        }

        if !TICK_DELAY_RANGE.contains(&self.tick_delay_secs) {
            return Err(SimError::InvalidConfiguration(format!(
                "tick delay {}s is outside {}..={}s",
                self.tick_delay_secs,
                TICK_DELAY_RANGE.start(),
                TICK_DELAY_RANGE.end()
            )));
        }

        Ok(())
    }
}

fn check_range(what: &str, min: u32, max: u32) -> SimResult<()> {
    if min > max {
        return Err(SimError::InvalidConfiguration(format!(
            "{what} range is empty: min {min} > max {max}"
        )));
    }
    Ok(())
}
