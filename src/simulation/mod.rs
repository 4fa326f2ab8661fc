//! Intersection traffic control core
//!
//! This module contains the per-tick decision logic: congestion rerouting,
//! the duplicate-destination deadlock check and the fair signal scheduler.
//! It has no display or input dependencies; a driver calls `advance_tick`
//! and renders whatever the step log returns.

mod config;
mod deadlock;
mod driver;
mod entropy;
mod error;
mod rerouter;
mod routing;
mod scheduler;
mod step_log;
mod traffic_state;
mod types;

pub use config::{
    SimConfig, DEFAULT_CONGESTION_THRESHOLD, DEFAULT_INITIAL_QUEUE_MAX, DEFAULT_INITIAL_QUEUE_MIN,
    DEFAULT_MAX_GREEN_TIME, DEFAULT_MIN_GREEN_TIME, DEFAULT_NOISE_MAX, DEFAULT_NOISE_MIN,
    DEFAULT_STARVATION_BOUND, DEFAULT_THROUGHPUT_MAX, DEFAULT_THROUGHPUT_MIN,
    DEFAULT_TICK_DELAY_SECS, TICK_DELAY_RANGE,
};
pub use deadlock::{detect, DeadlockReport};
pub use driver::{CancelToken, Simulation, TickDriver};
pub use error::{SimError, SimResult};
pub use rerouter::{reroute, CongestionRerouter};
pub use routing::RoutingSimulation;
pub use scheduler::{FairScheduler, Selection};
pub use step_log::{RoutingRecord, SimEvent, StepLog, StepRecord};
pub use traffic_state::{Location, TrafficState};
pub use types::{Direction, EntityId, LocationId, SignalState};
