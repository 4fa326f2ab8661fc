//! Session statistics derived from a step log

use log::info;

use crate::simulation::{Direction, RoutingRecord, SimEvent, StepLog, StepRecord};

/// Summary of a scheduling-mode session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalStats {
    pub steps: u64,
    pub total_moved: u64,
    /// Green phases per direction in [`Direction::ALL`] order
    pub served: [u64; 4],
    pub forced_steps: u64,
    /// Largest wait counter seen after any step
    pub max_wait: u32,
    /// Queue lengths after the last step
    pub remaining: [u32; 4],
}

impl SignalStats {
    pub fn from_log(log: &StepLog<StepRecord>) -> Self {
        let mut stats = Self::default();
        for record in log {
            stats.steps += 1;
            stats.total_moved += u64::from(record.moved);
            stats.served[record.direction.index()] += 1;
            if record.forced {
                stats.forced_steps += 1;
            }
            let worst = record.wait_counters.iter().copied().max().unwrap_or(0);
            stats.max_wait = stats.max_wait.max(worst);
            stats.remaining = record.loads;
        }
        stats
    }

    pub fn remaining_total(&self) -> u64 {
        self.remaining.iter().map(|&load| u64::from(load)).sum()
    }

    /// Emit the end-of-run banner
    pub fn log_summary(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Steps run: {}", self.steps);
        info!("Vehicles moved: {}", self.total_moved);
        for direction in Direction::ALL {
            info!(
                "{} served: {} (remaining {})",
                direction,
                self.served[direction.index()],
                self.remaining[direction.index()]
            );
        }
        info!("Starvation overrides: {}", self.forced_steps);
        info!("Longest wait: {} rounds", self.max_wait);
    }
}

/// Summary of a routing-mode session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingStats {
    pub ticks: u64,
    pub congestion_events: u64,
    pub reroutes: u64,
    pub failed_reroutes: u64,
    pub deadlocks: u64,
}

impl RoutingStats {
    pub fn from_log(log: &StepLog<RoutingRecord>) -> Self {
        let mut stats = Self::default();
        for record in log {
            stats.ticks += 1;
            for event in &record.events {
                match event {
                    SimEvent::Congestion { .. } => stats.congestion_events += 1,
                    SimEvent::Rerouted { .. } => stats.reroutes += 1,
                    SimEvent::RerouteFailed { .. } => stats.failed_reroutes += 1,
                    SimEvent::Deadlock { .. } => stats.deadlocks += 1,
                    SimEvent::NoDeadlock => {}
                }
            }
        }
        stats
    }

    pub fn log_summary(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Ticks run: {}", self.ticks);
        info!("Congestion events: {}", self.congestion_events);
        info!("Reroutes: {}", self.reroutes);
        info!("Failed reroutes: {}", self.failed_reroutes);
        info!("Deadlocks detected: {}", self.deadlocks);
    }
}
