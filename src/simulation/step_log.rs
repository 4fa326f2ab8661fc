//! Append-only record of each tick's decision and resulting state

use serde::Serialize;
use std::fmt;

use super::types::{Direction, EntityId, LocationId, SignalState};

/// Ordered log that only ever grows.
///
/// Records are handed out by shared reference only, so an entry cannot be
/// changed after it has been pushed.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct StepLog<R> {
    records: Vec<R>,
}

impl<R> Default for StepLog<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R> StepLog<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return a reference to it
    pub fn push(&mut self, record: R) -> &R {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&R> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a, R> IntoIterator for &'a StepLog<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// One scheduling-mode tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: u64,
    pub signal_state: SignalState,
    pub direction: Direction,
    pub moved: u32,
    /// True when the starvation override picked `direction`
    pub forced: bool,
    /// Post-update queue lengths in [`Direction::ALL`] order
    pub loads: [u32; 4],
    /// Post-update wait counters in [`Direction::ALL`] order
    pub wait_counters: [u32; 4],
}

impl StepRecord {
    pub fn load(&self, direction: Direction) -> u32 {
        self.loads[direction.index()]
    }

    pub fn wait_counter(&self, direction: Direction) -> u32 {
        self.wait_counters[direction.index()]
    }
}

/// Notices surfaced to the observer during a routing tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    Congestion {
        entity: EntityId,
        location: LocationId,
        load: u32,
    },
    Rerouted {
        entity: EntityId,
        from: LocationId,
        to: LocationId,
    },
    RerouteFailed {
        entity: EntityId,
        location: LocationId,
        reason: String,
    },
    Deadlock {
        entity: EntityId,
        location: LocationId,
    },
    NoDeadlock,
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::Congestion {
                entity, location, ..
            } => write!(f, "Congestion detected at {location} for {entity}."),
            SimEvent::Rerouted { entity, from, to } => {
                write!(f, "Rerouting {entity} from {from} to {to}")
            }
            SimEvent::RerouteFailed {
                entity,
                location,
                reason,
            } => write!(f, "Could not reroute {entity} away from {location}: {reason}"),
            SimEvent::Deadlock { entity, .. } => {
                write!(f, "Deadlock Detected! Vehicle {entity} is part of a deadlock.")
            }
            SimEvent::NoDeadlock => f.write_str("No Deadlocks Detected"),
        }
    }
}

/// One routing-mode tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingRecord {
    pub step: u64,
    pub events: Vec<SimEvent>,
    /// Entity flagged by the deadlock detector this tick
    pub deadlocked: Option<EntityId>,
    /// Assignments after all reroutes of this tick
    pub assignments: Vec<(EntityId, LocationId)>,
    /// Loads the tick's decisions were based on
    pub loads: Vec<(LocationId, u32)>,
}

impl RoutingRecord {
    pub fn reroutes(&self) -> impl Iterator<Item = &SimEvent> + '_ {
        self.events
            .iter()
            .filter(|event| matches!(event, SimEvent::Rerouted { .. }))
    }
}
