//! Congestion-based rerouting
//!
//! Moves an entity away from a blocked location to the least loaded
//! alternative.

use log::info;

use super::error::{SimError, SimResult};
use super::traffic_state::TrafficState;
use super::types::{EntityId, LocationId};

/// Decides when a location is congested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CongestionRerouter {
    pub threshold: u32,
}

impl CongestionRerouter {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// A location is congested when its load is strictly above the threshold
    pub fn is_congested(&self, load: u32) -> bool {
        load > self.threshold
    }

    /// The entity's current location and its load, if that load is over the
    /// threshold
    pub fn congested_at(
        &self,
        state: &TrafficState,
        entity: &EntityId,
    ) -> SimResult<Option<(LocationId, u32)>> {
        let current = state
            .assignment(entity)
            .ok_or_else(|| SimError::UnknownEntity(entity.clone()))?;
        let load = state
            .load(current)
            .ok_or_else(|| SimError::UnknownLocation(current.clone()))?;

        if self.is_congested(load) {
            info!("Congestion detected at {} for {}.", current, entity);
            Ok(Some((current.clone(), load)))
        } else {
            Ok(None)
        }
    }
}

/// Pick the least loaded location other than `blocked` and assign `entity`
/// to it.
///
/// Candidates are scanned in the state's location insertion order and the
/// first minimum wins, so ties always resolve to the earliest location.
pub fn reroute(
    state: &mut TrafficState,
    entity: &EntityId,
    blocked: &LocationId,
) -> SimResult<LocationId> {
    let target = state
        .locations()
        .iter()
        .filter(|location| &location.id != blocked)
        .min_by_key(|location| location.load)
        .map(|location| location.id.clone())
        .ok_or_else(|| SimError::NoAlternativeLocation {
            entity: entity.clone(),
            blocked: blocked.clone(),
        })?;

    state.assign(entity, target.clone())?;
    info!("Rerouting {} from {} to {}", entity, blocked, target);
    Ok(target)
}
