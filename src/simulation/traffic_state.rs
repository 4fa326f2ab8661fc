//! Traffic state model
//!
//! Holds per-location loads and per-entity assignments. Both collections keep
//! insertion order, which the rerouter and the deadlock detector rely on for
//! deterministic tie-breaking.

use log::warn;
use std::collections::HashMap;

use super::error::{SimError, SimResult};
use super::types::{EntityId, LocationId};

/// A location and its current load (vehicle count)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    pub load: u32,
}

/// Current loads and assignments for one session
#[derive(Debug, Clone, Default)]
pub struct TrafficState {
    locations: Vec<Location>,
    location_index: HashMap<LocationId, usize>,
    assignments: Vec<(EntityId, LocationId)>,
    entity_index: HashMap<EntityId, usize>,
}

impl TrafficState {
    /// Build a state from initial loads and assignments.
    ///
    /// Repeated identifiers behave like keys of an ordered map: the first
    /// occurrence fixes the position, the last one supplies the value.
    pub fn new(
        locations: impl IntoIterator<Item = (LocationId, u32)>,
        assignments: impl IntoIterator<Item = (EntityId, LocationId)>,
    ) -> SimResult<Self> {
        let mut state = Self::default();

        for (id, load) in locations {
            match state.location_index.get(&id) {
                Some(&index) => {
                    warn!("Duplicate location {} ignored (keeping first position)", id);
                    state.locations[index].load = load;
                }
                None => {
                    state.location_index.insert(id.clone(), state.locations.len());
                    state.locations.push(Location { id, load });
                }
            }
        }

        if state.locations.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "at least one location is required".to_string(),
            ));
        }

        for (entity, location) in assignments {
            if !state.location_index.contains_key(&location) {
                return Err(SimError::UnknownLocation(location));
            }
            match state.entity_index.get(&entity) {
                Some(&index) => {
                    warn!("Duplicate entity {} ignored (keeping first position)", entity);
                    state.assignments[index].1 = location;
                }
                None => {
                    state.entity_index.insert(entity.clone(), state.assignments.len());
                    state.assignments.push((entity, location));
                }
            }
        }

        if state.assignments.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "at least one entity is required".to_string(),
            ));
        }

        Ok(state)
    }

    /// Locations in insertion order
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn entity_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn load(&self, location: &LocationId) -> Option<u32> {
        self.location_index
            .get(location)
            .map(|&index| self.locations[index].load)
    }

    /// Replace one location's load
    pub fn set_load(&mut self, location: &LocationId, load: u32) -> SimResult<()> {
        let index = *self
            .location_index
            .get(location)
            .ok_or_else(|| SimError::UnknownLocation(location.clone()))?;
        self.locations[index].load = load;
        Ok(())
    }

    /// Rewrite every load in location order
    pub fn update_loads(&mut self, mut update: impl FnMut(&LocationId, u32) -> u32) {
        for location in &mut self.locations {
            location.load = update(&location.id, location.load);
        }
    }

    /// Entities and their locations in insertion order
    pub fn assignments(&self) -> impl Iterator<Item = (&EntityId, &LocationId)> + '_ {
        self.assignments.iter().map(|(entity, location)| (entity, location))
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityId> + '_ {
        self.assignments.iter().map(|(entity, _)| entity)
    }

    pub fn assignment(&self, entity: &EntityId) -> Option<&LocationId> {
        self.entity_index
            .get(entity)
            .map(|&index| &self.assignments[index].1)
    }

    /// Move one entity to another known location
    pub fn assign(&mut self, entity: &EntityId, location: LocationId) -> SimResult<()> {
        if !self.location_index.contains_key(&location) {
            return Err(SimError::UnknownLocation(location));
        }
        let index = *self
            .entity_index
            .get(entity)
            .ok_or_else(|| SimError::UnknownEntity(entity.clone()))?;
        self.assignments[index].1 = location;
        Ok(())
    }

    /// Owned copy of every load, in location order
    pub fn load_snapshot(&self) -> Vec<(LocationId, u32)> {
        self.locations
            .iter()
            .map(|location| (location.id.clone(), location.load))
            .collect()
    }

    /// Owned copy of every assignment, in entity order
    pub fn assignment_snapshot(&self) -> Vec<(EntityId, LocationId)> {
        self.assignments.clone()
    }
}
