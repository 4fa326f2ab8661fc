//! Error taxonomy for the simulation core

use thiserror::Error;

use super::types::{EntityId, LocationId};

/// Errors reported by the simulation core.
///
/// None of these are fatal to a running session: they halt progress on the
/// affected entity only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Empty entity or location lists, a topology that cannot support
    /// rerouting, or out-of-range tuning parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Rerouting was requested but every other location is missing.
    #[error("no alternative location for {entity} blocked at {blocked}")]
    NoAlternativeLocation {
        entity: EntityId,
        blocked: LocationId,
    },

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("unknown location {0}")]
    UnknownLocation(LocationId),
}

pub type SimResult<T> = Result<T, SimError>;
