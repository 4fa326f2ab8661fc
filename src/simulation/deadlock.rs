//! Duplicate-destination deadlock check
//!
//! This is not a wait-for graph analysis. It scans assignments in order,
//! remembers every location already claimed, and flags the first entity whose
//! location was claimed by an earlier entity. Two entities sharing a
//! destination is treated as a circular wait; nothing else is detected.
//! The result depends on iteration order and is stable for a given order.

use std::collections::HashSet;

use super::types::{EntityId, LocationId};

/// Outcome of one detector pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlockReport {
    pub detected: bool,
    /// The flagged entity and the location it shares
    pub entity: Option<(EntityId, LocationId)>,
}

impl DeadlockReport {
    fn clear() -> Self {
        Self {
            detected: false,
            entity: None,
        }
    }

    pub fn entity(&self) -> Option<&EntityId> {
        self.entity.as_ref().map(|(entity, _)| entity)
    }
}

/// Scan `(entity, location)` pairs in order and flag the first repeat
/// destination.
pub fn detect<'a, I>(assignments: I) -> DeadlockReport
where
    I: IntoIterator<Item = (&'a EntityId, &'a LocationId)>,
{
    let mut seen: HashSet<&LocationId> = HashSet::new();
    for (entity, location) in assignments {
        if !seen.insert(location) {
            return DeadlockReport {
                detected: true,
                entity: Some((entity.clone(), location.clone())),
            };
        }
    }
    DeadlockReport::clear()
}
