//! Core types for the intersection simulation
//!
//! Identifiers, compass directions and signal states shared by both
//! simulation modes.

use serde::Serialize;
use std::fmt;

/// Identifier of a location (an intersection in routing mode)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LocationId(pub String);

/// Identifier of an entity (a vehicle in routing mode)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl LocationId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EntityId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&str> for EntityId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A directional queue approaching the signalled intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Fixed enumeration order. Every tie-break in the scheduler scans in
    /// this order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Position of this direction in [`Direction::ALL`]
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    /// The non-conflicting partner that shares a green phase
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Signal state that gives this direction right-of-way
    pub fn group(self) -> SignalState {
        match self {
            Direction::North | Direction::South => SignalState::NorthSouth,
            Direction::East | Direction::West => SignalState::EastWest,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which direction group currently holds the green light.
///
/// `NorthSouth` and `EastWest` are mutually exclusive; holding the state in a
/// single enum makes "both groups green" unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SignalState {
    /// No group is active (before the first step, or after a stop)
    #[default]
    Inactive,
    NorthSouth,
    EastWest,
}

impl SignalState {
    pub fn is_active(self) -> bool {
        self != SignalState::Inactive
    }

    pub fn label(self) -> &'static str {
        match self {
            SignalState::Inactive => "None",
            SignalState::NorthSouth => "North-South",
            SignalState::EastWest => "East-West",
        }
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
