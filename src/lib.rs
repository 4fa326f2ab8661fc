//! Intersection Traffic Control Library
//!
//! A discrete-time simulation of congestion rerouting, duplicate-destination
//! deadlock detection and a starvation-bounded signal scheduler.

pub mod simulation;
pub mod stats;
pub mod view;
