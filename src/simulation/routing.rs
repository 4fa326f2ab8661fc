//! Routing-mode controller
//!
//! Each tick reroutes vehicles away from congested intersections, runs the
//! duplicate-destination deadlock check, records the outcome and then lets
//! intersection volumes drift randomly.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::SimConfig;
use super::deadlock;
use super::driver::Simulation;
use super::entropy;
use super::error::{SimError, SimResult};
use super::rerouter::{self, CongestionRerouter};
use super::step_log::{RoutingRecord, SimEvent, StepLog};
use super::traffic_state::TrafficState;
use super::types::{EntityId, LocationId};

/// Vehicles routed across a set of intersections
#[derive(Debug, Clone)]
pub struct RoutingSimulation {
    config: SimConfig,
    rerouter: CongestionRerouter,
    state: TrafficState,
    step: u64,
    log: StepLog<RoutingRecord>,
    /// Optional seeded RNG for reproducible sessions
    rng: Option<StdRng>,
}

impl RoutingSimulation {
    fn new_internal(
        config: SimConfig,
        state: TrafficState,
        rng: Option<StdRng>,
    ) -> SimResult<Self> {
        config.validate()?;
        if state.location_count() < 2 {
            return Err(SimError::InvalidConfiguration(
                "rerouting needs at least two intersections".to_string(),
            ));
        }
        Ok(Self {
            rerouter: CongestionRerouter::new(config.congestion_threshold),
            config,
            state,
            step: 0,
            log: StepLog::new(),
            rng,
        })
    }

    /// Wrap an explicit initial state
    pub fn new(config: SimConfig, state: TrafficState) -> SimResult<Self> {
        Self::new_internal(config, state, None)
    }

    /// Same as [`RoutingSimulation::new`] but with a seeded RNG
    pub fn new_with_seed(config: SimConfig, state: TrafficState, seed: u64) -> SimResult<Self> {
        Self::new_internal(config, state, Some(StdRng::seed_from_u64(seed)))
    }

    /// Build a session from bare names: every intersection gets a random
    /// volume from the noise range and every vehicle a random intersection.
    pub fn from_names(
        config: SimConfig,
        vehicles: &[EntityId],
        intersections: &[LocationId],
        seed: Option<u64>,
    ) -> SimResult<Self> {
        config.validate()?;
        if vehicles.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "no vehicles supplied".to_string(),
            ));
        }
        if intersections.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "no intersections supplied".to_string(),
            ));
        }

        let mut rng = seed.map(StdRng::seed_from_u64);
        let loads: Vec<(LocationId, u32)> = intersections
            .iter()
            .map(|id| (id.clone(), entropy::draw(&mut rng, config.noise_range())))
            .collect();

        let mut assignments = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles {
            let location = entropy::choose(&mut rng, intersections).ok_or_else(|| {
                SimError::InvalidConfiguration("no intersections supplied".to_string())
            })?;
            assignments.push((vehicle.clone(), location.clone()));
        }

        let state = TrafficState::new(loads, assignments)?;
        Self::new_internal(config, state, rng)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &TrafficState {
        &self.state
    }

    /// Mutable access for seeding scenarios between ticks
    pub fn state_mut(&mut self) -> &mut TrafficState {
        &mut self.state
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn records(&self) -> &StepLog<RoutingRecord> {
        &self.log
    }

    /// Run one routing tick
    pub fn advance(&mut self) -> &RoutingRecord {
        self.step += 1;
        let loads = self.state.load_snapshot();
        let mut events = Vec::new();

        let entities: Vec<EntityId> = self.state.entities().cloned().collect();
        for entity in &entities {
            match self.rerouter.congested_at(&self.state, entity) {
                Ok(Some((location, load))) => {
                    events.push(SimEvent::Congestion {
                        entity: entity.clone(),
                        location: location.clone(),
                        load,
                    });
                    self.reroute_and_record(entity, &location, &mut events);
                }
                Ok(None) => {}
                // Entities come from the state, so this only fires on a corrupted state
                Err(err) => warn!("Skipping {}: {}", entity, err),
            }
        }

        let report = deadlock::detect(self.state.assignments());
        let deadlocked = match report.entity {
            Some((entity, location)) => {
                warn!("Deadlock Detected! Vehicle {} is part of a deadlock.", entity);
                events.push(SimEvent::Deadlock {
                    entity: entity.clone(),
                    location: location.clone(),
                });
                self.reroute_and_record(&entity, &location, &mut events);
                Some(entity)
            }
            None => {
                info!("No Deadlocks Detected");
                events.push(SimEvent::NoDeadlock);
                None
            }
        };

        let record = RoutingRecord {
            step: self.step,
            events,
            deadlocked,
            assignments: self.state.assignment_snapshot(),
            loads,
        };

        self.apply_noise();
        self.log.push(record)
    }

    fn reroute_and_record(
        &mut self,
        entity: &EntityId,
        blocked: &LocationId,
        events: &mut Vec<SimEvent>,
    ) {
        match rerouter::reroute(&mut self.state, entity, blocked) {
            Ok(to) => events.push(SimEvent::Rerouted {
                entity: entity.clone(),
                from: blocked.clone(),
                to,
            }),
            // Only reachable with a single intersection; the entity stays put
            Err(err) => {
                warn!("{}", err);
                events.push(SimEvent::RerouteFailed {
                    entity: entity.clone(),
                    location: blocked.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Redraw every intersection volume from the noise range
    fn apply_noise(&mut self) {
        let range = self.config.noise_range();
        let rng = &mut self.rng;
        self.state.update_loads(|_, _| entropy::draw(rng, range.clone()));
    }
}

impl Simulation for RoutingSimulation {
    type Record = RoutingRecord;

    fn advance_tick(&mut self) -> &RoutingRecord {
        self.advance()
    }

    fn log(&self) -> &StepLog<RoutingRecord> {
        &self.log
    }
}
