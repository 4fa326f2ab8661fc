//! Text views and session statistics

use intersection_sim::simulation::{
    Direction, EntityId, FairScheduler, LocationId, RoutingRecord, SimConfig, SimEvent,
    Simulation, StepLog,
};
use intersection_sim::stats::{RoutingStats, SignalStats};
use intersection_sim::view;

fn scheduler() -> FairScheduler {
    let config = SimConfig {
        throughput_min: 3,
        throughput_max: 3,
        ..SimConfig::default()
    };
    FairScheduler::new(config, [8, 1, 1, 1]).unwrap()
}

#[test]
fn test_step_table_has_one_row_per_step() {
    let mut scheduler = scheduler();
    scheduler.advance();
    scheduler.advance();

    let table = view::step_table(scheduler.log());
    let lines: Vec<&str> = table.lines().collect();
    // Title, header, rule, then two rows
    assert_eq!(lines.len(), 5);
    assert!(lines[1].contains("Direction Allowed"));
    assert!(lines[3].starts_with("| 1 "));
    assert!(lines[3].contains("North-South"));
    assert!(lines[4].starts_with("| 2 "));
    assert_eq!(scheduler.log().last().map(|record| record.step), Some(2));
}

#[test]
fn test_green_light_and_counts() {
    let mut scheduler = scheduler();
    let line = view::green_light(scheduler.advance());
    assert_eq!(line, "Green Light: North (Moved 3 vehicles)");

    let counts = view::traffic_counts(&scheduler);
    assert!(counts.contains("North: 5 vehicles"));
    assert!(counts.contains("Signal: North-South"));
}

#[test]
fn test_signal_stats_totals() {
    let mut scheduler = scheduler();
    for _ in 0..4 {
        scheduler.advance();
    }

    // North three times (8 -> 5 -> 2 -> 0), then East is forced at the bound
    let stats = SignalStats::from_log(scheduler.log());
    assert_eq!(stats.steps, 4);
    assert_eq!(stats.served[Direction::North.index()], 3);
    assert_eq!(stats.served[Direction::East.index()], 1);
    assert_eq!(stats.forced_steps, 1);
    assert_eq!(stats.max_wait, 3);
    assert_eq!(stats.total_moved, 3 + 3 + 2 + 1);
    assert_eq!(stats.remaining, [0, 1, 0, 1]);
    assert_eq!(stats.remaining_total(), 2);
}

#[test]
fn test_failed_reroute_is_reported_and_counted() {
    let (v1, i1, i2) = (EntityId::new("V1"), LocationId::new("I1"), LocationId::new("I2"));
    let mut log = StepLog::new();
    log.push(RoutingRecord {
        step: 1,
        events: vec![
            SimEvent::Congestion {
                entity: v1.clone(),
                location: i1.clone(),
                load: 9,
            },
            SimEvent::RerouteFailed {
                entity: v1.clone(),
                location: i1.clone(),
                reason: "no alternative intersection".to_string(),
            },
            SimEvent::NoDeadlock,
        ],
        deadlocked: None,
        assignments: vec![(v1.clone(), i1.clone())],
        loads: vec![(i1, 9), (i2, 0)],
    });

    let record = log.last().unwrap();
    assert_eq!(record.reroutes().count(), 0);
    let tick = view::routing_tick(record);
    assert!(tick.contains("Could not reroute V1 away from I1: no alternative intersection"));
    assert!(tick.contains("Vehicle V1 is heading towards Intersection I1 (Traffic Volume: 9)"));

    let stats = RoutingStats::from_log(&log);
    assert_eq!(stats.ticks, 1);
    assert_eq!(stats.congestion_events, 1);
    assert_eq!(stats.failed_reroutes, 1);
    assert_eq!(stats.reroutes, 0);
    assert_eq!(stats.deadlocks, 0);
}
