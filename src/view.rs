//! Plain-text views of the simulation state
//!
//! Everything here returns a `String` so the binary decides where it goes.

use std::fmt::Write;

use crate::simulation::{Direction, FairScheduler, RoutingRecord, StepLog, StepRecord, TrafficState};

const TABLE_HEADERS: [&str; 8] = [
    "Step",
    "Signal State",
    "Direction Allowed",
    "Vehicles Moved",
    "North Traffic",
    "South Traffic",
    "East Traffic",
    "West Traffic",
];

/// Vehicle-to-intersection assignments with each intersection's volume
pub fn traffic_flow(state: &TrafficState) -> String {
    let mut out = String::from("### Current Traffic Flow and Traffic Volumes\n");
    for (vehicle, intersection) in state.assignments() {
        let volume = state.load(intersection).unwrap_or(0);
        let _ = writeln!(
            out,
            "Vehicle {vehicle} is heading towards Intersection {intersection} (Traffic Volume: {volume})"
        );
    }
    out
}

/// Notices raised during one routing tick followed by the resulting flow
pub fn routing_tick(record: &RoutingRecord) -> String {
    let mut out = format!("--- Tick {} ---\n", record.step);
    for event in &record.events {
        let _ = writeln!(out, "{event}");
    }
    for (vehicle, intersection) in &record.assignments {
        let volume = record
            .loads
            .iter()
            .find(|(id, _)| id == intersection)
            .map_or(0, |(_, load)| *load);
        let _ = writeln!(
            out,
            "Vehicle {vehicle} is heading towards Intersection {intersection} (Traffic Volume: {volume})"
        );
    }
    out
}

/// Current queue length per direction
pub fn traffic_counts(scheduler: &FairScheduler) -> String {
    let mut out = String::from("### Current Traffic Counts\n");
    for direction in Direction::ALL {
        let _ = writeln!(out, "{}: {} vehicles", direction, scheduler.load(direction));
    }
    let _ = writeln!(out, "Signal: {}", scheduler.signal_state());
    out
}

pub fn green_light(record: &StepRecord) -> String {
    format!(
        "Green Light: {} (Moved {} vehicles)",
        record.direction, record.moved
    )
}

/// The process log as a fixed-width table
pub fn step_table(log: &StepLog<StepRecord>) -> String {
    let rows: Vec<[String; 8]> = log
        .iter()
        .map(|record| {
            [
                record.step.to_string(),
                record.signal_state.to_string(),
                record.direction.to_string(),
                record.moved.to_string(),
                record.load(Direction::North).to_string(),
                record.load(Direction::South).to_string(),
                record.load(Direction::East).to_string(),
                record.load(Direction::West).to_string(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::from("### Process Log\n");
    push_row(&mut out, &TABLE_HEADERS, &widths);
    let rule: Vec<String> = widths.iter().map(|&width| "-".repeat(width)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize; 8]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell.as_ref()))
        .collect();
    let _ = writeln!(out, "| {} |", line.join(" | "));
}
