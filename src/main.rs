use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::io::{self, BufRead};
use std::time::Duration;

use intersection_sim::simulation::{
    CancelToken, Direction, EntityId, FairScheduler, LocationId, RoutingSimulation, SimConfig,
    Simulation, TickDriver, DEFAULT_CONGESTION_THRESHOLD, DEFAULT_STARVATION_BOUND,
    DEFAULT_THROUGHPUT_MAX, DEFAULT_THROUGHPUT_MIN, DEFAULT_TICK_DELAY_SECS,
};
use intersection_sim::stats::{RoutingStats, SignalStats};
use intersection_sim::view;

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Intersection traffic control simulation")]
struct Cli {
    /// Seed the random number generator for a reproducible run
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print the final step log as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reroute vehicles away from congested intersections and break deadlocks
    Route(RouteArgs),
    /// Alternate right-of-way at a four-way intersection without starvation
    Signal(SignalArgs),
}

#[derive(Args)]
struct RouteArgs {
    /// Vehicle names, comma separated
    #[arg(long, default_value = "V1,V2,V3")]
    vehicles: String,

    /// Intersection names, comma separated
    #[arg(long, default_value = "I1,I2,I3")]
    intersections: String,

    /// Seconds between ticks
    #[arg(long, default_value_t = DEFAULT_TICK_DELAY_SECS,
          value_parser = clap::value_parser!(u64).range(1..=10))]
    delay: u64,

    /// Stop after this many ticks (otherwise run until interrupted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Load above which an intersection is congested
    #[arg(long, default_value_t = DEFAULT_CONGESTION_THRESHOLD)]
    threshold: u32,
}

#[derive(Args)]
struct SignalArgs {
    /// Vehicles queued on the North side (random if omitted)
    #[arg(long)]
    north: Option<u32>,

    /// Vehicles queued on the South side (random if omitted)
    #[arg(long)]
    south: Option<u32>,

    /// Vehicles queued on the East side (random if omitted)
    #[arg(long)]
    east: Option<u32>,

    /// Vehicles queued on the West side (random if omitted)
    #[arg(long)]
    west: Option<u32>,

    /// Number of signal steps to run in batch mode
    #[arg(long, default_value_t = 10)]
    steps: u64,

    /// Read one command per line from stdin instead of running in batch
    #[arg(long)]
    interactive: bool,

    /// Rounds a direction may wait before it is forcibly served
    #[arg(long, default_value_t = DEFAULT_STARVATION_BOUND)]
    starvation_bound: u32,

    /// Fewest vehicles released per green phase
    #[arg(long, default_value_t = DEFAULT_THROUGHPUT_MIN)]
    min_move: u32,

    /// Most vehicles released per green phase
    #[arg(long, default_value_t = DEFAULT_THROUGHPUT_MAX)]
    max_move: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,intersection_sim=info"),
    )
    .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Route(ref args) => run_route(args, cli.seed, cli.json),
        Command::Signal(ref args) => run_signal(args, cli.seed, cli.json),
    }
}

/// Split a comma separated list, dropping blank entries
fn parse_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn run_route(args: &RouteArgs, seed: Option<u64>, json: bool) -> Result<()> {
    let config = SimConfig {
        congestion_threshold: args.threshold,
        tick_delay_secs: args.delay,
        ..SimConfig::default()
    };

    let vehicles: Vec<EntityId> = parse_names(&args.vehicles)
        .into_iter()
        .map(EntityId::new)
        .collect();
    let intersections: Vec<LocationId> = parse_names(&args.intersections)
        .into_iter()
        .map(LocationId::new)
        .collect();

    let mut sim = RoutingSimulation::from_names(config, &vehicles, &intersections, seed)
        .context("Could not start routing simulation")?;

    println!("Initial state:");
    print!("{}", view::traffic_flow(sim.state()));
    println!();

    let driver = TickDriver::from_config(sim.config());
    watch_interrupts(&driver.cancel_token()).context("Failed to install signal handler")?;
    info!("Ticking every {}s, press Ctrl-C to stop", driver.delay().as_secs());
    driver.run(&mut sim, args.ticks, |record| {
        print!("{}", view::routing_tick(record));
        println!();
    });

    RoutingStats::from_log(sim.log()).log_summary();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(sim.log()).context("Failed to serialize step log")?
        );
    }
    Ok(())
}

/// First SIGINT/SIGTERM cancels between ticks, a second one exits at once
#[cfg(unix)]
fn watch_interrupts(cancel: &CancelToken) -> io::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::flag;

    let stop = cancel.as_flag();
    for signal in [SIGINT, SIGTERM] {
        flag::register_conditional_shutdown(signal, 1, stop.clone())?;
        flag::register(signal, stop.clone())?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn watch_interrupts(_cancel: &CancelToken) -> io::Result<()> {
    Ok(())
}

fn run_signal(args: &SignalArgs, seed: Option<u64>, json: bool) -> Result<()> {
    let config = SimConfig {
        starvation_bound: args.starvation_bound,
        throughput_min: args.min_move,
        throughput_max: args.max_move,
        ..SimConfig::default()
    };

    let mut scheduler = FairScheduler::with_random_loads(config, seed)
        .context("Could not start signal scheduler")?;
    let supplied = [args.north, args.south, args.east, args.west];
    for (direction, load) in Direction::ALL.into_iter().zip(supplied) {
        if let Some(load) = load {
            scheduler.set_load(direction, load);
        }
    }

    print!("{}", view::traffic_counts(&scheduler));
    println!();

    if args.interactive {
        run_interactive(&mut scheduler)?;
    } else {
        TickDriver::new(Duration::ZERO).run(&mut scheduler, Some(args.steps), |record| {
            println!("{}", view::green_light(record));
        });
        println!("Simulation stopped.");
    }

    println!();
    print!("{}", view::traffic_counts(&scheduler));
    println!();
    if !scheduler.log().is_empty() {
        print!("{}", view::step_table(scheduler.log()));
    }

    SignalStats::from_log(scheduler.log()).log_summary();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(scheduler.log())
                .context("Failed to serialize step log")?
        );
    }
    Ok(())
}

fn run_interactive(scheduler: &mut FairScheduler) -> Result<()> {
    println!("Commands: [enter]/n = next step, s = stop, q = quit");
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read command")?;
        match line.trim() {
            "" | "n" | "next" => {
                let record = scheduler.advance();
                println!("{}", view::green_light(record));
                print!("{}", view::traffic_counts(scheduler));
            }
            "s" | "stop" => {
                scheduler.halt();
                println!("Simulation stopped.");
            }
            "q" | "quit" => break,
            other => warn!("Unknown command '{}'", other),
        }
    }
    Ok(())
}
