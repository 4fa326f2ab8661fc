use std::process::{Command, Output};

fn run_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_intersection_sim"))
        .args(args)
        .env("RUST_LOG", "warn,intersection_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the signal scheduler runs in batch mode and reports completion
#[test]
fn test_signal_batch_runs() {
    let output = run_sim(&["signal", "--steps", "5", "--seed", "7"]);

    assert!(
        output.status.success(),
        "Signal simulation failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
    assert!(stderr.contains("Steps run: 5"), "Missing step count");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("### Process Log"), "Missing process log table");
    assert_eq!(stdout.matches("Green Light:").count(), 5);
}

/// Test that the busiest queue gets the first green light
#[test]
fn test_signal_serves_busiest_first() {
    let output = run_sim(&[
        "signal", "--steps", "1", "--north", "8", "--south", "1", "--east", "1", "--west", "1",
    ]);
    assert!(output.status.success(), "Signal simulation failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Green Light: North"),
        "North should be served first. stdout: {}",
        stdout
    );
}

/// Test that the step log can be exported as JSON
#[test]
fn test_signal_json_log() {
    let output = run_sim(&[
        "--json", "signal", "--steps", "2", "--north", "8", "--south", "1", "--east", "1",
        "--west", "1", "--seed", "1",
    ]);
    assert!(output.status.success(), "Signal simulation failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json_start = stdout.find('[').expect("Missing JSON log");
    let log: serde_json::Value =
        serde_json::from_str(&stdout[json_start..]).expect("Log is not valid JSON");
    let records = log.as_array().expect("Log is not an array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["direction"], "North");
    assert_eq!(records[0]["step"], 1);
}

/// Test that a single routing tick completes and reports statistics
#[test]
fn test_route_single_tick() {
    let output = run_sim(&["route", "--ticks", "1", "--seed", "3"]);
    assert!(
        output.status.success(),
        "Routing simulation failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SIMULATION COMPLETE"));
    assert!(stderr.contains("Ticks run: 1"));
    assert!(stderr.contains("Deadlocks detected:"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("is heading towards Intersection"));
    assert!(stdout.contains("--- Tick 1 ---"));
}

/// Test that a single intersection is refused
#[test]
fn test_route_rejects_single_intersection() {
    let output = run_sim(&["route", "--intersections", "I1", "--ticks", "1"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid configuration"),
        "Missing configuration error. stderr: {}",
        stderr
    );
}

/// Test that stepping through the signal commands on stdin drives the scheduler
#[test]
fn test_signal_interactive_commands() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(env!("CARGO_BIN_EXE_intersection_sim"))
        .args(["signal", "--interactive", "--seed", "5"])
        .env("RUST_LOG", "warn,intersection_sim=info")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start simulation");

    // Two steps, stop, an unknown command, one more step, quit
    child
        .stdin
        .take()
        .expect("Missing stdin")
        .write_all(b"n\n\ns\nx\nnext\nq\n")
        .expect("Failed to write commands");
    let output = child.wait_with_output().expect("Failed to wait for simulation");
    assert!(output.status.success(), "Interactive simulation failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Green Light:").count(), 3);
    assert_eq!(stdout.matches("Simulation stopped.").count(), 1);
    let rows: Vec<&str> = stdout
        .lines()
        .skip_while(|line| !line.starts_with("### Process Log"))
        .skip(3)
        .take_while(|line| line.starts_with('|'))
        .collect();
    assert_eq!(rows.len(), 3, "Unexpected step table. stdout: {}", stdout);
    for (step, row) in (1..=3).zip(&rows) {
        assert!(row.starts_with(&format!("| {step} ")));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown command 'x'"));
    assert!(stderr.contains("Steps run: 3"));
}

/// Test that an unbounded routing run stops cleanly on SIGINT and still reports
#[cfg(unix)]
#[test]
fn test_route_stops_on_interrupt() {
    use std::process::Stdio;
    use std::thread;
    use std::time::Duration;

    let child = Command::new(env!("CARGO_BIN_EXE_intersection_sim"))
        .args(["--json", "route", "--delay", "1", "--seed", "3"])
        .env("RUST_LOG", "warn,intersection_sim=info")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start simulation");

    thread::sleep(Duration::from_millis(1500));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("Failed to send SIGINT");
    assert!(status.success());

    let output = child.wait_with_output().expect("Failed to wait for simulation");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Interrupted run failed. stderr: {}", stderr);
    assert!(stderr.contains("Simulation cancelled"));
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Missing summary after interrupt. stderr: {}",
        stderr
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- Tick 1 ---"));
    assert!(stdout.contains("\"step\": 1"), "Missing JSON log. stdout: {}", stdout);
}
