//! Dual-lane intersection simulator.
//!
//! Runs the signal controller on simulated peripherals. Lines typed on
//! stdin are forwarded byte by byte to the operator console (`s` for
//! status, `h` for help).
//!
//! Usage:
//!   cargo run -p traffic_signal_sitl --bin intersection_sim -- [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>    JSON configuration (default: built-in)
//!   -d, --duration <MS>    Stop after this much simulated time
//!   --step <MS>            Simulated time per tick (default: 100)
//!   --csv <FILE>           Write telemetry as CSV to FILE
//!   --fast                 Do not pace steps against the wall clock

use std::env;
use std::path::PathBuf;
use std::process;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use traffic_signal_sitl::{SimConfig, SimTelemetry, Simulation};

struct Args {
    config: Option<PathBuf>,
    duration_ms: Option<u64>,
    step_ms: Option<u64>,
    csv_path: Option<PathBuf>,
    fast: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        config: None,
        duration_ms: None,
        step_ms: None,
        csv_path: None,
        fast: false,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                args.config = Some(PathBuf::from(string_arg(&raw, i, "config")));
            }
            "-d" | "--duration" => {
                i += 1;
                args.duration_ms = Some(parse_u64_arg(&raw, i, "duration"));
            }
            "--step" => {
                i += 1;
                args.step_ms = Some(parse_u64_arg(&raw, i, "step"));
            }
            "--csv" => {
                i += 1;
                args.csv_path = Some(PathBuf::from(string_arg(&raw, i, "csv")));
            }
            "--fast" => args.fast = true,
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn string_arg<'a>(raw: &'a [String], i: usize, name: &str) -> &'a str {
    raw.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("Error: --{name} requires a value");
        process::exit(1);
    })
}

fn parse_u64_arg(raw: &[String], i: usize, name: &str) -> u64 {
    string_arg(raw, i, name).parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid value for --{name}");
        process::exit(1);
    })
}

fn print_usage() {
    eprintln!(
        "Usage: intersection_sim [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 -c, --config <FILE>    JSON configuration (default: built-in)\n\
         \x20 -d, --duration <MS>    Stop after this much simulated time\n\
         \x20 --step <MS>            Simulated time per tick (default: 100)\n\
         \x20 --csv <FILE>           Write telemetry as CSV to FILE\n\
         \x20 --fast                 Do not pace steps against the wall clock\n\
         \x20 -h, --help             Show this help"
    );
}

fn load_config(args: &Args) -> SimConfig {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error: {}: {e}", path.display());
            process::exit(1);
        }),
        None => SimConfig::default(),
    };

    if let Some(duration_ms) = args.duration_ms {
        config.duration_ms = Some(duration_ms);
    }
    if let Some(step_ms) = args.step_ms {
        config.step_ms = step_ms;
    }
    if let Some(path) = &args.csv_path {
        config.csv_path = Some(path.clone());
    }
    if args.fast {
        config.realtime = false;
    }
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    config
}

/// Forward stdin lines to the console, one message per line.
fn spawn_stdin_reader(tx: mpsc::Sender<Vec<u8>>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut bytes = line.into_bytes();
            bytes.push(b'\n');
            if tx.send(bytes).await.is_err() {
                break;
            }
        }
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = parse_args();
    let config = load_config(&args);

    println!("=== Traffic Signal Simulator ===");
    println!(
        "Step: {} ms, duration: {}, telemetry: {}",
        config.step_ms,
        config
            .duration_ms
            .map_or_else(|| "until Ctrl+C".to_string(), |d| format!("{d} ms")),
        config
            .csv_path
            .as_ref()
            .map_or_else(|| "log".to_string(), |p| p.display().to_string())
    );
    println!();

    let telemetry = SimTelemetry::open(config.csv_path.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    let mut sim = Simulation::new(&config, telemetry).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    let (tx, rx) = mpsc::channel(16);
    spawn_stdin_reader(tx);

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => println!("\nShutdown requested."),
            // No signal handler: run until the duration elapses
            Err(_) => std::future::pending::<()>().await,
        }
    };
    let summary = sim.run(rx, shutdown).await;

    println!(
        "Simulation complete. {} steps, {} ms simulated, {} transitions, {} arrivals, {} telemetry entries",
        summary.steps,
        summary.sim_time_ms,
        summary.stats.transitions,
        summary.stats.arrivals,
        summary.stats.telemetry_entries
    );
}
