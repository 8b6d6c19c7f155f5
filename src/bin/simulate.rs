//! Concurrent soak simulator CLI.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                      # 4 workers, 500 actions each
//!   cargo run --bin simulate -- -w 8 -a 12        # 8 workers over 12 characters
//!   cargo run --bin simulate -- --seed 42         # Reproducible run

use std::env;
use tribulation::simulator::{run_soak, SoakConfig};

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              TRIBULATION SOAK SIMULATOR                       ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Workers:        {}", config.workers);
    println!("  Actions/worker: {}", config.actions_per_worker);
    println!("  Characters:     {}", config.actors);
    println!("  Clock step:     {}s", config.clock_step_secs);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running soak...");
    println!();

    let report = run_soak(&config);
    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let filename = format!(
            "soak_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(err) => eprintln!("Failed to write JSON report: {}", err),
        }
    }

    if !report.is_healthy() {
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> SoakConfig {
    let mut config = SoakConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-w" | "--workers" => {
                if i + 1 < args.len() {
                    config.workers = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "-n" | "--actions" => {
                if i + 1 < args.len() {
                    config.actions_per_worker = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "-a" | "--actors" => {
                if i + 1 < args.len() {
                    config.actors = args[i + 1].parse().unwrap_or(12);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--step" => {
                if i + 1 < args.len() {
                    config.clock_step_secs = args[i + 1].parse().unwrap_or(600);
                    i += 1;
                }
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                config = SoakConfig::quick();
            }
            "--contention" => {
                config = SoakConfig::contention();
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Tribulation Soak Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -w, --workers <N>   Worker threads (default: 4)");
    println!("    -n, --actions <N>   Actions per worker (default: 500)");
    println!("    -a, --actors <N>    Distinct characters (default: 12)");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    --step <SECS>       Clock advance per action (default: 600)");
    println!("    -v, --verbose       Per-worker output");
    println!("    --json              Save JSON report");
    println!("    --quick             Small run (2 workers, 100 actions, 6 characters)");
    println!("    --contention        8 workers over 4 characters");
    println!("    -h, --help          Show this help");
}
