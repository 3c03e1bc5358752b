//! tripwire-replay: run a scripted headless session and print what it produced.
//!
//! Usage:
//!   tripwire-replay run --script level.json [--ticks N] [--snapshot]
//!
//! Every presentation event and outbound message is printed as one JSON
//! line on stdout. Logs go to stderr, filtered by RUST_LOG (default info).

use std::path::PathBuf;
use std::process;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use tripwire_core::commands::HostCommand;
use tripwire_core::config::{LightningConfig, OccupantSpec, SpawnDenialPoint, ZoneSpec};
use tripwire_core::events::PresentationEvent;
use tripwire_core::net::NetMessage;
use tripwire_core::types::Transform;
use tripwire_core::TripwireResult;
use tripwire_sim::{SessionConfig, SessionEngine};

const DEFAULT_TICKS: u64 = 600;

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    session: SessionConfig,
    #[serde(default)]
    zones: Vec<ZoneSpec>,
    #[serde(default)]
    lightning: Vec<LightningSpec>,
    #[serde(default)]
    occupants: Vec<OccupantSpec>,
    #[serde(default)]
    spawn_denial_points: Vec<SpawnDenialPoint>,
    #[serde(default)]
    steps: Vec<Step>,
    ticks: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct LightningSpec {
    #[serde(default)]
    transform: Transform,
    #[serde(default)]
    config: LightningConfig,
}

#[derive(Debug, Deserialize)]
struct Step {
    at_tick: u64,
    command: HostCommand,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Line<'a> {
    Event { tick: u64, event: &'a PresentationEvent },
    Message { tick: u64, message: &'a NetMessage },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "tripwire-replay: headless Tripwire session runner\n\
         \n\
         Commands:\n\
         \n\
         run       Run a JSON session script\n\
         \n\
           --script <path>    Script file (session, zones, occupants, steps)\n\
           --ticks <N>        Ticks to run (default: script value or {DEFAULT_TICKS})\n\
           --snapshot         Print the final session snapshot\n\
         \n\
         Example:\n\
         \n\
           RUST_LOG=tripwire_sim=debug tripwire-replay run --script demos/acid_pit.json --ticks 300\n"
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn cmd_run(args: &[String]) {
    let Some(path) = flag_value(args, "--script").map(PathBuf::from) else {
        eprintln!("Error: --script is required");
        process::exit(1);
    };
    let ticks = match flag_value(args, "--ticks").map(str::parse::<u64>) {
        Some(Ok(n)) => Some(n),
        Some(Err(e)) => {
            eprintln!("Error: invalid --ticks: {e}");
            process::exit(1);
        }
        None => None,
    };
    let print_snapshot = args.iter().any(|a| a == "--snapshot");

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    };

    if let Err(e) = run_script(&text, ticks, print_snapshot) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_script(text: &str, ticks: Option<u64>, print_snapshot: bool) -> TripwireResult<()> {
    let script: Script = serde_json::from_str(text)?;
    let ticks = ticks.or(script.ticks).unwrap_or(DEFAULT_TICKS);

    let mut engine = SessionEngine::new(script.session);
    for zone in script.zones {
        engine.add_zone(zone)?;
    }
    engine.check_links()?;
    for hazard in script.lightning {
        engine.add_lightning(hazard.transform, hazard.config)?;
    }
    for occupant in script.occupants {
        engine.spawn_occupant(occupant)?;
    }
    engine.set_spawn_denial_points(script.spawn_denial_points);

    let mut steps = script.steps;
    steps.sort_by_key(|s| s.at_tick);
    let mut steps = steps.into_iter().peekable();

    tracing::info!(ticks, "replay started");
    for _ in 0..ticks {
        let now = engine.time().tick;
        while let Some(step) = steps.next_if(|s| s.at_tick <= now) {
            engine.queue_command(step.command);
        }
        let out = engine.tick();
        let tick = out.time.tick;
        for event in &out.presentation {
            println!("{}", serde_json::to_string(&Line::Event { tick, event })?);
        }
        for message in &out.outbox {
            println!("{}", serde_json::to_string(&Line::Message { tick, message })?);
        }
    }

    let stats = engine.stats();
    tracing::info!(
        effects = stats.effects_applied,
        deaths = stats.deaths,
        strikes = stats.lightning_strikes,
        "replay finished"
    );
    if print_snapshot {
        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    }
    engine.end_session();
    Ok(())
}
