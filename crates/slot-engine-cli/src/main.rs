//! `slots` CLI — check and list bookable slots from JSON request documents.
//!
//! ## Usage
//!
//! ```sh
//! # Is one slot bookable? (stdin → stdout)
//! echo '{"availability":{...},"events":[...],"slot":{...}}' | slots check
//!
//! # Every 30-minute slot in a range for one person
//! slots list -i person.json -o free.json
//!
//! # Every 30-minute slot in a range that works for all attendees
//! slots list-all -i team.json
//!
//! # Only the earliest slot that works for all attendees
//! slots first -i team.json
//!
//! # Debug logging on stderr (or set RUST_LOG)
//! slots --verbose list-all -i team.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use slot_engine::{Attendee, Availability, Event, Slot, SlotRange};
use std::io::{self, IsTerminal, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Check and list bookable slots against weekly availability and events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a single slot is bookable for one person
    Check {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List every bookable 30-minute slot in a range for one person
    List {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List every 30-minute slot in a range that is bookable for all attendees
    ListAll {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the earliest 30-minute slot that is bookable for all attendees
    First {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// `check` request: one person, one slot.
#[derive(Deserialize)]
struct SlotRequest {
    availability: Availability,
    #[serde(default)]
    events: Vec<Event>,
    slot: Slot,
}

/// `list` request: one person, one range.
#[derive(Deserialize)]
struct RangeRequest {
    availability: Availability,
    #[serde(default)]
    events: Vec<Event>,
    range: SlotRange,
}

/// `list-all` and `first` request: several attendees, one range.
#[derive(Deserialize)]
struct GroupRequest {
    attendees: Vec<Attendee>,
    range: SlotRange,
}

#[derive(Serialize)]
struct FirstSlot {
    slot: Option<Slot>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check { input } => {
            let request: SlotRequest = read_request(input.as_deref())?;
            validate_events(&request.events)?;
            let verdict = check_slot(&request)?;
            println!("{}", verdict);
        }
        Commands::List { input, output } => {
            let request: RangeRequest = read_request(input.as_deref())?;
            validate_events(&request.events)?;
            let slots = slot_engine::list_available_slots(
                &request.availability,
                &request.events,
                &request.range,
            )
            .context("Failed to list available slots")?;
            debug!(count = slots.len(), "available slots");
            write_json(output.as_deref(), &slots)?;
        }
        Commands::ListAll { input, output } => {
            let request: GroupRequest = read_request(input.as_deref())?;
            for attendee in &request.attendees {
                validate_events(&attendee.events)?;
            }
            let slots = slot_engine::list_available_slots_for_all(&request.attendees, &request.range)
                .context("Failed to list slots available for all attendees")?;
            debug!(count = slots.len(), "mutually available slots");
            write_json(output.as_deref(), &slots)?;
        }
        Commands::First { input } => {
            let request: GroupRequest = read_request(input.as_deref())?;
            for attendee in &request.attendees {
                validate_events(&attendee.events)?;
            }
            let slot =
                slot_engine::find_first_available_slot_for_all(&request.attendees, &request.range)
                    .context("Failed to search for the first slot available for all attendees")?;
            write_json(None, &FirstSlot { slot })?;
        }
    }

    Ok(())
}

/// Install a compact stderr subscriber. `--verbose` forces `debug`; otherwise
/// `RUST_LOG` is honoured and defaults to `warn`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();
}

/// One-line verdict for `check`, naming the reason when the slot is refused.
fn check_slot(request: &SlotRequest) -> Result<String> {
    let available =
        slot_engine::is_available(&request.availability, &request.events, &request.slot)
            .context("Failed to check slot")?;
    if available {
        return Ok("available".to_string());
    }

    if !slot_engine::matches(&request.availability, &request.slot) {
        return Ok("unavailable: outside weekly availability".to_string());
    }

    Ok(
        match slot_engine::first_conflict(&request.events, &request.slot) {
            Some(event) => format!(
                "unavailable: blocked by event {} - {}",
                event.start.to_rfc3339(),
                event.end.to_rfc3339()
            ),
            None => "unavailable".to_string(),
        },
    )
}

/// Events from outside must satisfy `start < end` before reaching the detector.
fn validate_events(events: &[Event]) -> Result<()> {
    for (index, event) in events.iter().enumerate() {
        event
            .validate()
            .with_context(|| format!("Invalid event at index {}", index))?;
    }
    Ok(())
}

fn read_request<T: DeserializeOwned>(path: Option<&str>) -> Result<T> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse request JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            std::fs::write(path, pretty).with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", pretty);
        }
    }
    Ok(())
}
