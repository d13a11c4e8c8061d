//! `slots` CLI — generate, resolve and validate availability slots from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Slots for one window (09:00-12:00, 30-minute slots, 10-minute buffer)
//! slots generate --start 09:00 --end 12:00 --duration 30 --buffer 10
//!
//! # Resolve a date against a schedule file
//! slots resolve --schedule schedule.json --date 2026-03-16
//!
//! # Resolve a week as JSON
//! slots --json resolve --schedule schedule.json --date 2026-03-16 --days 7
//!
//! # Check every entry of a schedule file
//! slots validate --schedule schedule.json
//!
//! # Custom duration limits and verbose logs
//! slots --config limits.json --log-level debug resolve -s schedule.json -d 2026-03-16
//! ```

mod schedule;

use std::io::{self, Read};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::{generate, EngineConfig, InMemoryStore, ScheduleService, Slot, WallTime};
use tracing_subscriber::EnvFilter;

use crate::schedule::ScheduleFile;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Availability slot generation and resolution"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Engine config file (JSON) with validation limits
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log filter, e.g. "debug" or "slot_engine=trace" (defaults to RUST_LOG, then "warn")
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the slots that fit in one window
    Generate {
        /// Window start (HH:MM)
        #[arg(long)]
        start: WallTime,
        /// Window end (HH:MM, 24:00 for end of day)
        #[arg(long)]
        end: WallTime,
        /// Slot length in minutes
        #[arg(long)]
        duration: u32,
        /// Idle minutes between consecutive slots
        #[arg(long, default_value_t = 0)]
        buffer: u32,
    },
    /// Resolve the slots of one or more dates against a schedule file
    Resolve {
        /// Schedule file (reads from stdin if omitted)
        #[arg(short, long)]
        schedule: Option<String>,
        /// First date to resolve (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
        /// Number of consecutive dates to resolve
        #[arg(long, default_value_t = 1)]
        days: u32,
    },
    /// Validate every entry of a schedule file
    Validate {
        /// Schedule file (reads from stdin if omitted)
        #[arg(short, long)]
        schedule: Option<String>,
    },
}

#[derive(Serialize)]
struct ResolvedDay {
    date: NaiveDate,
    slots: Vec<Slot>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = match cli.config.as_deref() {
        Some(path) => EngineConfig::load(path).context("Failed to load engine config")?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Generate {
            start,
            end,
            duration,
            buffer,
        } => {
            let slots = generate(start, end, duration, buffer);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                for slot in &slots {
                    println!("{slot}");
                }
            }
        }
        Commands::Resolve {
            schedule,
            date,
            days,
        } => {
            anyhow::ensure!(days > 0, "--days must be at least 1");
            let file = ScheduleFile::parse(&read_input(schedule.as_deref())?)?;
            let service = ScheduleService::with_config(Arc::new(InMemoryStore::new()), config);
            file.load_into(&service).await?;

            let last = date
                .checked_add_days(Days::new(u64::from(days - 1)))
                .context("Date range runs past the supported calendar")?;
            let resolved: Vec<ResolvedDay> = service
                .resolve_range(date, last)
                .await?
                .into_iter()
                .map(|(date, slots)| ResolvedDay { date, slots })
                .collect();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                print_days(&resolved);
            }
        }
        Commands::Validate { schedule } => {
            let file = ScheduleFile::parse(&read_input(schedule.as_deref())?)?;
            let reports = file.validate(&config.limits);
            let all_valid = reports.iter().all(|r| r.is_valid());

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    if report.is_valid() {
                        println!("{}: ok", report.entry);
                    }
                    for violation in &report.violations {
                        println!("{}: {}", report.entry, violation);
                    }
                }
            }

            if !all_valid {
                process::exit(1);
            }
        }
    }

    Ok(())
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_days(days: &[ResolvedDay]) {
    for day in days {
        println!("{} ({})", day.date, day.date.weekday());
        if day.slots.is_empty() {
            println!("  no slots");
        }
        for slot in &day.slots {
            let origin = match slot.origin {
                slot_engine::SlotOrigin::Regular => "regular",
                slot_engine::SlotOrigin::Adhoc => "adhoc",
            };
            println!("  {slot}  {origin}");
        }
    }
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
