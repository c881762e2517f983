/// CLI argument parsing and command handling.
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::types::{DutyStatus, Location, Trip, TripId, TripQuery};
use crate::{db, grid, hos, updater};

#[derive(Parser)]
#[command(
    name = "haulog",
    version,
    about = "Haulog - A terminal-based ELD trip log manager"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Trip {
        #[command(subcommand)]
        command: TripCommand,
    },
    Log {
        #[command(subcommand)]
        command: LogCommand,
    },
    /// Export a trip's daily log grid as an SVG file
    Export {
        trip: TripId,
        #[arg(short, long)]
        out: Option<String>,
        #[arg(long, default_value_t = grid::DEFAULT_WIDTH)]
        width: f64,
        #[arg(long, default_value_t = grid::DEFAULT_HEIGHT)]
        height: f64,
    },
    /// Replace this binary with the latest released version
    Update,
}

#[derive(Subcommand, Debug)]
pub enum TripCommand {
    Add {
        pickup: String,
        dropoff: String,
        #[arg(short = 'f', long = "from")]
        current: Option<String>,
        #[arg(short = 'c', long = "cycle-used", default_value_t = 0.0)]
        cycle_used: f64,
    },
    List,
    Delete {
        id: TripId,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogCommand {
    Add {
        trip: TripId,
        status: String,
        /// End of the interval, RFC 3339; defaults to now
        #[arg(short = 'e', long = "end")]
        end: Option<String>,
        #[arg(short, long)]
        remarks: Option<String>,
        #[arg(short, long)]
        address: Option<String>,
    },
    Show {
        trip: TripId,
    },
}

/// Execute a CLI command (trip, log, export, or update).
pub fn run(command: Command, conn: &Connection) -> Result<()> {
    match command {
        Command::Trip {
            command:
                TripCommand::Add {
                    pickup,
                    dropoff,
                    current,
                    cycle_used,
                },
        } => handle_trip_add(pickup, dropoff, current, cycle_used, conn)?,
        Command::Trip {
            command: TripCommand::List,
        } => handle_trip_list(conn)?,
        Command::Trip {
            command: TripCommand::Delete { id },
        } => handle_trip_delete(id, conn)?,
        Command::Log {
            command:
                LogCommand::Add {
                    trip,
                    status,
                    end,
                    remarks,
                    address,
                },
        } => handle_log_add(trip, status, end, remarks, address, conn)?,
        Command::Log {
            command: LogCommand::Show { trip },
        } => handle_log_show(trip, conn)?,
        Command::Export {
            trip,
            out,
            width,
            height,
        } => handle_export(trip, out, width, height, conn)?,
        Command::Update => updater::perform_update()?,
    }
    Ok(())
}

fn handle_trip_add(
    pickup: String,
    dropoff: String,
    current: Option<String>,
    cycle_used: f64,
    conn: &Connection,
) -> Result<()> {
    if cycle_used < 0.0 {
        println!("Cycle used cannot be negative.");
        return Ok(());
    }
    let now = Utc::now();
    let id = db::create_trip(
        Trip {
            id: None,
            current_location: Location::at_address(current.unwrap_or_default()),
            pickup_location: Location::at_address(pickup),
            dropoff_location: Location::at_address(dropoff),
            current_cycle_used: cycle_used,
            created_at: now,
            updated_at: now,
            logs: Vec::new(),
        },
        conn,
    )?;
    println!("Created trip {id}.");
    Ok(())
}

fn handle_trip_list(conn: &Connection) -> Result<()> {
    let trips = db::query_trip(TripQuery::All, conn)?;
    if trips.is_empty() {
        println!("No trips yet. Create one with 'haulog trip add'.");
        return Ok(());
    }
    println!(
        "{:>4}  {:<44} {:>7} {:>5} {:>9}",
        "Id", "Route", "Cycle", "Logs", "Driving"
    );
    for trip in trips {
        let stats = hos::aggregate(&trip.logs);
        let route = format!(
            "{} -> {}",
            trip.pickup_location.address, trip.dropoff_location.address
        );
        println!(
            "{:>4}  {:<44} {:>6.1}h {:>5} {:>8.1}h",
            trip.id.unwrap_or(0),
            route,
            trip.current_cycle_used,
            trip.logs.len(),
            stats.driving_hours,
        );
    }
    Ok(())
}

fn handle_trip_delete(id: TripId, conn: &Connection) -> Result<()> {
    if db::query_trip_by_id(id, conn)?.is_none() {
        println!("Trip {id} not found.");
        return Ok(());
    }
    db::delete_trip(id, conn)?;
    println!("Deleted trip {id} and its logs.");
    Ok(())
}

fn handle_log_add(
    trip_id: TripId,
    status: String,
    end: Option<String>,
    remarks: Option<String>,
    address: Option<String>,
    conn: &Connection,
) -> Result<()> {
    let Some(trip) = db::query_trip_by_id(trip_id, conn)? else {
        println!("Trip {trip_id} not found.");
        return Ok(());
    };

    let normalized = status.to_uppercase().replace('-', "_");
    let Some(status) = DutyStatus::parse(&normalized) else {
        println!("Unknown status '{status}'. Use one of: OFF_DUTY, SLEEPER, DRIVING, ON_DUTY.");
        return Ok(());
    };

    let end_time = match parse_optional_datetime(end)? {
        Some(end_time) => end_time,
        None => Utc::now(),
    };

    let location = Location::at_address(address.unwrap_or_default());
    match db::append_log(
        &trip,
        status,
        end_time,
        location,
        remarks.unwrap_or_default(),
        conn,
    ) {
        Ok(log) => {
            println!(
                "Logged {} from {} to {}.",
                status.label(),
                log.start_time.format("%Y-%m-%d %H:%M"),
                log.end_time.format("%Y-%m-%d %H:%M"),
            );
        }
        Err(err) => {
            println!("Could not add log: {err}");
            return Ok(());
        }
    }

    let trip = db::query_trip_by_id(trip_id, conn)?.expect("trip disappeared mid-command");
    print_compliance(&trip);
    Ok(())
}

fn handle_log_show(trip_id: TripId, conn: &Connection) -> Result<()> {
    let Some(trip) = db::query_trip(TripQuery::ById(trip_id), conn)?.into_iter().next() else {
        println!("Trip {trip_id} not found.");
        return Ok(());
    };
    if trip.logs.is_empty() {
        println!("No logs on trip {trip_id} yet.");
        return Ok(());
    }

    for log in &trip.logs {
        let duration = log.end_time.signed_duration_since(log.start_time);
        let hours = duration.num_minutes().max(0) as f64 / 60.0;
        print!(
            "{:<22} {} -> {}  ({hours:.1}h)",
            log.status.label(),
            log.start_time.format("%H:%M"),
            log.end_time.format("%H:%M"),
        );
        if !log.remarks.is_empty() {
            print!("  // {}", log.remarks);
        }
        println!();
    }
    print_compliance(&trip);
    Ok(())
}

fn handle_export(
    trip_id: TripId,
    out: Option<String>,
    width: f64,
    height: f64,
    conn: &Connection,
) -> Result<()> {
    let Some(trip) = db::query_trip_by_id(trip_id, conn)? else {
        println!("Trip {trip_id} not found.");
        return Ok(());
    };

    let drawing = grid::render(&trip.logs, width, height);
    let path = out.unwrap_or_else(|| format!("trip_{trip_id}_log.svg"));
    std::fs::write(&path, drawing.to_svg())?;
    println!("Wrote {path}");

    let stats = hos::aggregate(&trip.logs);
    for warning in &stats.warnings {
        println!("warning: {warning}");
    }
    Ok(())
}

fn print_compliance(trip: &Trip) {
    let stats = hos::aggregate(&trip.logs);
    println!(
        "Totals: driving {:.1}h, on duty {:.1}h, off duty {:.1}h, sleeper {:.1}h",
        stats.driving_hours, stats.on_duty_hours, stats.off_duty_hours, stats.sleeper_hours,
    );
    for warning in &stats.warnings {
        println!("warning: {warning}");
    }
    for check in hos::evaluate(&stats, trip.current_cycle_used) {
        if check.severity != hos::Severity::Normal {
            println!("{}: {}", check.label, check.message);
        }
    }
}

fn parse_optional_datetime(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(s) => {
            let dt = DateTime::parse_from_rfc3339(&s)?.with_timezone(&Utc);
            Ok(Some(dt))
        }
        None => Ok(None),
    }
}
