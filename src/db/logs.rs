/// Duty-log database queries and the append-chaining rule.
use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db::trip::touch_trip;
use crate::types::{DutyLog, DutyStatus, Location, LogId, Trip, TripId};

/// Loads a trip's logs in chronological order. Rows that no longer parse
/// (bad timestamp, unknown status) are skipped with a warning instead of
/// poisoning the whole trip.
pub fn query_logs_by_trip_id(trip_id: TripId, conn: &Connection) -> Result<Vec<DutyLog>> {
    let mut stmt = conn.prepare(
        "SELECT id, trip_id, status, start_time, end_time, location, remarks
         FROM logs WHERE trip_id = ?1 ORDER BY start_time",
    )?;
    let rows = stmt.query_map([trip_id], read_log_row)?;

    let mut logs = Vec::new();
    for row in rows {
        let raw = row?;
        match parse_log_row(raw) {
            Ok(log) => logs.push(log),
            Err(err) => log::warn!("skipping unreadable log row for trip {trip_id}: {err}"),
        }
    }
    Ok(logs)
}

pub fn create_log(log: DutyLog, conn: &Connection) -> Result<DutyLog> {
    conn.execute(
        "INSERT INTO logs (trip_id, status, start_time, end_time, location, remarks)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            log.trip_id,
            log.status.as_str(),
            log.start_time.to_rfc3339(),
            log.end_time.to_rfc3339(),
            serde_json::to_string(&log.location)?,
            log.remarks,
        ],
    )?;
    let id = conn.last_insert_rowid() as LogId;
    Ok(DutyLog {
        id: Some(id),
        ..log
    })
}

/// Appends a duty-status change to a trip. Start times are never supplied by
/// the caller: the new log starts where the previous one ended (or at the
/// trip's creation time for the first entry), which keeps the list ordered
/// and gap-free. An end time at or before the last entry is rejected.
pub fn append_log(
    trip: &Trip,
    status: DutyStatus,
    end_time: DateTime<Utc>,
    location: Location,
    remarks: String,
    conn: &Connection,
) -> Result<DutyLog> {
    let trip_id = trip.id.ok_or_else(|| anyhow!("trip has no id"))?;

    let last_end = trip.logs.iter().map(|log| log.end_time).max();
    if let Some(last_end) = last_end {
        if end_time <= last_end {
            bail!("new log end time must be after the last log end time");
        }
    }
    let start_time = last_end.unwrap_or(trip.created_at);

    let log = create_log(
        DutyLog {
            id: None,
            trip_id,
            status,
            start_time,
            end_time,
            location,
            remarks,
        },
        conn,
    )?;
    touch_trip(trip_id, conn)?;
    Ok(log)
}

struct LogRow {
    id: LogId,
    trip_id: TripId,
    status: String,
    start_time: String,
    end_time: String,
    location: String,
    remarks: Option<String>,
}

fn read_log_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LogRow> {
    Ok(LogRow {
        id: row.get(0)?,
        trip_id: row.get(1)?,
        status: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        location: row.get(5)?,
        remarks: row.get(6)?,
    })
}

fn parse_log_row(raw: LogRow) -> Result<DutyLog> {
    let status = DutyStatus::parse(&raw.status)
        .ok_or_else(|| anyhow!("unknown duty status {:?}", raw.status))?;
    Ok(DutyLog {
        id: Some(raw.id),
        trip_id: raw.trip_id,
        status,
        start_time: crate::db::parse_datetime(&raw.start_time)?,
        end_time: crate::db::parse_datetime(&raw.end_time)?,
        location: serde_json::from_str(&raw.location)
            .unwrap_or_else(|_| Location::at_address(raw.location.clone())),
        remarks: raw.remarks.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::trip::{create_trip, query_trip_by_id};
    use chrono::TimeZone;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn trip_created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn seeded_trip(conn: &Connection) -> Trip {
        let created = trip_created_at();
        let trip = Trip {
            id: None,
            current_location: Location::at_address("Chicago, IL"),
            pickup_location: Location::at_address("Des Moines, IA"),
            dropoff_location: Location::at_address("Denver, CO"),
            current_cycle_used: 0.0,
            created_at: created,
            updated_at: created,
            logs: Vec::new(),
        };
        let id = create_trip(trip, conn).unwrap();
        query_trip_by_id(id, conn).unwrap().unwrap()
    }

    #[test]
    fn first_log_starts_at_trip_creation() {
        let conn = test_conn();
        let trip = seeded_trip(&conn);

        let log = append_log(
            &trip,
            DutyStatus::Driving,
            trip_created_at() + chrono::Duration::hours(4),
            Location::at_address("I-80"),
            String::new(),
            &conn,
        )
        .unwrap();
        assert_eq!(log.start_time, trip_created_at());
        assert!(log.id.is_some());
    }

    #[test]
    fn appended_logs_chain_start_to_previous_end() {
        let conn = test_conn();
        let trip = seeded_trip(&conn);
        let first_end = trip_created_at() + chrono::Duration::hours(4);
        append_log(
            &trip,
            DutyStatus::Driving,
            first_end,
            Location::at_address("I-80"),
            String::new(),
            &conn,
        )
        .unwrap();

        let trip = query_trip_by_id(trip.id.unwrap(), &conn).unwrap().unwrap();
        let second = append_log(
            &trip,
            DutyStatus::OnDuty,
            first_end + chrono::Duration::minutes(90),
            Location::at_address("Truck stop"),
            "fuel stop".to_string(),
            &conn,
        )
        .unwrap();
        assert_eq!(second.start_time, first_end);

        let trip = query_trip_by_id(trip.id.unwrap(), &conn).unwrap().unwrap();
        assert_eq!(trip.logs.len(), 2);
        assert!(trip.logs[0].start_time <= trip.logs[1].start_time);
        assert_eq!(trip.logs[1].remarks, "fuel stop");
    }

    #[test]
    fn out_of_order_append_is_rejected() {
        let conn = test_conn();
        let trip = seeded_trip(&conn);
        let first_end = trip_created_at() + chrono::Duration::hours(4);
        append_log(
            &trip,
            DutyStatus::Driving,
            first_end,
            Location::at_address("I-80"),
            String::new(),
            &conn,
        )
        .unwrap();

        let trip = query_trip_by_id(trip.id.unwrap(), &conn).unwrap().unwrap();
        let result = append_log(
            &trip,
            DutyStatus::OffDuty,
            first_end,
            Location::at_address("I-80"),
            String::new(),
            &conn,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unreadable_rows_are_skipped_not_fatal() {
        let conn = test_conn();
        let trip = seeded_trip(&conn);
        let trip_id = trip.id.unwrap();
        append_log(
            &trip,
            DutyStatus::Driving,
            trip_created_at() + chrono::Duration::hours(1),
            Location::at_address("I-80"),
            String::new(),
            &conn,
        )
        .unwrap();
        conn.execute(
            "INSERT INTO logs (trip_id, status, start_time, end_time, location, remarks)
             VALUES (?1, 'NAPPING', 'not-a-time', 'also-not', '{}', NULL)",
            [trip_id],
        )
        .unwrap();

        let logs = query_logs_by_trip_id(trip_id, &conn).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, DutyStatus::Driving);
    }

    #[test]
    fn location_json_roundtrips() {
        let conn = test_conn();
        let trip = seeded_trip(&conn);
        append_log(
            &trip,
            DutyStatus::Sleeper,
            trip_created_at() + chrono::Duration::hours(8),
            Location {
                lat: 41.2565,
                lng: -95.9345,
                address: "Omaha, NE".to_string(),
            },
            String::new(),
            &conn,
        )
        .unwrap();

        let logs = query_logs_by_trip_id(trip.id.unwrap(), &conn).unwrap();
        assert_eq!(logs[0].location.address, "Omaha, NE");
        assert_eq!(logs[0].location.lng, -95.9345);
    }
}
