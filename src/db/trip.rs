/// Trip-related database queries.
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use crate::db::logs::query_logs_by_trip_id;
use crate::types::{Location, Trip, TripId, TripQuery};

pub fn create_trip(arg: Trip, conn: &Connection) -> Result<TripId> {
    conn.execute(
        "INSERT INTO trips (current_location, pickup_location, dropoff_location,
                            current_cycle_used, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            serde_json::to_string(&arg.current_location)?,
            serde_json::to_string(&arg.pickup_location)?,
            serde_json::to_string(&arg.dropoff_location)?,
            arg.current_cycle_used,
            arg.created_at.to_rfc3339(),
            arg.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid() as TripId)
}

pub fn query_trip(query: TripQuery, conn: &Connection) -> Result<Vec<Trip>> {
    match query {
        TripQuery::ById(id) => Ok(query_trip_by_id(id, conn)?.into_iter().collect()),
        TripQuery::All => query_trips(conn),
    }
}

pub fn query_trips(conn: &Connection) -> Result<Vec<Trip>> {
    let mut stmt = conn.prepare(
        "SELECT id, current_location, pickup_location, dropoff_location,
                current_cycle_used, created_at, updated_at
         FROM trips ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map([], read_trip_row)?;
    let mut trips = Vec::new();
    for row in rows {
        trips.push(parse_trip_row(row?, conn)?);
    }
    Ok(trips)
}

pub fn query_trip_by_id(id: TripId, conn: &Connection) -> Result<Option<Trip>> {
    let mut stmt = conn.prepare(
        "SELECT id, current_location, pickup_location, dropoff_location,
                current_cycle_used, created_at, updated_at
         FROM trips WHERE id = ?1",
    )?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        let raw = read_trip_row(row)?;
        Ok(Some(parse_trip_row(raw, conn)?))
    } else {
        Ok(None)
    }
}

pub fn delete_trip(id: TripId, conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM trips WHERE id = ?1", [id])?;
    Ok(())
}

/// Bumps a trip's updated_at; called whenever a log is appended.
pub(crate) fn touch_trip(id: TripId, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE trips SET updated_at = ?1 WHERE id = ?2",
        rusqlite::params![Utc::now().to_rfc3339(), id],
    )?;
    Ok(())
}

struct TripRow {
    id: TripId,
    current_location: String,
    pickup_location: String,
    dropoff_location: String,
    current_cycle_used: f64,
    created_at: String,
    updated_at: String,
}

fn read_trip_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TripRow> {
    Ok(TripRow {
        id: row.get(0)?,
        current_location: row.get(1)?,
        pickup_location: row.get(2)?,
        dropoff_location: row.get(3)?,
        current_cycle_used: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn parse_trip_row(raw: TripRow, conn: &Connection) -> Result<Trip> {
    let logs = query_logs_by_trip_id(raw.id, conn)?;
    Ok(Trip {
        id: Some(raw.id),
        current_location: parse_location(&raw.current_location),
        pickup_location: parse_location(&raw.pickup_location),
        dropoff_location: parse_location(&raw.dropoff_location),
        current_cycle_used: raw.current_cycle_used,
        created_at: crate::db::parse_datetime(&raw.created_at)?,
        updated_at: crate::db::parse_datetime(&raw.updated_at)?,
        logs,
    })
}

fn parse_location(raw: &str) -> Location {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        log::warn!("unreadable location column, keeping raw text: {err}");
        Location::at_address(raw)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::types::DutyStatus;
    use chrono::TimeZone;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn sample_trip() -> Trip {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        Trip {
            id: None,
            current_location: Location {
                lat: 41.878,
                lng: -87.629,
                address: "Chicago, IL".to_string(),
            },
            pickup_location: Location::at_address("Des Moines, IA"),
            dropoff_location: Location::at_address("Denver, CO"),
            current_cycle_used: 3.5,
            created_at: created,
            updated_at: created,
            logs: Vec::new(),
        }
    }

    #[test]
    fn trip_roundtrips_through_storage() {
        let conn = test_conn();
        let id = create_trip(sample_trip(), &conn).unwrap();

        let trip = query_trip_by_id(id, &conn).unwrap().unwrap();
        assert_eq!(trip.id, Some(id));
        assert_eq!(trip.pickup_location.address, "Des Moines, IA");
        assert_eq!(trip.current_location.lat, 41.878);
        assert_eq!(trip.current_cycle_used, 3.5);
        assert!(trip.logs.is_empty());
    }

    #[test]
    fn deleting_a_trip_cascades_to_its_logs() {
        let conn = test_conn();
        let id = create_trip(sample_trip(), &conn).unwrap();
        let trip = query_trip_by_id(id, &conn).unwrap().unwrap();
        crate::db::append_log(
            &trip,
            DutyStatus::Driving,
            trip.created_at + chrono::Duration::hours(2),
            Location::at_address("I-80"),
            String::new(),
            &conn,
        )
        .unwrap();

        delete_trip(id, &conn).unwrap();
        assert!(query_trip_by_id(id, &conn).unwrap().is_none());
        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM logs WHERE trip_id = ?1", [id], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn trips_list_newest_first() {
        let conn = test_conn();
        let mut older = sample_trip();
        older.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let older_id = create_trip(older, &conn).unwrap();
        let newer_id = create_trip(sample_trip(), &conn).unwrap();

        let trips = query_trips(&conn).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].id, Some(newer_id));
        assert_eq!(trips[1].id, Some(older_id));
    }
}
