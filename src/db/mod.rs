/// Database module with trip and duty-log queries and migrations.
mod logs;
mod migrations;
mod trip;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

// Re-export all public functions
pub use logs::{append_log, create_log, query_logs_by_trip_id};
pub use trip::{create_trip, delete_trip, query_trip, query_trip_by_id, query_trips};

/// Opens (or creates) the SQLite database and runs migrations.
pub fn init(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    // Cascade deletes from trips to logs require this per connection.
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Returns the default database path inside the user's data directory.
/// Falls back to `./haulog.db` when no data dir is found.
pub fn default_db_path() -> String {
    if let Some(data_dir) = dirs::data_local_dir() {
        let haulog_dir = data_dir.join("haulog");
        std::fs::create_dir_all(&haulog_dir).ok();
        haulog_dir.join("haulog.db").to_string_lossy().into_owned()
    } else {
        "haulog.db".to_string()
    }
}

pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
