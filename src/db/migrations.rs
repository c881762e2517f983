/// Database migrations and schema management.
use anyhow::Result;
use rusqlite::Connection;

/// Creates the initial schema if it doesn't exist yet.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS trips (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            current_location   TEXT NOT NULL,
            pickup_location    TEXT NOT NULL,
            dropoff_location   TEXT NOT NULL,
            current_cycle_used REAL NOT NULL,
            created_at         TEXT NOT NULL,
            updated_at         TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS logs (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            trip_id    INTEGER NOT NULL,
            status     TEXT    NOT NULL,
            start_time TEXT    NOT NULL,
            end_time   TEXT    NOT NULL,
            location   TEXT    NOT NULL,
            remarks    TEXT,
            FOREIGN KEY (trip_id) REFERENCES trips(id) ON DELETE CASCADE
        );
        ",
    )?;
    migrate_logs_add_remarks(conn)?;
    Ok(())
}

/// Early databases stored logs without a remarks column.
fn migrate_logs_add_remarks(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("PRAGMA table_info(logs)")?;
    let rows = stmt.query_map([], |row| {
        let name: String = row.get(1)?;
        Ok(name)
    })?;
    for row in rows {
        if row? == "remarks" {
            return Ok(());
        }
    }

    log::info!("migrating logs table: adding remarks column");
    conn.execute("ALTER TABLE logs ADD COLUMN remarks TEXT", [])?;
    Ok(())
}
