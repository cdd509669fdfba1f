//! `SQLite` schema definitions for bikefleet.
//!
//! Every table mirrors one collection of the in-memory [`Fleet`](crate::Fleet).
//! Dates are `YYYY-MM-DD` text and timestamps RFC 3339 text.

/// SQL statement to create the bikes table.
pub const CREATE_BIKES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS bikes (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    ref_no TEXT NOT NULL,
    brand TEXT NOT NULL,
    model TEXT NOT NULL,
    size TEXT NOT NULL,
    status TEXT NOT NULL,
    entry_date TEXT NOT NULL,
    image_url TEXT NOT NULL
)
";

/// SQL statement to create the maintenance records table.
///
/// `tasks` holds a JSON array of task labels.
pub const CREATE_MAINTENANCE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS maintenance_records (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    bike_id TEXT NOT NULL,
    description TEXT NOT NULL,
    tasks TEXT NOT NULL DEFAULT '[]',
    workshop_notes TEXT NOT NULL DEFAULT '',
    reported_date TEXT NOT NULL,
    resolved_date TEXT,
    status TEXT NOT NULL
)
";

/// SQL statement to create the bookings table.
pub const CREATE_BOOKINGS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS bookings (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    bike_id TEXT NOT NULL,
    booking_number TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    notes TEXT NOT NULL DEFAULT ''
)
";

/// SQL statement to create the task catalog table.
pub const CREATE_TASK_TYPES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS task_types (
    name TEXT PRIMARY KEY
)
";

/// Index for per-bike maintenance lookups.
pub const CREATE_MAINTENANCE_BIKE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_maintenance_bike ON maintenance_records(bike_id)
";

/// Index for per-bike booking lookups in date order.
pub const CREATE_BOOKINGS_BIKE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_bookings_bike ON bookings(bike_id, start_date)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_BIKES_TABLE,
    CREATE_MAINTENANCE_TABLE,
    CREATE_BOOKINGS_TABLE,
    CREATE_TASK_TYPES_TABLE,
    CREATE_MAINTENANCE_BIKE_INDEX,
    CREATE_BOOKINGS_BIKE_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.trim().is_empty());
        }
    }

    #[test]
    fn test_tables_keep_insertion_order() {
        for table in [
            CREATE_BIKES_TABLE,
            CREATE_MAINTENANCE_TABLE,
            CREATE_BOOKINGS_TABLE,
        ] {
            assert!(table.contains("id TEXT PRIMARY KEY"));
            assert!(table.contains("position INTEGER NOT NULL"));
            assert!(table.contains("created_at TEXT NOT NULL"));
        }
    }

    #[test]
    fn test_maintenance_tasks_default_to_empty_array() {
        assert!(CREATE_MAINTENANCE_TABLE.contains("tasks TEXT NOT NULL DEFAULT '[]'"));
        assert!(CREATE_MAINTENANCE_TABLE.contains("resolved_date TEXT,"));
    }

    #[test]
    fn test_statements_are_idempotent() {
        for stmt in SCHEMA_STATEMENTS {
            assert!(stmt.contains("IF NOT EXISTS"));
        }
    }
}
