//! Storage layer for bikefleet.
//!
//! This module provides `SQLite`-based persistence for the whole [`Fleet`].
//! The state is small and always written as one snapshot, so `save` replaces
//! every table inside a single transaction.

pub mod migrations;
pub mod schema;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::fleet::Fleet;
use crate::model::{Bike, BikeSize, BikeStatus, Booking, MaintenanceRecord, MaintenanceStatus};

/// Metadata key holding the hash of the last saved snapshot.
const SNAPSHOT_HASH_KEY: &str = "snapshot_hash";

/// Metadata key holding the time of the last save.
const SAVED_AT_KEY: &str = "saved_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage engine for the fleet snapshot.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved fleet.
    ///
    /// Returns `None` when nothing has ever been saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a stored date is
    /// malformed.
    pub fn load(&self) -> Result<Option<Fleet>> {
        if self.metadata(SAVED_AT_KEY)?.is_none() {
            debug!("No saved snapshot in {}", self.path.display());
            return Ok(None);
        }

        let bikes = self
            .conn
            .prepare(
                r"
                SELECT id, created_at, ref_no, brand, model, size, status, entry_date, image_url
                FROM bikes ORDER BY position
                ",
            )?
            .query_map([], row_to_bike)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let maintenance = self
            .conn
            .prepare(
                r"
                SELECT id, created_at, bike_id, description, tasks, workshop_notes,
                       reported_date, resolved_date, status
                FROM maintenance_records ORDER BY position
                ",
            )?
            .query_map([], row_to_maintenance)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let bookings = self
            .conn
            .prepare(
                r"
                SELECT id, created_at, bike_id, booking_number, start_date, end_date, notes
                FROM bookings ORDER BY position
                ",
            )?
            .query_map([], row_to_booking)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let task_types = self
            .conn
            .prepare("SELECT name FROM task_types ORDER BY name")?
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        debug!(
            "Loaded {} bikes, {} maintenance records, {} bookings",
            bikes.len(),
            maintenance.len(),
            bookings.len()
        );
        Ok(Some(Fleet::from_parts(
            bikes,
            maintenance,
            bookings,
            task_types,
        )))
    }

    /// Save the whole fleet, replacing the previous snapshot.
    ///
    /// Returns `false` without writing when the snapshot is unchanged since
    /// the last save.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database transaction fails.
    pub fn save(&mut self, fleet: &Fleet) -> Result<bool> {
        let hash = snapshot_hash(fleet)?;
        if self.metadata(SNAPSHOT_HASH_KEY)?.as_deref() == Some(hash.as_str()) {
            debug!("Snapshot unchanged, skipping save");
            return Ok(false);
        }

        let tx = self.conn.transaction()?;
        for table in ["bikes", "maintenance_records", "bookings", "task_types"] {
            tx.execute(&format!("DELETE FROM {table}"), [])?;
        }

        for (position, bike) in fleet.bikes().iter().enumerate() {
            tx.execute(
                r"
                INSERT INTO bikes
                    (id, position, created_at, ref_no, brand, model, size, status, entry_date, image_url)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ",
                params![
                    bike.id,
                    position_value(position),
                    bike.created_at.to_rfc3339(),
                    bike.ref_no,
                    bike.brand,
                    bike.model,
                    bike.size.to_string(),
                    bike.status.to_string(),
                    bike.entry_date.format(DATE_FORMAT).to_string(),
                    bike.image_url,
                ],
            )?;
        }

        for (position, record) in fleet.maintenance().iter().enumerate() {
            tx.execute(
                r"
                INSERT INTO maintenance_records
                    (id, position, created_at, bike_id, description, tasks, workshop_notes,
                     reported_date, resolved_date, status)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ",
                params![
                    record.id,
                    position_value(position),
                    record.created_at.to_rfc3339(),
                    record.bike_id,
                    record.description,
                    serde_json::to_string(&record.tasks)?,
                    record.workshop_notes,
                    record.reported_date.format(DATE_FORMAT).to_string(),
                    record
                        .resolved_date
                        .map(|d| d.format(DATE_FORMAT).to_string()),
                    record.status.to_string(),
                ],
            )?;
        }

        for (position, booking) in fleet.bookings().iter().enumerate() {
            tx.execute(
                r"
                INSERT INTO bookings
                    (id, position, created_at, bike_id, booking_number, start_date, end_date, notes)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
                params![
                    booking.id,
                    position_value(position),
                    booking.created_at.to_rfc3339(),
                    booking.bike_id,
                    booking.booking_number,
                    booking.start_date.format(DATE_FORMAT).to_string(),
                    booking.end_date.format(DATE_FORMAT).to_string(),
                    booking.notes,
                ],
            )?;
        }

        for name in fleet.task_types() {
            tx.execute("INSERT INTO task_types (name) VALUES (?1)", [name])?;
        }

        for (key, value) in [
            (SNAPSHOT_HASH_KEY, hash),
            (SAVED_AT_KEY, Utc::now().to_rfc3339()),
        ] {
            tx.execute(
                "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
                (key, value),
            )?;
        }
        tx.commit()?;

        info!(
            "Saved {} bikes, {} maintenance records, {} bookings",
            fleet.bikes().len(),
            fleet.maintenance().len(),
            fleet.bookings().len()
        );
        Ok(true)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let last_saved = self
            .metadata(SAVED_AT_KEY)?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            bikes: self.count("bikes")?,
            maintenance_records: self.count("maintenance_records")?,
            bookings: self.count("bookings")?,
            task_types: self.count("task_types")?,
            schema_version: migrations::get_schema_version(&self.conn)?,
            last_saved,
            db_size_bytes,
        })
    }

    fn count(&self, table: &str) -> Result<i64> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?;
        Ok(count)
    }

    fn metadata(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageStats {
    /// Number of stored bikes.
    pub bikes: i64,
    /// Number of stored maintenance records.
    pub maintenance_records: i64,
    /// Number of stored bookings.
    pub bookings: i64,
    /// Number of task labels in the catalog.
    pub task_types: i64,
    /// Schema version of the database.
    pub schema_version: i32,
    /// When the snapshot was last written.
    pub last_saved: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

/// BLAKE3 hash of the serialized snapshot.
///
/// # Errors
///
/// Returns an error if the fleet cannot be serialized.
pub fn snapshot_hash(fleet: &Fleet) -> Result<String> {
    let bytes = serde_json::to_vec(fleet)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// Serialize the whole fleet as one pretty-printed JSON document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_json(fleet: &Fleet) -> Result<String> {
    Ok(serde_json::to_string_pretty(fleet)?)
}

/// Parse a fleet document produced by [`export_json`].
///
/// The document must hold together the way the tracker itself keeps the
/// fleet: unique IDs, no records pointing at unknown bikes, no reversed or
/// overlapping bookings of one bike. The task catalog is rebuilt trimmed,
/// deduplicated and sorted, and repeated tasks on a record are dropped.
///
/// # Errors
///
/// Returns a JSON error for malformed input, `BookingConflict` for
/// overlapping bookings and a validation error for any other inconsistency.
pub fn import_json(json: &str) -> Result<Fleet> {
    let fleet: Fleet = serde_json::from_str(json)?;

    ensure_unique("bike", fleet.bikes().iter().map(|b| b.id.as_str()))?;
    ensure_unique(
        "maintenance record",
        fleet.maintenance().iter().map(|m| m.id.as_str()),
    )?;
    ensure_unique("booking", fleet.bookings().iter().map(|b| b.id.as_str()))?;

    for record in fleet.maintenance() {
        if fleet.bike(&record.bike_id).is_none() {
            return Err(Error::validation(format!(
                "maintenance record {} refers to unknown bike {}",
                record.id, record.bike_id
            )));
        }
    }
    for booking in fleet.bookings() {
        if fleet.bike(&booking.bike_id).is_none() {
            return Err(Error::validation(format!(
                "booking {} refers to unknown bike {}",
                booking.booking_number, booking.bike_id
            )));
        }
        if booking.start_date > booking.end_date {
            return Err(Error::validation(format!(
                "booking {} ends before it starts",
                booking.booking_number
            )));
        }
        if let Some(other) =
            fleet.conflicting_booking(&booking.bike_id, &booking.range(), Some(&booking.id))
        {
            return Err(Error::BookingConflict {
                bike_id: booking.bike_id.clone(),
                booking_number: other.booking_number.clone(),
            });
        }
    }

    let mut maintenance = fleet.maintenance().to_vec();
    for record in &mut maintenance {
        let mut seen = HashSet::new();
        record.tasks.retain(|task| seen.insert(task.clone()));
    }
    let task_types = Fleet::new(fleet.task_types().iter().cloned())
        .task_types()
        .to_vec();

    Ok(Fleet::from_parts(
        fleet.bikes().to_vec(),
        maintenance,
        fleet.bookings().to_vec(),
        task_types,
    ))
}

fn ensure_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::validation(format!("duplicate {kind} id {id}")));
        }
    }
    Ok(())
}

fn position_value(position: usize) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).map_or_else(
        |_| {
            warn!("Invalid timestamp in database: {value}, using now");
            Utc::now()
        },
        |dt| dt.with_timezone(&Utc),
    )
}

fn parse_date(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_bike(row: &rusqlite::Row) -> rusqlite::Result<Bike> {
    let size_str: String = row.get(5)?;
    let status_str: String = row.get(6)?;
    let entry_str: String = row.get(7)?;

    let size = size_str.parse().unwrap_or_else(|_| {
        warn!("Unknown bike size: {}, defaulting to M", size_str);
        BikeSize::M
    });
    let status = status_str.parse().unwrap_or_else(|_| {
        warn!("Unknown bike status: {}, defaulting to available", status_str);
        BikeStatus::Available
    });

    Ok(Bike {
        id: row.get(0)?,
        created_at: parse_timestamp(&row.get::<_, String>(1)?),
        ref_no: row.get(2)?,
        brand: row.get(3)?,
        model: row.get(4)?,
        size,
        status,
        entry_date: parse_date(7, &entry_str)?,
        image_url: row.get(8)?,
    })
}

fn row_to_maintenance(row: &rusqlite::Row) -> rusqlite::Result<MaintenanceRecord> {
    let tasks_str: String = row.get(4)?;
    let reported_str: String = row.get(6)?;
    let resolved_str: Option<String> = row.get(7)?;
    let status_str: String = row.get(8)?;

    let tasks = serde_json::from_str(&tasks_str).unwrap_or_else(|_| {
        warn!("Invalid task list in database: {}, dropping it", tasks_str);
        Vec::new()
    });
    let status = status_str.parse().unwrap_or_else(|_| {
        warn!(
            "Unknown maintenance status: {}, defaulting to pending",
            status_str
        );
        MaintenanceStatus::Pending
    });

    Ok(MaintenanceRecord {
        id: row.get(0)?,
        created_at: parse_timestamp(&row.get::<_, String>(1)?),
        bike_id: row.get(2)?,
        description: row.get(3)?,
        tasks,
        workshop_notes: row.get(5)?,
        reported_date: parse_date(6, &reported_str)?,
        resolved_date: resolved_str.map(|s| parse_date(7, &s)).transpose()?,
        status,
    })
}

fn row_to_booking(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let start_str: String = row.get(4)?;
    let end_str: String = row.get(5)?;

    Ok(Booking {
        id: row.get(0)?,
        created_at: parse_timestamp(&row.get::<_, String>(1)?),
        bike_id: row.get(2)?,
        booking_number: row.get(3)?,
        start_date: parse_date(4, &start_str)?,
        end_date: parse_date(5, &end_str)?,
        notes: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MaintenanceProgress;
    use crate::seed::demo_fleet;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn now() -> DateTime<Utc> {
        "2025-11-10T10:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory();
        assert!(storage.is_ok());
        assert_eq!(storage.unwrap().path(), Path::new(":memory:"));
    }

    #[test]
    fn test_load_empty_database() {
        let storage = create_test_storage();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut storage = create_test_storage();
        let fleet = demo_fleet();

        assert!(storage.save(&fleet).unwrap());
        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded, fleet);
    }

    #[test]
    fn test_save_empty_fleet_is_distinct_from_nothing_saved() {
        let mut storage = create_test_storage();
        storage.save(&Fleet::default()).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, Some(Fleet::default()));
    }

    #[test]
    fn test_unchanged_snapshot_is_skipped() {
        let mut storage = create_test_storage();
        let mut fleet = demo_fleet();

        assert!(storage.save(&fleet).unwrap());
        assert!(!storage.save(&fleet).unwrap());

        fleet.add_task_type("True wheel");
        assert!(storage.save(&fleet).unwrap());
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let mut storage = create_test_storage();
        let mut fleet = demo_fleet();
        storage.save(&fleet).unwrap();

        fleet.delete_bike("bike-1").unwrap();
        storage.save(&fleet).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.bikes().len(), 3);
        assert!(loaded.bike("bike-1").is_none());
        assert!(loaded.bookings().iter().all(|b| b.bike_id != "bike-1"));
    }

    #[test]
    fn test_order_and_details_survive() {
        let mut storage = create_test_storage();
        let mut fleet = demo_fleet();
        let id = fleet.start_maintenance("bike-4", now()).unwrap().id.clone();
        fleet
            .record_progress(
                &id,
                MaintenanceProgress {
                    add_tasks: vec!["Replace chain".into(), "Adjust gears".into()],
                    workshop_notes: Some("Chain stretched.".into()),
                    conclude: true,
                    ..MaintenanceProgress::default()
                },
                now(),
            )
            .unwrap();
        storage.save(&fleet).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        let record = &loaded.maintenance()[0];
        assert_eq!(record.id, id);
        assert_eq!(record.tasks, ["Replace chain", "Adjust gears"]);
        assert_eq!(record.workshop_notes, "Chain stretched.");
        assert_eq!(record.resolved_date, Some(now().date_naive()));
        assert_eq!(record.status, MaintenanceStatus::Resolved);
    }

    #[test]
    fn test_stats() {
        let mut storage = create_test_storage();
        let stats = storage.stats().unwrap();
        assert_eq!(stats.bikes, 0);
        assert!(stats.last_saved.is_none());
        assert_eq!(stats.schema_version, migrations::CURRENT_VERSION);

        let fleet = demo_fleet();
        storage.save(&fleet).unwrap();
        let stats = storage.stats().unwrap();
        assert_eq!(stats.bikes, 4);
        assert_eq!(stats.maintenance_records, 2);
        assert_eq!(stats.bookings, 4);
        assert_eq!(stats.task_types, 6);
        assert!(stats.last_saved.is_some());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let mut storage = create_test_storage();
        storage.save(&demo_fleet()).unwrap();
        storage
            .conn
            .execute(
                "UPDATE bikes SET size = 'XXL', status = 'stolen' WHERE id = 'bike-1'",
                [],
            )
            .unwrap();

        let loaded = storage.load().unwrap().unwrap();
        let bike = loaded.bike("bike-1").unwrap();
        assert_eq!(bike.size, BikeSize::M);
        assert_eq!(bike.status, BikeStatus::Available);
    }

    #[test]
    fn test_malformed_date_is_an_error() {
        let mut storage = create_test_storage();
        storage.save(&demo_fleet()).unwrap();
        storage
            .conn
            .execute(
                "UPDATE bookings SET start_date = '17/11/2025' WHERE id = 'book-1'",
                [],
            )
            .unwrap();

        assert!(storage.load().is_err());
    }

    #[test]
    fn test_snapshot_hash_is_stable() {
        let fleet = demo_fleet();
        assert_eq!(snapshot_hash(&fleet).unwrap(), snapshot_hash(&fleet).unwrap());
        assert_ne!(
            snapshot_hash(&fleet).unwrap(),
            snapshot_hash(&Fleet::default()).unwrap()
        );
    }

    #[test]
    fn test_export_import_json() {
        let fleet = demo_fleet();
        let json = export_json(&fleet).unwrap();
        assert!(json.contains("\"ref_no\": \"M42\""));

        let imported = import_json(&json).unwrap();
        assert_eq!(imported, fleet);
    }

    #[test]
    fn test_import_rejects_orphans() {
        let fleet = demo_fleet();
        let orphaned = Fleet::from_parts(
            Vec::new(),
            Vec::new(),
            fleet.bookings().to_vec(),
            Vec::new(),
        );
        let json = export_json(&orphaned).unwrap();

        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unknown bike"));
    }

    fn document(
        fleet: &Fleet,
        edit: impl FnOnce(
            &mut Vec<Bike>,
            &mut Vec<MaintenanceRecord>,
            &mut Vec<Booking>,
            &mut Vec<String>,
        ),
    ) -> String {
        let mut bikes = fleet.bikes().to_vec();
        let mut maintenance = fleet.maintenance().to_vec();
        let mut bookings = fleet.bookings().to_vec();
        let mut task_types = fleet.task_types().to_vec();
        edit(&mut bikes, &mut maintenance, &mut bookings, &mut task_types);
        export_json(&Fleet::from_parts(bikes, maintenance, bookings, task_types)).unwrap()
    }

    #[test]
    fn test_import_rejects_overlapping_bookings() {
        let json = document(&demo_fleet(), |_, _, bookings, _| {
            let mut copy = bookings[0].clone();
            copy.id = "book-9".into();
            copy.booking_number = "R-009".into();
            bookings.push(copy);
        });

        let err = import_json(&json).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_import_rejects_duplicate_ids() {
        let fleet = demo_fleet();

        let json = document(&fleet, |bikes, _, _, _| bikes.push(bikes[0].clone()));
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("duplicate bike id bike-1"));

        let json = document(&fleet, |_, maintenance, _, _| {
            maintenance.push(maintenance[0].clone());
        });
        assert!(matches!(import_json(&json), Err(Error::Validation { .. })));

        let json = document(&fleet, |_, _, bookings, _| {
            let mut copy = bookings[0].clone();
            copy.bike_id = "bike-3".into();
            bookings.push(copy);
        });
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("duplicate booking id book-1"));
    }

    #[test]
    fn test_import_normalizes_task_catalog() {
        let json = document(&demo_fleet(), |_, maintenance, _, task_types| {
            *task_types = vec!["Zeta".into(), " Alpha ".into(), "Alpha".into(), String::new()];
            maintenance[0].tasks = vec!["Adjust brakes".into(), "Adjust brakes".into()];
        });

        let imported = import_json(&json).unwrap();
        assert_eq!(imported.task_types(), ["Alpha", "Zeta"]);
        assert_eq!(imported.maintenance()[0].tasks, ["Adjust brakes"]);

        let mut storage = create_test_storage();
        assert!(storage.save(&imported).unwrap());
        assert_eq!(storage.load().unwrap(), Some(imported));
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(import_json("{ not json"), Err(Error::Json(_))));
    }
}
