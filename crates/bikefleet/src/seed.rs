//! Demo data for a fresh store.
//!
//! Loaded the first time the tracker runs against an empty database so
//! there is something to look at.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::fleet::{Fleet, DEFAULT_TASK_TYPES};
use crate::model::{Bike, BikeSize, BikeStatus, Booking, MaintenanceRecord, MaintenanceStatus};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn stamp(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn bike(
    n: u32,
    ref_no: &str,
    brand: &str,
    model: &str,
    size: BikeSize,
    status: BikeStatus,
    entry_date: NaiveDate,
) -> Bike {
    Bike {
        id: format!("bike-{n}"),
        created_at: stamp(entry_date),
        ref_no: ref_no.to_string(),
        brand: brand.to_string(),
        model: model.to_string(),
        size,
        status,
        entry_date,
        image_url: format!("https://picsum.photos/seed/bike-{n}/400/300"),
    }
}

fn booking(
    n: u32,
    bike_id: &str,
    number: &str,
    start: NaiveDate,
    end: NaiveDate,
    notes: &str,
) -> Booking {
    Booking {
        id: format!("book-{n}"),
        created_at: stamp(start),
        bike_id: bike_id.to_string(),
        booking_number: number.to_string(),
        start_date: start,
        end_date: end,
        notes: notes.to_string(),
    }
}

/// Four bikes, two maintenance records and four bookings, with the default
/// task catalog.
#[must_use]
pub fn demo_fleet() -> Fleet {
    demo_fleet_with_tasks(DEFAULT_TASK_TYPES.iter().copied())
}

/// The demo fleet with the given task catalog.
///
/// Tasks listed on the demo records are added to the catalog when missing.
#[must_use]
pub fn demo_fleet_with_tasks<I, S>(task_types: I) -> Fleet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let bikes = vec![
        bike(1, "M42", "Caloi", "Explorer", BikeSize::M, BikeStatus::Available, day(2023, 1, 15)),
        bike(2, "L16", "Specialized", "Rockhopper", BikeSize::L, BikeStatus::Rented, day(2023, 2, 20)),
        bike(3, "M88", "Trek", "Marlin 5", BikeSize::M, BikeStatus::Maintenance, day(2023, 3, 10)),
        bike(4, "S05", "Scott", "Aspect 960", BikeSize::S, BikeStatus::Available, day(2023, 4, 1)),
    ];

    let maintenance = vec![
        MaintenanceRecord {
            id: "maint-1".to_string(),
            created_at: stamp(day(2023, 10, 20)),
            bike_id: "bike-3".to_string(),
            description: "Rear brake not biting.".to_string(),
            tasks: vec!["Adjust brakes".to_string()],
            workshop_notes: "Pads worn, replacement done.".to_string(),
            reported_date: day(2023, 10, 20),
            resolved_date: None,
            status: MaintenanceStatus::Pending,
        },
        MaintenanceRecord {
            id: "maint-2".to_string(),
            created_at: stamp(day(2023, 10, 15)),
            bike_id: "bike-2".to_string(),
            description: "Flat tyre.".to_string(),
            tasks: vec![
                "Replace front tyre".to_string(),
                "Replace inner tube".to_string(),
            ],
            workshop_notes: "Front tyre and inner tube replaced.".to_string(),
            reported_date: day(2023, 10, 15),
            resolved_date: Some(day(2023, 10, 16)),
            status: MaintenanceStatus::Resolved,
        },
    ];

    let bookings = vec![
        booking(1, "bike-2", "R-001", day(2025, 11, 17), day(2025, 11, 19), "Frequent customer."),
        booking(2, "bike-1", "R-002", day(2025, 11, 22), day(2025, 11, 24), ""),
        booking(3, "bike-4", "R-003", day(2025, 11, 7), day(2025, 11, 9), "Asked for a gel saddle."),
        booking(4, "bike-1", "R-004", day(2025, 11, 27), day(2025, 11, 29), ""),
    ];

    let mut catalog = Fleet::new(task_types);
    for task in maintenance.iter().flat_map(|m| &m.tasks) {
        catalog.add_task_type(task);
    }
    let task_types = catalog.task_types().to_vec();
    Fleet::from_parts(bikes, maintenance, bookings, task_types)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_fleet_shape() {
        let fleet = demo_fleet();
        assert_eq!(fleet.bikes().len(), 4);
        assert_eq!(fleet.maintenance().len(), 2);
        assert_eq!(fleet.bookings().len(), 4);
        assert!(!fleet.task_types().is_empty());
    }

    #[test]
    fn test_demo_references_are_consistent() {
        let fleet = demo_fleet();
        for record in fleet.maintenance() {
            assert!(fleet.bike(&record.bike_id).is_some());
            for task in &record.tasks {
                assert!(fleet.task_types().contains(task));
            }
        }
        for booking in fleet.bookings() {
            assert!(fleet.bike(&booking.bike_id).is_some());
            assert!(booking.start_date <= booking.end_date);
        }
    }

    #[test]
    fn test_demo_bookings_do_not_collide() {
        let fleet = demo_fleet();
        for booking in fleet.bookings() {
            assert!(fleet
                .conflicting_booking(&booking.bike_id, &booking.range(), Some(&booking.id))
                .is_none());
        }
    }

    #[test]
    fn test_configured_catalog_is_kept() {
        let fleet = demo_fleet_with_tasks(["Only this"]);
        assert!(fleet.task_types().iter().any(|t| t == "Only this"));
        assert!(!fleet.task_types().iter().any(|t| t == "Adjust gears"));
        for record in fleet.maintenance() {
            for task in &record.tasks {
                assert!(fleet.task_types().contains(task));
            }
        }
        assert_eq!(
            fleet.task_types(),
            ["Adjust brakes", "Only this", "Replace front tyre", "Replace inner tube"]
        );
    }

    #[test]
    fn test_created_at_follows_entry_date() {
        let fleet = demo_fleet();
        let bike = fleet.bike("bike-4").unwrap();
        assert_eq!(bike.created_at.date_naive(), bike.entry_date);
    }
}
