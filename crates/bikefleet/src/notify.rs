//! Overdue maintenance notifications.

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::fleet::Fleet;
use crate::model::{Bike, MaintenanceRecord};

/// Days a record may stay pending before it is flagged.
pub const DEFAULT_OVERDUE_DAYS: i64 = 7;

/// A pending maintenance record that has been open too long.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueMaintenance<'a> {
    /// The pending record.
    pub record: &'a MaintenanceRecord,
    /// The bike it belongs to.
    pub bike: &'a Bike,
    /// Whole days since the fault was reported.
    pub days_overdue: i64,
}

impl OverdueMaintenance<'_> {
    /// Human-readable notice.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "{}: maintenance pending for {} days",
            self.bike.label(),
            self.days_overdue
        )
    }
}

/// Whole days elapsed between the start of `reported` (UTC) and `now`.
#[must_use]
pub fn days_open(record: &MaintenanceRecord, now: DateTime<Utc>) -> i64 {
    let reported = record.reported_date.and_time(NaiveTime::MIN).and_utc();
    (now - reported).num_days()
}

/// Pending records open for more than `threshold` days, longest first.
///
/// Records whose bike no longer exists are skipped.
#[must_use]
pub fn overdue_maintenance(
    fleet: &Fleet,
    now: DateTime<Utc>,
    threshold: i64,
) -> Vec<OverdueMaintenance<'_>> {
    let mut overdue: Vec<OverdueMaintenance<'_>> = fleet
        .maintenance()
        .iter()
        .filter(|record| record.is_pending())
        .filter_map(|record| {
            let days_overdue = days_open(record, now);
            if days_overdue <= threshold {
                return None;
            }
            let bike = fleet.bike(&record.bike_id)?;
            Some(OverdueMaintenance {
                record,
                bike,
                days_overdue,
            })
        })
        .collect();
    overdue.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));
    overdue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MaintenanceProgress;
    use crate::seed::demo_fleet;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_demo_record_is_overdue() {
        let fleet = demo_fleet();
        let found = overdue_maintenance(&fleet, at("2023-10-28T12:00:00Z"), 7);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record.id, "maint-1");
        assert_eq!(found[0].bike.ref_no, "M88");
        assert_eq!(found[0].days_overdue, 8);
        assert_eq!(
            found[0].message(),
            "Trek Marlin 5 (Ref: M88): maintenance pending for 8 days"
        );
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let fleet = demo_fleet();
        // Exactly seven whole days after 2023-10-20.
        assert!(overdue_maintenance(&fleet, at("2023-10-27T23:59:59Z"), 7).is_empty());
        assert_eq!(
            overdue_maintenance(&fleet, at("2023-10-28T00:00:00Z"), 7).len(),
            1
        );
    }

    #[test]
    fn test_resolved_records_are_ignored() {
        let mut fleet = demo_fleet();
        let now = at("2025-11-10T10:00:00Z");
        fleet
            .record_progress(
                "maint-1",
                MaintenanceProgress {
                    conclude: true,
                    ..MaintenanceProgress::default()
                },
                now,
            )
            .unwrap();
        assert!(overdue_maintenance(&fleet, now, DEFAULT_OVERDUE_DAYS).is_empty());
    }

    #[test]
    fn test_missing_bike_is_skipped() {
        let fleet = demo_fleet();
        let orphaned = Fleet::from_parts(
            Vec::new(),
            fleet.maintenance().to_vec(),
            Vec::new(),
            fleet.task_types().to_vec(),
        );
        assert!(overdue_maintenance(&orphaned, at("2025-11-10T10:00:00Z"), 7).is_empty());
    }

    #[test]
    fn test_sorted_longest_first() {
        let mut fleet = demo_fleet();
        fleet
            .start_maintenance("bike-1", at("2025-11-01T09:00:00Z"))
            .unwrap();
        let found = overdue_maintenance(&fleet, at("2025-11-20T09:00:00Z"), 7);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].record.id, "maint-1");
        assert_eq!(found[1].bike.id, "bike-1");
        assert_eq!(found[1].days_overdue, 19);
        assert!(found[0].days_overdue > found[1].days_overdue);
    }

    #[test]
    fn test_fresh_record_is_not_overdue() {
        let mut fleet = demo_fleet();
        let now = at("2025-11-10T10:00:00Z");
        fleet.start_maintenance("bike-4", now).unwrap();
        let found = overdue_maintenance(&fleet, now, 7);
        assert!(found.iter().all(|o| o.bike.id != "bike-4"));
    }
}
