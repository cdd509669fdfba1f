//! Fleet state and every operation that changes it.
//!
//! A [`Fleet`] is the complete in-memory state of the tracker: bikes,
//! their maintenance records and bookings, plus the catalog of workshop
//! task labels. Storage loads and saves it as a whole; nothing in here
//! touches the disk.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{
    new_id, placeholder_image_url, Bike, BikeStatus, BikeUpdate, Booking, BookingUpdate,
    MaintenanceProgress, MaintenanceRecord, MaintenanceStatus, NewBike, NewBooking,
};
use crate::range::DateRange;

/// Task labels offered by the workshop out of the box.
pub const DEFAULT_TASK_TYPES: &[&str] = &[
    "Replace rear tyre",
    "Replace front tyre",
    "Replace inner tube",
    "Replace chain",
    "Adjust brakes",
    "Adjust gears",
];

/// Description used for maintenance started by the workshop itself.
pub const ROUTINE_MAINTENANCE_DESCRIPTION: &str = "Routine maintenance started by the workshop.";

/// Optional rule that reference numbers must match.
#[derive(Debug, Clone, Default)]
pub struct RefNoPolicy(Option<Regex>);

impl RefNoPolicy {
    /// Build a policy from an optional regex pattern.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the pattern does not compile.
    pub fn from_pattern(pattern: Option<&str>) -> Result<Self> {
        pattern
            .map(|p| {
                Regex::new(p).map_err(|e| Error::validation(format!("invalid ref_no pattern: {e}")))
            })
            .transpose()
            .map(Self)
    }

    /// Check a reference number against the policy.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the pattern does not match.
    pub fn check(&self, ref_no: &str) -> Result<()> {
        match &self.0 {
            Some(re) if !re.is_match(ref_no) => Err(Error::validation(format!(
                "reference '{ref_no}' does not match pattern {}",
                re.as_str()
            ))),
            _ => Ok(()),
        }
    }
}

impl PartialEq for RefNoPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_ref().map(Regex::as_str) == other.0.as_ref().map(Regex::as_str)
    }
}

/// The complete tracker state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    bikes: Vec<Bike>,
    maintenance: Vec<MaintenanceRecord>,
    bookings: Vec<Booking>,
    task_types: Vec<String>,
    #[serde(skip)]
    ref_no_policy: RefNoPolicy,
}

impl Fleet {
    /// An empty fleet with the given task catalog.
    #[must_use]
    pub fn new<I, S>(task_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fleet = Self::default();
        for task in task_types {
            let task: String = task.into();
            fleet.add_task_type(&task);
        }
        fleet
    }

    /// An empty fleet with [`DEFAULT_TASK_TYPES`].
    #[must_use]
    pub fn with_default_tasks() -> Self {
        Self::new(DEFAULT_TASK_TYPES.iter().copied())
    }

    /// Assemble a fleet from stored parts, as the storage layer does.
    #[must_use]
    pub fn from_parts(
        bikes: Vec<Bike>,
        maintenance: Vec<MaintenanceRecord>,
        bookings: Vec<Booking>,
        task_types: Vec<String>,
    ) -> Self {
        Self {
            bikes,
            maintenance,
            bookings,
            task_types,
            ref_no_policy: RefNoPolicy::default(),
        }
    }

    /// Install the reference-number rule applied on add and edit.
    pub fn set_ref_no_policy(&mut self, policy: RefNoPolicy) {
        self.ref_no_policy = policy;
    }

    /// All bikes, most recently added first.
    #[must_use]
    pub fn bikes(&self) -> &[Bike] {
        &self.bikes
    }

    /// All maintenance records, most recently created first.
    #[must_use]
    pub fn maintenance(&self) -> &[MaintenanceRecord] {
        &self.maintenance
    }

    /// All bookings, most recently created first.
    #[must_use]
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// The workshop task catalog, sorted.
    #[must_use]
    pub fn task_types(&self) -> &[String] {
        &self.task_types
    }

    /// Look up a bike.
    #[must_use]
    pub fn bike(&self, id: &str) -> Option<&Bike> {
        self.bikes.iter().find(|b| b.id == id)
    }

    /// Look up a maintenance record.
    #[must_use]
    pub fn maintenance_record(&self, id: &str) -> Option<&MaintenanceRecord> {
        self.maintenance.iter().find(|m| m.id == id)
    }

    /// Look up a booking.
    #[must_use]
    pub fn booking(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    fn bike_index(&self, id: &str) -> Result<usize> {
        self.bikes
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| Error::bike_not_found(id))
    }

    // === Bikes ===

    /// Add a bike to the inventory. New bikes start out available.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank reference, brand or model, or
    /// a reference that breaks the configured policy.
    pub fn add_bike(&mut self, new: NewBike, now: DateTime<Utc>) -> Result<&Bike> {
        let ref_no = required("ref_no", &new.ref_no)?;
        self.ref_no_policy.check(&ref_no)?;
        let bike = Bike {
            id: new_id("bike"),
            created_at: now,
            ref_no,
            brand: required("brand", &new.brand)?,
            model: required("model", &new.model)?,
            size: new.size,
            status: BikeStatus::Available,
            entry_date: new.entry_date,
            image_url: new
                .image_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| placeholder_image_url(now)),
        };
        info!("Added bike {} ({})", bike.id, bike.label());
        self.bikes.insert(0, bike);
        Ok(&self.bikes[0])
    }

    /// Edit a bike.
    ///
    /// # Errors
    ///
    /// Returns `BikeNotFound` for an unknown ID and a validation error for
    /// blank or policy-breaking values.
    pub fn update_bike(&mut self, id: &str, update: BikeUpdate) -> Result<&Bike> {
        let index = self.bike_index(id)?;
        let ref_no = update.ref_no.as_deref().map(|r| required("ref_no", r)).transpose()?;
        if let Some(ref_no) = &ref_no {
            self.ref_no_policy.check(ref_no)?;
        }
        let brand = update.brand.as_deref().map(|b| required("brand", b)).transpose()?;
        let model = update.model.as_deref().map(|m| required("model", m)).transpose()?;

        let bike = &mut self.bikes[index];
        if let Some(ref_no) = ref_no {
            bike.ref_no = ref_no;
        }
        if let Some(brand) = brand {
            bike.brand = brand;
        }
        if let Some(model) = model {
            bike.model = model;
        }
        if let Some(size) = update.size {
            bike.size = size;
        }
        if let Some(entry_date) = update.entry_date {
            bike.entry_date = entry_date;
        }
        if let Some(status) = update.status {
            bike.status = status;
        }
        if let Some(url) = update.image_url.filter(|u| !u.trim().is_empty()) {
            bike.image_url = url;
        }
        info!("Updated bike {}", bike.id);
        Ok(&self.bikes[index])
    }

    /// Remove a bike together with its maintenance records and bookings.
    ///
    /// # Errors
    ///
    /// Returns `BikeNotFound` for an unknown ID.
    pub fn delete_bike(&mut self, id: &str) -> Result<Bike> {
        let index = self.bike_index(id)?;
        let bike = self.bikes.remove(index);

        let records_before = self.maintenance.len();
        self.maintenance.retain(|m| m.bike_id != bike.id);
        let bookings_before = self.bookings.len();
        self.bookings.retain(|b| b.bike_id != bike.id);

        info!(
            "Deleted bike {} with {} maintenance records and {} bookings",
            bike.id,
            records_before - self.maintenance.len(),
            bookings_before - self.bookings.len()
        );
        Ok(bike)
    }

    // === Maintenance ===

    /// Record a fault reported for a bike.
    ///
    /// The bike keeps its current status until the workshop takes it in.
    ///
    /// # Errors
    ///
    /// Returns `BikeNotFound` for an unknown bike and a validation error for
    /// an empty description.
    pub fn report_fault(
        &mut self,
        bike_id: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<&MaintenanceRecord> {
        self.bike_index(bike_id)?;
        let description = required("description", description)?;
        self.push_record(bike_id, description, now);
        info!("Reported fault on bike {bike_id}");
        Ok(&self.maintenance[0])
    }

    /// Take a bike into the workshop.
    ///
    /// Opens a pending routine record and marks the bike as in maintenance.
    ///
    /// # Errors
    ///
    /// Returns `BikeNotFound` for an unknown bike.
    pub fn start_maintenance(
        &mut self,
        bike_id: &str,
        now: DateTime<Utc>,
    ) -> Result<&MaintenanceRecord> {
        let index = self.bike_index(bike_id)?;
        self.bikes[index].status = BikeStatus::Maintenance;
        self.push_record(bike_id, ROUTINE_MAINTENANCE_DESCRIPTION.to_string(), now);
        info!("Started maintenance on bike {bike_id}");
        Ok(&self.maintenance[0])
    }

    fn push_record(&mut self, bike_id: &str, description: String, now: DateTime<Utc>) {
        let record = MaintenanceRecord {
            id: new_id("maint"),
            created_at: now,
            bike_id: bike_id.to_string(),
            description,
            tasks: Vec::new(),
            workshop_notes: String::new(),
            reported_date: now.date_naive(),
            resolved_date: None,
            status: MaintenanceStatus::Pending,
        };
        debug!("New maintenance record {}", record.id);
        self.maintenance.insert(0, record);
    }

    /// Save workshop progress on a record, optionally concluding it.
    ///
    /// Concluding the last pending record of a bike makes the bike
    /// available again.
    ///
    /// # Errors
    ///
    /// Returns `MaintenanceNotFound` for an unknown record, `AlreadyResolved`
    /// when concluding a resolved record, and a validation error for a task
    /// that is not in the catalog.
    pub fn record_progress(
        &mut self,
        record_id: &str,
        progress: MaintenanceProgress,
        now: DateTime<Utc>,
    ) -> Result<&MaintenanceRecord> {
        let index = self
            .maintenance
            .iter()
            .position(|m| m.id == record_id)
            .ok_or_else(|| Error::maintenance_not_found(record_id))?;

        if progress.conclude && !self.maintenance[index].is_pending() {
            return Err(Error::AlreadyResolved {
                id: record_id.to_string(),
            });
        }
        for task in &progress.add_tasks {
            if !self.task_types.iter().any(|t| t == task.trim()) {
                return Err(Error::validation(format!("unknown task type: {task}")));
            }
        }

        let record = &mut self.maintenance[index];
        for task in progress.add_tasks {
            let task = task.trim().to_string();
            if !record.tasks.contains(&task) {
                record.tasks.push(task);
            }
        }
        record
            .tasks
            .retain(|t| !progress.remove_tasks.iter().any(|r| r.trim() == t));
        if let Some(notes) = progress.workshop_notes {
            record.workshop_notes = notes;
        }

        if progress.conclude {
            record.status = MaintenanceStatus::Resolved;
            record.resolved_date = Some(now.date_naive());
            let bike_id = record.bike_id.clone();
            info!("Resolved maintenance record {record_id}");

            let other_pending = self
                .maintenance
                .iter()
                .any(|m| m.bike_id == bike_id && m.id != record_id && m.is_pending());
            if other_pending {
                debug!("Bike {bike_id} still has pending maintenance");
            } else if let Some(bike) = self.bikes.iter_mut().find(|b| b.id == bike_id) {
                bike.status = BikeStatus::Available;
                info!("Bike {bike_id} is available again");
            }
        }
        Ok(&self.maintenance[index])
    }

    /// Maintenance history of a bike, most recently reported first.
    #[must_use]
    pub fn maintenance_history(&self, bike_id: &str) -> Vec<&MaintenanceRecord> {
        let mut records: Vec<&MaintenanceRecord> = self
            .maintenance
            .iter()
            .filter(|m| m.bike_id == bike_id)
            .collect();
        records.sort_by(|a, b| b.reported_date.cmp(&a.reported_date));
        records
    }

    // === Task catalog ===

    /// Add a task label to the catalog.
    ///
    /// Returns `false` when the label is blank or already present.
    pub fn add_task_type(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.task_types.iter().any(|t| t == name) {
            return false;
        }
        self.task_types.push(name.to_string());
        self.task_types.sort();
        true
    }

    /// Remove a task label from the catalog.
    ///
    /// Records that already list the task keep it.
    pub fn remove_task_type(&mut self, name: &str) -> bool {
        let before = self.task_types.len();
        self.task_types.retain(|t| t != name.trim());
        before != self.task_types.len()
    }

    // === Bookings ===

    /// The booking number suggested for the next booking.
    #[must_use]
    pub fn next_booking_number(&self, today: NaiveDate) -> String {
        format!("BK-{}-{:03}", today.year(), self.bookings.len() + 1)
    }

    /// Find a booking of `bike_id` that overlaps `range`, ignoring `exclude`.
    #[must_use]
    pub fn conflicting_booking(
        &self,
        bike_id: &str,
        range: &DateRange,
        exclude: Option<&str>,
    ) -> Option<&Booking> {
        self.bookings.iter().find(|b| {
            b.bike_id == bike_id && Some(b.id.as_str()) != exclude && b.range().overlaps(range)
        })
    }

    fn ensure_free(&self, bike_id: &str, range: &DateRange, exclude: Option<&str>) -> Result<()> {
        match self.conflicting_booking(bike_id, range, exclude) {
            Some(other) => Err(Error::BookingConflict {
                bike_id: bike_id.to_string(),
                booking_number: other.booking_number.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Book a bike for a range of days.
    ///
    /// # Errors
    ///
    /// Returns `BikeNotFound` for an unknown bike and `BookingConflict` when
    /// the bike is already booked on any of the days.
    pub fn add_booking(&mut self, new: NewBooking, now: DateTime<Utc>) -> Result<&Booking> {
        self.bike_index(&new.bike_id)?;
        let range = DateRange::new(new.start_date, new.end_date);
        self.ensure_free(&new.bike_id, &range, None)?;

        let booking_number = match new.booking_number.as_deref().map(str::trim) {
            Some(number) if !number.is_empty() => number.to_string(),
            _ => self.next_booking_number(now.date_naive()),
        };
        let booking = Booking {
            id: new_id("bk"),
            created_at: now,
            bike_id: new.bike_id,
            booking_number,
            start_date: range.start(),
            end_date: range.end(),
            notes: new.notes,
        };
        info!(
            "Booked bike {} for {} as {}",
            booking.bike_id, range, booking.booking_number
        );
        self.bookings.insert(0, booking);
        Ok(&self.bookings[0])
    }

    /// Edit a booking.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` for an unknown booking, a validation error
    /// for a blank booking number, and `BookingConflict` when the new dates
    /// collide with another booking of the same bike.
    pub fn update_booking(&mut self, id: &str, update: BookingUpdate) -> Result<&Booking> {
        let index = self
            .bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| Error::booking_not_found(id))?;
        let current = &self.bookings[index];
        let range = DateRange::new(
            update.start_date.unwrap_or(current.start_date),
            update.end_date.unwrap_or(current.end_date),
        );
        self.ensure_free(&current.bike_id, &range, Some(id))?;
        let booking_number = update
            .booking_number
            .as_deref()
            .map(|n| required("booking_number", n))
            .transpose()?;

        let booking = &mut self.bookings[index];
        booking.start_date = range.start();
        booking.end_date = range.end();
        if let Some(number) = booking_number {
            booking.booking_number = number;
        }
        if let Some(notes) = update.notes {
            booking.notes = notes;
        }
        info!("Updated booking {}", booking.id);
        Ok(&self.bookings[index])
    }

    /// Cancel a booking.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` for an unknown booking.
    pub fn delete_booking(&mut self, id: &str) -> Result<Booking> {
        let index = self
            .bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| Error::booking_not_found(id))?;
        let booking = self.bookings.remove(index);
        info!("Deleted booking {} ({})", booking.id, booking.booking_number);
        Ok(booking)
    }

    /// Bookings of a bike, earliest start first.
    #[must_use]
    pub fn bike_bookings(&self, bike_id: &str) -> Vec<&Booking> {
        let mut bookings: Vec<&Booking> = self
            .bookings
            .iter()
            .filter(|b| b.bike_id == bike_id)
            .collect();
        bookings.sort_by_key(|b| b.start_date);
        bookings
    }

    /// Check whether a bike is booked on `day`, ignoring `exclude`.
    #[must_use]
    pub fn is_day_booked(&self, bike_id: &str, day: NaiveDate, exclude: Option<&str>) -> bool {
        self.conflicting_booking(bike_id, &DateRange::single(day), exclude)
            .is_some()
    }

    /// The days among `days` on which the picker must refuse a click.
    #[must_use]
    pub fn booked_days(
        &self,
        bike_id: &str,
        exclude: Option<&str>,
        days: &[NaiveDate],
    ) -> Vec<NaiveDate> {
        days.iter()
            .copied()
            .filter(|day| self.is_day_booked(bike_id, *day, exclude))
            .collect()
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::validation(format!("{field} must not be empty")))
    } else {
        Ok(value.to_string())
    }
}
