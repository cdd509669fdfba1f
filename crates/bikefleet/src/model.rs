//! Core record types for bikefleet.
//!
//! This module defines the inventory, maintenance and booking records the
//! fleet is made of, together with the input structs used to create and
//! change them.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Frame size of a bike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BikeSize {
    /// Small.
    S,
    /// Medium.
    M,
    /// Large.
    L,
    /// Extra large.
    XL,
}

impl BikeSize {
    /// All sizes, smallest first.
    pub const ALL: [Self; 4] = [Self::S, Self::M, Self::L, Self::XL];
}

impl std::fmt::Display for BikeSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::S => write!(f, "S"),
            Self::M => write!(f, "M"),
            Self::L => write!(f, "L"),
            Self::XL => write!(f, "XL"),
        }
    }
}

impl FromStr for BikeSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Self::S),
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            "XL" => Ok(Self::XL),
            other => Err(Error::validation(format!("unknown bike size: {other}"))),
        }
    }
}

/// Whether a bike can be rented right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BikeStatus {
    /// Ready to rent.
    #[default]
    Available,
    /// Out with a customer.
    Rented,
    /// In the workshop.
    Maintenance,
}

impl std::fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Rented => write!(f, "rented"),
            Self::Maintenance => write!(f, "maintenance"),
        }
    }
}

impl FromStr for BikeStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "rented" => Ok(Self::Rented),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(Error::validation(format!("unknown bike status: {other}"))),
        }
    }
}

/// Lifecycle of a maintenance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    /// Reported, not yet fixed.
    #[default]
    Pending,
    /// Work concluded.
    Resolved,
}

impl std::fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

impl FromStr for MaintenanceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            other => Err(Error::validation(format!(
                "unknown maintenance status: {other}"
            ))),
        }
    }
}

/// An inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bike {
    /// Unique identifier (`bike-…`).
    pub id: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Reference painted on the frame, e.g. `M42`.
    pub ref_no: String,
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Frame size.
    pub size: BikeSize,
    /// Current status.
    pub status: BikeStatus,
    /// Date the bike joined the fleet.
    pub entry_date: NaiveDate,
    /// Picture of the bike (URL, path or data URL).
    pub image_url: String,
}

impl Bike {
    /// Short human label, e.g. `Trek Marlin 5 (Ref: M88)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {} (Ref: {})", self.brand, self.model, self.ref_no)
    }
}

/// A reported issue or routine-service entry for one bike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    /// Unique identifier (`maint-…`).
    pub id: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// The bike this record belongs to.
    pub bike_id: String,
    /// What was reported.
    pub description: String,
    /// Workshop task labels, in the order they were added.
    pub tasks: Vec<String>,
    /// Free-text notes from the workshop.
    #[serde(default)]
    pub workshop_notes: String,
    /// Day the issue was reported.
    pub reported_date: NaiveDate,
    /// Day the work was concluded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_date: Option<NaiveDate>,
    /// Pending or resolved.
    pub status: MaintenanceStatus,
}

impl MaintenanceRecord {
    /// Check if the record still needs work.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == MaintenanceStatus::Pending
    }
}

/// A reserved, inclusive date range for one bike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier (`bk-…`).
    pub id: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// The booked bike.
    pub bike_id: String,
    /// Customer-facing booking number, e.g. `BK-2025-004`.
    pub booking_number: String,
    /// First booked day.
    pub start_date: NaiveDate,
    /// Last booked day.
    pub end_date: NaiveDate,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl Booking {
    /// The booked period.
    #[must_use]
    pub fn range(&self) -> crate::range::DateRange {
        crate::range::DateRange::new(self.start_date, self.end_date)
    }
}

/// Fields for a new bike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBike {
    /// Reference number.
    pub ref_no: String,
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Frame size.
    pub size: BikeSize,
    /// Date the bike joined the fleet.
    pub entry_date: NaiveDate,
    /// Picture; a placeholder is used when absent.
    pub image_url: Option<String>,
}

/// Changes to an existing bike. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BikeUpdate {
    /// New reference number.
    pub ref_no: Option<String>,
    /// New manufacturer.
    pub brand: Option<String>,
    /// New model name.
    pub model: Option<String>,
    /// New frame size.
    pub size: Option<BikeSize>,
    /// New entry date.
    pub entry_date: Option<NaiveDate>,
    /// New status.
    pub status: Option<BikeStatus>,
    /// New picture.
    pub image_url: Option<String>,
}

/// Fields for a new booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// The bike to book.
    pub bike_id: String,
    /// Booking number; generated when absent.
    pub booking_number: Option<String>,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Free-text notes.
    pub notes: String,
}

/// Changes to an existing booking. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingUpdate {
    /// New booking number.
    pub booking_number: Option<String>,
    /// New first day.
    pub start_date: Option<NaiveDate>,
    /// New last day.
    pub end_date: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
}

/// Workshop progress on a maintenance record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceProgress {
    /// Tasks to append; already-present tasks are skipped.
    pub add_tasks: Vec<String>,
    /// Tasks to drop.
    pub remove_tasks: Vec<String>,
    /// Replacement workshop notes.
    pub workshop_notes: Option<String>,
    /// Mark the record resolved.
    pub conclude: bool,
}

/// Generate a fresh record identifier with the given prefix.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

/// Placeholder picture for bikes added without one.
#[must_use]
pub fn placeholder_image_url(now: DateTime<Utc>) -> String {
    format!(
        "https://picsum.photos/seed/bike{}/400/300",
        now.timestamp_millis()
    )
}
