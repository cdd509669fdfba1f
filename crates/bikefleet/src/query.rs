//! Inventory and booking filters.
//!
//! Filters borrow from a [`Fleet`] and return references in display order.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::fleet::Fleet;
use crate::model::{Bike, BikeSize, BikeStatus, Booking};
use crate::range::DateRange;

/// Criteria for the inventory list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BikeFilter {
    /// Exact status. Ignored while `available` is set.
    pub status: Option<BikeStatus>,
    /// Exact size.
    pub size: Option<BikeSize>,
    /// Exact brand.
    pub brand: Option<String>,
    /// Exact model.
    pub model: Option<String>,
    /// Only bikes that can be rented for every day of this range.
    pub available: Option<DateRange>,
}

impl BikeFilter {
    /// Check a single bike against the filter.
    #[must_use]
    pub fn matches(&self, bike: &Bike, bookings: &[Booking]) -> bool {
        if let Some(range) = &self.available {
            if bike.status == BikeStatus::Maintenance {
                return false;
            }
            let booked = bookings
                .iter()
                .any(|b| b.bike_id == bike.id && b.range().overlaps(range));
            if booked {
                return false;
            }
        } else if self.status.is_some_and(|s| s != bike.status) {
            return false;
        }
        if self.size.is_some_and(|s| s != bike.size) {
            return false;
        }
        if self.brand.as_ref().is_some_and(|b| *b != bike.brand) {
            return false;
        }
        if self.model.as_ref().is_some_and(|m| *m != bike.model) {
            return false;
        }
        true
    }

    /// Matching bikes, most recently added first.
    #[must_use]
    pub fn apply<'a>(&self, fleet: &'a Fleet) -> Vec<&'a Bike> {
        let mut bikes: Vec<&Bike> = fleet
            .bikes()
            .iter()
            .filter(|bike| self.matches(bike, fleet.bookings()))
            .collect();
        bikes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bikes
    }
}

/// Criteria for the booking list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// Case-insensitive substring of the booking number.
    pub number: Option<String>,
    /// Drop bookings that end before this day.
    pub from: Option<NaiveDate>,
    /// Drop bookings that start after this day.
    pub to: Option<NaiveDate>,
    /// Brand of the booked bike.
    pub brand: Option<String>,
    /// Model of the booked bike.
    pub model: Option<String>,
    /// Size of the booked bike.
    pub size: Option<BikeSize>,
}

impl BookingFilter {
    /// Check a single booking against the filter.
    ///
    /// Bookings whose bike is gone never match.
    #[must_use]
    pub fn matches(&self, booking: &Booking, bike: Option<&Bike>) -> bool {
        if let Some(number) = &self.number {
            if !booking
                .booking_number
                .to_lowercase()
                .contains(&number.to_lowercase())
            {
                return false;
            }
        }
        let Some(bike) = bike else {
            return false;
        };
        if self.brand.as_ref().is_some_and(|b| *b != bike.brand) {
            return false;
        }
        if self.model.as_ref().is_some_and(|m| *m != bike.model) {
            return false;
        }
        if self.size.is_some_and(|s| s != bike.size) {
            return false;
        }
        if self.from.is_some_and(|from| booking.end_date < from) {
            return false;
        }
        if self.to.is_some_and(|to| booking.start_date > to) {
            return false;
        }
        true
    }

    /// Matching bookings, earliest start first.
    #[must_use]
    pub fn apply<'a>(&self, fleet: &'a Fleet) -> Vec<&'a Booking> {
        let mut bookings: Vec<&Booking> = fleet
            .bookings()
            .iter()
            .filter(|b| self.matches(b, fleet.bike(&b.bike_id)))
            .collect();
        bookings.sort_by_key(|b| b.start_date);
        bookings
    }
}

/// Distinct brands in the inventory, sorted.
#[must_use]
pub fn brands(fleet: &Fleet) -> Vec<&str> {
    distinct(fleet.bikes().iter().map(|b| b.brand.as_str()))
}

/// Distinct models in the inventory, sorted.
#[must_use]
pub fn models(fleet: &Fleet) -> Vec<&str> {
    distinct(fleet.bikes().iter().map(|b| b.model.as_str()))
}

/// Distinct models of one brand, sorted; every model when `brand` is `None`.
#[must_use]
pub fn models_for_brand<'a>(fleet: &'a Fleet, brand: Option<&str>) -> Vec<&'a str> {
    match brand {
        None => models(fleet),
        Some(brand) => distinct(
            fleet
                .bikes()
                .iter()
                .filter(|b| b.brand == brand)
                .map(|b| b.model.as_str()),
        ),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values.collect::<BTreeSet<_>>().into_iter().collect()
}
