//! Month views over bookings.

use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;

use crate::error::Result;
use crate::model::{Bike, Booking};
use crate::range::month_grid;

/// Short weekday labels, Sunday first, matching [`month_grid`].
pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Bookings whose range contains `day`.
#[must_use]
pub fn bookings_on<'a>(bookings: &[&'a Booking], day: NaiveDate) -> Vec<&'a Booking> {
    bookings
        .iter()
        .copied()
        .filter(|b| b.range().contains(day))
        .collect()
}

/// Booked models on `day` with their counts, in first-seen order.
///
/// Bookings whose bike is unknown are skipped.
#[must_use]
pub fn model_counts<'a>(
    bookings: &[&Booking],
    bikes: &'a [Bike],
    day: NaiveDate,
) -> Vec<(&'a str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for booking in bookings_on(bookings, day) {
        let Some(bike) = bikes.iter().find(|b| b.id == booking.bike_id) else {
            continue;
        };
        match counts.iter_mut().find(|(model, _)| *model == bike.model) {
            Some((_, n)) => *n += 1,
            None => counts.push((bike.model.as_str(), 1)),
        }
    }
    counts
}

/// One-line summary such as `Explorer (2); Rockhopper (1)`.
///
/// Empty when nothing is booked that day.
#[must_use]
pub fn day_summary(bookings: &[&Booking], bikes: &[Bike], day: NaiveDate) -> String {
    model_counts(bookings, bikes, day)
        .iter()
        .map(|(model, n)| format!("{model} ({n})"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single cell of a month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    /// The day.
    pub date: NaiveDate,
    /// Whether the day belongs to the month being shown.
    pub in_month: bool,
    /// Whether the day is today.
    pub is_today: bool,
    /// Number of bookings covering the day.
    pub booked: usize,
    /// Booked models, see [`day_summary`].
    pub summary: String,
}

/// Six weeks of day cells around one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    /// Year shown.
    pub year: i32,
    /// Month shown, 1-based.
    pub month: u32,
    /// 42 cells, Sunday first.
    pub days: Vec<DayCell>,
}

impl MonthView {
    /// Build the view for a month from any subset of bookings.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid month.
    pub fn build(
        year: i32,
        month: u32,
        today: NaiveDate,
        bookings: &[&Booking],
        bikes: &[Bike],
    ) -> Result<Self> {
        let days = month_grid(year, month)?
            .into_iter()
            .map(|date| DayCell {
                date,
                in_month: date.month() == month,
                is_today: date == today,
                booked: bookings_on(bookings, date).len(),
                summary: day_summary(bookings, bikes, date),
            })
            .collect();
        Ok(Self { year, month, days })
    }

    /// Heading such as `November 2025`.
    #[must_use]
    pub fn title(&self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("?", |m| m.name());
        format!("{name} {}", self.year)
    }

    /// The cells grouped into weeks.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.days.chunks(7)
    }
}
