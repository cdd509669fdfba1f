//! Whole-day date ranges and the range picker.
//!
//! Bookings, availability filters and calendar views all reason about
//! inclusive ranges of calendar days. Times of day never matter here.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of day cells in a month view (six weeks).
pub const MONTH_GRID_DAYS: usize = 42;

/// An inclusive range of calendar days with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, swapping the endpoints if they are reversed.
    #[must_use]
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A one-day range.
    #[must_use]
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// First day.
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Check whether `day` falls inside the range.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Check whether the two ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Number of days covered, endpoints included.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Two-click range picker.
///
/// The first click picks the start. The second click completes the range,
/// swapping endpoints when it lands before the start. A click on a complete
/// range starts over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeSelection {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl RangeSelection {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill the picker with an existing range, as when editing a booking.
    #[must_use]
    pub fn from_range(range: DateRange) -> Self {
        Self {
            start: Some(range.start),
            end: Some(range.end),
        }
    }

    /// Register a click on `day`.
    pub fn click(&mut self, day: NaiveDate) {
        match (self.start, self.end) {
            (Some(start), None) => {
                if day < start {
                    self.end = Some(start);
                    self.start = Some(day);
                } else {
                    self.end = Some(day);
                }
            }
            _ => {
                self.start = Some(day);
                self.end = None;
            }
        }
    }

    /// The chosen start, if any.
    #[must_use]
    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// The chosen end, if any.
    #[must_use]
    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Check whether both endpoints have been chosen.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// The selected range, once complete.
    #[must_use]
    pub fn range(&self) -> Option<DateRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)),
            _ => None,
        }
    }

    /// The range that would result from clicking `hover` next.
    ///
    /// Only meaningful while the start is chosen and the end is not.
    #[must_use]
    pub fn preview(&self, hover: NaiveDate) -> Option<DateRange> {
        match (self.start, self.end) {
            (Some(start), None) => Some(DateRange::new(start, hover)),
            _ => None,
        }
    }

    /// Check whether `day` is one of the chosen endpoints.
    #[must_use]
    pub fn is_edge(&self, day: NaiveDate) -> bool {
        self.start == Some(day) || self.end == Some(day)
    }

    /// Check whether `day` lies strictly between the endpoints.
    #[must_use]
    pub fn in_interior(&self, day: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start < day && day < end,
            _ => false,
        }
    }

    /// Forget both endpoints.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// First day of the given month.
///
/// # Errors
///
/// Returns a validation error if `month` is not in `1..=12` or the year is
/// out of range.
pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::validation(format!("invalid month: {year}-{month:02}")))
}

/// The days shown in a month view.
///
/// Six full weeks starting on the Sunday on or before the first of the
/// month, so leading and trailing days belong to neighbouring months.
///
/// # Errors
///
/// Returns a validation error for an invalid month.
pub fn month_grid(year: i32, month: u32) -> Result<Vec<NaiveDate>> {
    let first = first_of_month(year, month)?;
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let grid_start = first
        .checked_sub_days(Days::new(lead))
        .ok_or_else(|| Error::validation(format!("month out of range: {year}-{month:02}")))?;
    let days: Vec<NaiveDate> = grid_start.iter_days().take(MONTH_GRID_DAYS).collect();
    if days.len() == MONTH_GRID_DAYS {
        Ok(days)
    } else {
        Err(Error::validation(format!(
            "month out of range: {year}-{month:02}"
        )))
    }
}

/// Move `delta` months forward (or back, when negative).
#[must_use]
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + i32::try_from(month).unwrap_or(1) - 1 + delta;
    let new_month = u32::try_from(index.rem_euclid(12)).unwrap_or(0) + 1;
    (index.div_euclid(12), new_month)
}

/// Parse a `YYYY-MM` month argument.
///
/// # Errors
///
/// Returns a validation error when the text is not a valid month.
pub fn parse_month(text: &str) -> Result<(i32, u32)> {
    let invalid = || Error::validation(format!("expected YYYY-MM, got '{text}'"));
    let (year, month) = text.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    first_of_month(year, month)?;
    Ok((year, month))
}
