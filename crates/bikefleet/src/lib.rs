//! `bikefleet` - Inventory, maintenance and booking tracker for a bicycle-rental fleet
//!
//! The library holds the whole tracker state in a [`Fleet`], offers filters,
//! calendar views and overdue-maintenance notifications over it, and persists
//! it wholesale to a local `SQLite` database through [`Storage`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod fleet;
pub mod logging;
pub mod model;
pub mod notify;
pub mod query;
pub mod range;
pub mod seed;
pub mod storage;

pub use calendar::{DayCell, MonthView};
pub use config::Config;
pub use error::{Error, Result};
pub use fleet::{Fleet, RefNoPolicy};
pub use logging::init_logging;
pub use model::{
    Bike, BikeSize, BikeStatus, Booking, MaintenanceRecord, MaintenanceStatus, NewBike, NewBooking,
};
pub use notify::{overdue_maintenance, OverdueMaintenance};
pub use query::{BikeFilter, BookingFilter};
pub use range::{DateRange, RangeSelection};
pub use seed::{demo_fleet, demo_fleet_with_tasks};
pub use storage::{Storage, StorageStats};
