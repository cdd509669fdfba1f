//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands and how their
//! arguments map onto the library's filters and inputs.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::model::{
    BikeSize, BikeStatus, BikeUpdate, BookingUpdate, MaintenanceProgress, NewBike, NewBooking,
};
use crate::query::{BikeFilter, BookingFilter};
use crate::range::DateRange;

/// Inventory commands.
#[derive(Debug, Subcommand)]
pub enum BikeCommand {
    /// List bikes, newest first
    List(BikeListArgs),

    /// Show one bike with its maintenance and bookings
    Show {
        /// Bike ID
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add a bike to the fleet
    Add(BikeAddArgs),

    /// Edit a bike
    Edit(BikeEditArgs),

    /// Delete a bike with its maintenance records and bookings
    Delete {
        /// Bike ID
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List the brands in the fleet
    Brands,

    /// List the models in the fleet
    Models {
        /// Only models of this brand
        #[arg(short, long)]
        brand: Option<String>,
    },
}

/// Arguments of `bike list`.
#[derive(Debug, Default, Args)]
pub struct BikeListArgs {
    /// Filter by status (ignored with --available-from)
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Filter by size
    #[arg(long, value_enum)]
    pub size: Option<SizeArg>,

    /// Filter by brand
    #[arg(long)]
    pub brand: Option<String>,

    /// Filter by model
    #[arg(long)]
    pub model: Option<String>,

    /// Only bikes free from this day (YYYY-MM-DD)
    #[arg(long, requires = "available_to", value_name = "DATE")]
    pub available_from: Option<NaiveDate>,

    /// Only bikes free until this day (YYYY-MM-DD)
    #[arg(long, requires = "available_from", value_name = "DATE")]
    pub available_to: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl BikeListArgs {
    /// The inventory filter these arguments describe.
    #[must_use]
    pub fn filter(&self) -> BikeFilter {
        BikeFilter {
            status: self.status.map(Into::into),
            size: self.size.map(Into::into),
            brand: self.brand.clone(),
            model: self.model.clone(),
            available: self
                .available_from
                .zip(self.available_to)
                .map(|(from, to)| DateRange::new(from, to)),
        }
    }
}

/// Arguments of `bike add`.
#[derive(Debug, Args)]
pub struct BikeAddArgs {
    /// Reference number painted on the frame
    #[arg(long)]
    pub ref_no: String,

    /// Manufacturer
    #[arg(long)]
    pub brand: String,

    /// Model name
    #[arg(long)]
    pub model: String,

    /// Frame size
    #[arg(long, value_enum)]
    pub size: SizeArg,

    /// Day the bike joined the fleet (defaults to today)
    #[arg(long, value_name = "DATE")]
    pub entry_date: Option<NaiveDate>,

    /// Picture URL (a placeholder is used when absent)
    #[arg(long)]
    pub image_url: Option<String>,
}

impl BikeAddArgs {
    /// The new-bike input, with `today` as the default entry date.
    #[must_use]
    pub fn to_new_bike(&self, today: NaiveDate) -> NewBike {
        NewBike {
            ref_no: self.ref_no.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            size: self.size.into(),
            entry_date: self.entry_date.unwrap_or(today),
            image_url: self.image_url.clone(),
        }
    }
}

/// Arguments of `bike edit`.
#[derive(Debug, Args)]
pub struct BikeEditArgs {
    /// Bike ID
    pub id: String,

    /// New reference number
    #[arg(long)]
    pub ref_no: Option<String>,

    /// New manufacturer
    #[arg(long)]
    pub brand: Option<String>,

    /// New model name
    #[arg(long)]
    pub model: Option<String>,

    /// New frame size
    #[arg(long, value_enum)]
    pub size: Option<SizeArg>,

    /// New status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// New entry date
    #[arg(long, value_name = "DATE")]
    pub entry_date: Option<NaiveDate>,

    /// New picture URL
    #[arg(long)]
    pub image_url: Option<String>,
}

impl BikeEditArgs {
    /// The changes these arguments describe.
    #[must_use]
    pub fn to_update(&self) -> BikeUpdate {
        BikeUpdate {
            ref_no: self.ref_no.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            size: self.size.map(Into::into),
            entry_date: self.entry_date,
            status: self.status.map(Into::into),
            image_url: self.image_url.clone(),
        }
    }
}

/// Maintenance commands.
#[derive(Debug, Subcommand)]
pub enum MaintenanceCommand {
    /// Report a fault on a bike
    Report {
        /// Bike ID
        bike: String,

        /// What is wrong
        description: String,
    },

    /// Take a bike into the workshop
    Start {
        /// Bike ID
        bike: String,
    },

    /// Record workshop progress on a maintenance record
    Update(MaintenanceUpdateArgs),

    /// List maintenance records, newest first
    List {
        /// Only pending records
        #[arg(short, long)]
        pending: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the maintenance history of a bike
    History {
        /// Bike ID
        bike: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Arguments of `maintenance update`.
#[derive(Debug, Args)]
pub struct MaintenanceUpdateArgs {
    /// Maintenance record ID
    pub record: String,

    /// Add a task from the catalog (repeatable)
    #[arg(long = "add-task", value_name = "TASK")]
    pub add_tasks: Vec<String>,

    /// Remove a task (repeatable)
    #[arg(long = "remove-task", value_name = "TASK")]
    pub remove_tasks: Vec<String>,

    /// Replace the workshop notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Mark the record resolved
    #[arg(long)]
    pub conclude: bool,
}

impl MaintenanceUpdateArgs {
    /// The progress these arguments describe.
    #[must_use]
    pub fn to_progress(&self) -> MaintenanceProgress {
        MaintenanceProgress {
            add_tasks: self.add_tasks.clone(),
            remove_tasks: self.remove_tasks.clone(),
            workshop_notes: self.notes.clone(),
            conclude: self.conclude,
        }
    }
}

/// Task catalog commands.
#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List the task catalog
    List,

    /// Add a task to the catalog
    Add {
        /// Task label
        name: String,
    },

    /// Remove a task from the catalog
    Remove {
        /// Task label
        name: String,
    },
}

/// Booking commands.
#[derive(Debug, Subcommand)]
pub enum BookingCommand {
    /// List bookings, earliest start first
    List(BookingListArgs),

    /// Book a bike
    Add(BookingAddArgs),

    /// Edit a booking
    Edit(BookingEditArgs),

    /// Delete a booking
    Delete {
        /// Booking ID
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show which days of a month a bike is already booked
    Days {
        /// Bike ID
        bike: String,

        /// Month to inspect (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Booking ID to ignore, e.g. the one being edited
        #[arg(long)]
        exclude: Option<String>,
    },
}

/// Arguments of `booking list`.
#[derive(Debug, Default, Args)]
pub struct BookingListArgs {
    /// Booking number contains this text (case-insensitive)
    #[arg(short, long)]
    pub number: Option<String>,

    /// Drop bookings ending before this day
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Drop bookings starting after this day
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Brand of the booked bike
    #[arg(long)]
    pub brand: Option<String>,

    /// Model of the booked bike
    #[arg(long)]
    pub model: Option<String>,

    /// Size of the booked bike
    #[arg(long, value_enum)]
    pub size: Option<SizeArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl BookingListArgs {
    /// The booking filter these arguments describe.
    #[must_use]
    pub fn filter(&self) -> BookingFilter {
        BookingFilter {
            number: self.number.clone(),
            from: self.from,
            to: self.to,
            brand: self.brand.clone(),
            model: self.model.clone(),
            size: self.size.map(Into::into),
        }
    }
}

/// Arguments of `booking add`.
#[derive(Debug, Args)]
pub struct BookingAddArgs {
    /// Bike ID
    pub bike: String,

    /// First day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: NaiveDate,

    /// Last day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: NaiveDate,

    /// Booking number (generated when absent)
    #[arg(short, long)]
    pub number: Option<String>,

    /// Free-text notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl BookingAddArgs {
    /// The new-booking input.
    #[must_use]
    pub fn to_new_booking(&self) -> NewBooking {
        NewBooking {
            bike_id: self.bike.clone(),
            booking_number: self.number.clone(),
            start_date: self.from,
            end_date: self.to,
            notes: self.notes.clone(),
        }
    }
}

/// Arguments of `booking edit`.
#[derive(Debug, Args)]
pub struct BookingEditArgs {
    /// Booking ID
    pub id: String,

    /// New booking number
    #[arg(short, long)]
    pub number: Option<String>,

    /// New first day
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// New last day
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// New notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl BookingEditArgs {
    /// The changes these arguments describe.
    #[must_use]
    pub fn to_update(&self) -> BookingUpdate {
        BookingUpdate {
            booking_number: self.number.clone(),
            start_date: self.from,
            end_date: self.to,
            notes: self.notes.clone(),
        }
    }
}

/// Calendar command arguments.
#[derive(Debug, Args)]
pub struct CalendarCommand {
    /// Month to show (YYYY-MM, defaults to the current month)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Only bookings of this bike
    #[arg(short, long)]
    pub bike: Option<String>,

    /// List the bookings of one day instead of the month grid
    #[arg(short, long, value_name = "DATE")]
    pub day: Option<NaiveDate>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Notifications command arguments.
#[derive(Debug, Args)]
pub struct NotificationsCommand {
    /// Override the overdue threshold in days
    #[arg(short, long)]
    pub threshold: Option<u32>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Write to this file instead of stdout
    pub file: Option<PathBuf>,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON document produced by `export`
    pub file: PathBuf,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Bike size argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SizeArg {
    /// Small
    #[value(alias = "S")]
    S,
    /// Medium
    #[value(alias = "M")]
    M,
    /// Large
    #[value(alias = "L")]
    L,
    /// Extra large
    #[value(alias = "XL")]
    Xl,
}

impl From<SizeArg> for BikeSize {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::S => Self::S,
            SizeArg::M => Self::M,
            SizeArg::L => Self::L,
            SizeArg::Xl => Self::XL,
        }
    }
}

/// Bike status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Ready to rent
    Available,
    /// Out with a customer
    Rented,
    /// In the workshop
    Maintenance,
}

impl From<StatusArg> for BikeStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Available => Self::Available,
            StatusArg::Rented => Self::Rented,
            StatusArg::Maintenance => Self::Maintenance,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
