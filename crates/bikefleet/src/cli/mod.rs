//! Command-line interface for bikefleet.
//!
//! This module provides the CLI structure for the `fleet` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BikeAddArgs, BikeCommand, BikeEditArgs, BikeListArgs, BookingAddArgs, BookingCommand,
    BookingEditArgs, BookingListArgs, CalendarCommand, ConfigCommand, ExportCommand,
    ImportCommand, MaintenanceCommand, MaintenanceUpdateArgs, NotificationsCommand, OutputFormat,
    SizeArg, StatusArg, StatusCommand, TasksCommand,
};

/// fleet - Keep track of a bicycle-rental fleet
///
/// Manages the bike inventory, workshop maintenance and the booking calendar
/// of a rental shop. All state lives in a local `SQLite` database.
#[derive(Debug, Parser)]
#[command(name = "fleet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the bike inventory
    #[command(subcommand)]
    Bike(BikeCommand),

    /// Report faults and record workshop work
    #[command(subcommand)]
    Maintenance(MaintenanceCommand),

    /// Manage the workshop task catalog
    #[command(subcommand)]
    Tasks(TasksCommand),

    /// Manage bookings
    #[command(subcommand)]
    Booking(BookingCommand),

    /// Show the booking calendar
    Calendar(CalendarCommand),

    /// Show overdue maintenance
    Notifications(NotificationsCommand),

    /// Show fleet and database status
    Status(StatusCommand),

    /// Export the whole fleet as JSON
    Export(ExportCommand),

    /// Replace the fleet with an exported JSON document
    Import(ImportCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    use crate::logging::Verbosity;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "fleet");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["fleet", "status"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["fleet", "-v", "status"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["fleet", "-vv", "status"]).verbosity(), Verbosity::Debug);
        assert_eq!(parse(&["fleet", "-q", "status"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["fleet", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_bike_list_with_availability() {
        let cli = parse(&[
            "fleet",
            "bike",
            "list",
            "--size",
            "m",
            "--available-from",
            "2025-11-18",
            "--available-to",
            "2025-11-23",
        ]);
        let Command::Bike(BikeCommand::List(args)) = cli.command else {
            panic!("expected bike list");
        };
        assert_eq!(args.size, Some(SizeArg::M));
        assert!(args.filter().available.is_some());
        assert_eq!(args.format, OutputFormat::Table);
    }

    #[test]
    fn test_availability_needs_both_ends() {
        let result = Cli::try_parse_from(["fleet", "bike", "list", "--available-from", "2025-11-18"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let result = Cli::try_parse_from([
            "fleet", "booking", "add", "bike-1", "--from", "18/11/2025", "--to", "2025-11-20",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_bike_add() {
        let cli = parse(&[
            "fleet", "bike", "add", "--ref-no", "M42", "--brand", "Caloi", "--model", "Explorer",
            "--size", "xl",
        ]);
        let Command::Bike(BikeCommand::Add(args)) = cli.command else {
            panic!("expected bike add");
        };
        assert_eq!(args.ref_no, "M42");
        assert_eq!(args.size, SizeArg::Xl);
        assert!(args.entry_date.is_none());
    }

    #[test]
    fn test_parse_bike_delete_requires_id() {
        assert!(Cli::try_parse_from(["fleet", "bike", "delete"]).is_err());
        let cli = parse(&["fleet", "bike", "delete", "bike-1", "--yes"]);
        assert!(matches!(
            cli.command,
            Command::Bike(BikeCommand::Delete { yes: true, .. })
        ));
    }

    #[test]
    fn test_parse_maintenance_update() {
        let cli = parse(&[
            "fleet",
            "maintenance",
            "update",
            "maint-1",
            "--add-task",
            "Adjust brakes",
            "--add-task",
            "Replace chain",
            "--conclude",
        ]);
        let Command::Maintenance(MaintenanceCommand::Update(args)) = cli.command else {
            panic!("expected maintenance update");
        };
        assert_eq!(args.add_tasks, ["Adjust brakes", "Replace chain"]);
        assert!(args.conclude);
    }

    #[test]
    fn test_parse_booking_add() {
        let cli = parse(&[
            "fleet", "booking", "add", "bike-1", "--from", "2025-11-18", "--to", "2025-11-20",
            "--number", "R-010",
        ]);
        let Command::Booking(BookingCommand::Add(args)) = cli.command else {
            panic!("expected booking add");
        };
        let new = args.to_new_booking();
        assert_eq!(new.booking_number.as_deref(), Some("R-010"));
        assert_eq!(new.notes, "");
    }

    #[test]
    fn test_parse_calendar() {
        let cli = parse(&["fleet", "calendar", "--month", "2025-11", "--bike", "bike-1"]);
        let Command::Calendar(args) = cli.command else {
            panic!("expected calendar");
        };
        assert_eq!(args.month.as_deref(), Some("2025-11"));
        assert_eq!(args.bike.as_deref(), Some("bike-1"));
        assert!(args.day.is_none());
    }

    #[test]
    fn test_parse_tasks_and_notifications() {
        assert!(matches!(
            parse(&["fleet", "tasks", "add", "True wheel"]).command,
            Command::Tasks(TasksCommand::Add { .. })
        ));
        assert!(matches!(
            parse(&["fleet", "notifications", "--threshold", "3"]).command,
            Command::Notifications(NotificationsCommand {
                threshold: Some(3),
                ..
            })
        ));
    }

    #[test]
    fn test_parse_export_import() {
        assert!(matches!(
            parse(&["fleet", "export"]).command,
            Command::Export(ExportCommand { file: None })
        ));
        assert!(Cli::try_parse_from(["fleet", "import"]).is_err());
    }
}
