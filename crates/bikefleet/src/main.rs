//! `fleet` - CLI for bikefleet
//!
//! This binary provides the command-line interface for managing the bike
//! inventory, maintenance and bookings of a rental shop.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::Parser;
use tracing::{debug, info};

use bikefleet::calendar::{self, MonthView, WEEKDAYS};
use bikefleet::cli::{
    BikeCommand, BookingCommand, CalendarCommand, Cli, Command, ConfigCommand, MaintenanceCommand,
    NotificationsCommand, OutputFormat, TasksCommand,
};
use bikefleet::model::{Bike, Booking, MaintenanceRecord};
use bikefleet::notify::overdue_maintenance;
use bikefleet::query::{brands, models_for_brand};
use bikefleet::range::{month_grid, parse_month};
use bikefleet::storage::{export_json, import_json};
use bikefleet::{demo_fleet_with_tasks, init_logging, Config, Fleet, Storage};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => run(&config, command),
    }
}

/// Load the fleet, run one command against it and save the result.
fn run(config: &Config, command: Command) -> Result<()> {
    let db_path = config.database_path();
    let mut storage = Storage::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    let mut fleet = load_fleet(&storage, config)?;
    fleet.set_ref_no_policy(config.ref_no_policy()?);

    let now = Utc::now();
    let out = Printer {
        date_format: &config.display.date_format,
    };

    match command {
        Command::Bike(cmd) => handle_bike(&mut fleet, cmd, now, &out)?,
        Command::Maintenance(cmd) => handle_maintenance(&mut fleet, cmd, now, &out)?,
        Command::Tasks(cmd) => handle_tasks(&mut fleet, cmd),
        Command::Booking(cmd) => handle_booking(&mut fleet, cmd, now, &out)?,
        Command::Calendar(cmd) => handle_calendar(&fleet, &cmd, now, &out)?,
        Command::Notifications(cmd) => handle_notifications(&fleet, config, &cmd, now)?,
        Command::Export(cmd) => handle_export(&fleet, cmd.file.as_deref())?,
        Command::Import(cmd) => {
            if !cmd.yes {
                println!("This will replace the whole fleet with {}.", cmd.file.display());
                println!("Use --yes to confirm.");
                return Ok(());
            }
            let json = std::fs::read_to_string(&cmd.file)
                .with_context(|| format!("failed to read {}", cmd.file.display()))?;
            let mut imported = import_json(&json)?;
            imported.set_ref_no_policy(config.ref_no_policy()?);
            fleet = imported;
            println!(
                "Imported {} bikes, {} maintenance records, {} bookings.",
                fleet.bikes().len(),
                fleet.maintenance().len(),
                fleet.bookings().len()
            );
        }
        Command::Status(cmd) => {
            storage.save(&fleet)?;
            return handle_status(&storage, &fleet, config, cmd.json, now);
        }
        Command::Config(cmd) => return handle_config(config, cmd),
    }

    if storage.save(&fleet)? {
        debug!("Fleet saved to {}", storage.path().display());
    }
    Ok(())
}

fn load_fleet(storage: &Storage, config: &Config) -> Result<Fleet> {
    if let Some(fleet) = storage.load()? {
        return Ok(fleet);
    }
    if config.storage.seed_demo_data {
        info!("Empty database, loading demo fleet");
        Ok(demo_fleet_with_tasks(
            config.maintenance.task_types.iter().cloned(),
        ))
    } else {
        Ok(Fleet::new(config.maintenance.task_types.iter().cloned()))
    }
}

/// Formats dates the way the configuration asks.
#[derive(Debug)]
struct Printer<'a> {
    date_format: &'a str,
}

impl Printer<'_> {
    fn date(&self, date: NaiveDate) -> String {
        date.format(self.date_format).to_string()
    }

    fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn bikes(&self, bikes: &[&Bike], format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => return Self::json(bikes),
            OutputFormat::Table => {
                println!(
                    "{:<38} {:<8} {:<14} {:<14} {:<4} {:<12} {}",
                    "ID", "REF", "BRAND", "MODEL", "SIZE", "STATUS", "ENTRY"
                );
                for bike in bikes {
                    println!(
                        "{:<38} {:<8} {:<14} {:<14} {:<4} {:<12} {}",
                        bike.id,
                        bike.ref_no,
                        bike.brand,
                        bike.model,
                        bike.size.to_string(),
                        bike.status.to_string(),
                        self.date(bike.entry_date)
                    );
                }
            }
            OutputFormat::Plain => {
                for bike in bikes {
                    println!("{}  {}  {}  {}", bike.id, bike.label(), bike.size, bike.status);
                }
            }
        }
        if bikes.is_empty() && format != OutputFormat::Json {
            println!("No bikes found.");
        }
        Ok(())
    }

    fn bookings(&self, fleet: &Fleet, bookings: &[&Booking], format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => return Self::json(bookings),
            OutputFormat::Table => {
                println!(
                    "{:<38} {:<12} {:<30} {:<23} {}",
                    "ID", "NUMBER", "BIKE", "DATES", "NOTES"
                );
                for booking in bookings {
                    println!(
                        "{:<38} {:<12} {:<30} {:<23} {}",
                        booking.id,
                        booking.booking_number,
                        bike_label(fleet, &booking.bike_id),
                        self.period(booking),
                        booking.notes
                    );
                }
            }
            OutputFormat::Plain => {
                for booking in bookings {
                    println!(
                        "{}  {}  {}  {}",
                        booking.id,
                        booking.booking_number,
                        bike_label(fleet, &booking.bike_id),
                        self.period(booking)
                    );
                }
            }
        }
        if bookings.is_empty() && format != OutputFormat::Json {
            println!("No bookings found.");
        }
        Ok(())
    }

    fn period(&self, booking: &Booking) -> String {
        format!(
            "{} - {}",
            self.date(booking.start_date),
            self.date(booking.end_date)
        )
    }

    fn records(
        &self,
        fleet: &Fleet,
        records: &[&MaintenanceRecord],
        format: OutputFormat,
    ) -> Result<()> {
        if format == OutputFormat::Json {
            return Self::json(records);
        }
        if records.is_empty() {
            println!("No maintenance records found.");
            return Ok(());
        }
        for record in records {
            let resolved = record
                .resolved_date
                .map_or_else(String::new, |d| format!(" -> {}", self.date(d)));
            println!(
                "{}  [{}]  {}{}  {}",
                record.id,
                record.status,
                self.date(record.reported_date),
                resolved,
                bike_label(fleet, &record.bike_id)
            );
            println!("    {}", record.description);
            if format == OutputFormat::Table {
                if !record.tasks.is_empty() {
                    println!("    Tasks: {}", record.tasks.join(", "));
                }
                if !record.workshop_notes.is_empty() {
                    println!("    Notes: {}", record.workshop_notes);
                }
            }
        }
        Ok(())
    }
}

fn bike_label(fleet: &Fleet, bike_id: &str) -> String {
    fleet
        .bike(bike_id)
        .map_or_else(|| format!("<unknown bike {bike_id}>"), Bike::label)
}

fn handle_bike(
    fleet: &mut Fleet,
    cmd: BikeCommand,
    now: DateTime<Utc>,
    out: &Printer<'_>,
) -> Result<()> {
    match cmd {
        BikeCommand::List(args) => {
            let bikes = args.filter().apply(fleet);
            out.bikes(&bikes, args.format)?;
        }
        BikeCommand::Show { id, json } => {
            let bike = fleet
                .bike(&id)
                .ok_or_else(|| bikefleet::Error::bike_not_found(&id))?;
            let history = fleet.maintenance_history(&id);
            let bookings = fleet.bike_bookings(&id);
            if json {
                Printer::json(&serde_json::json!({
                    "bike": bike,
                    "maintenance": history,
                    "bookings": bookings,
                }))?;
            } else {
                println!("{}", bike.label());
                println!("{}", "-".repeat(bike.label().len()));
                println!("ID:         {}", bike.id);
                println!("Size:       {}", bike.size);
                println!("Status:     {}", bike.status);
                println!("Entry date: {}", out.date(bike.entry_date));
                println!("Image:      {}", bike.image_url);
                println!();
                println!("Maintenance:");
                out.records(fleet, &history, OutputFormat::Plain)?;
                println!();
                println!("Bookings:");
                out.bookings(fleet, &bookings, OutputFormat::Plain)?;
            }
        }
        BikeCommand::Add(args) => {
            let bike = fleet.add_bike(args.to_new_bike(now.date_naive()), now)?;
            println!("Added {} as {}", bike.label(), bike.id);
        }
        BikeCommand::Edit(args) => {
            let bike = fleet.update_bike(&args.id, args.to_update())?;
            println!("Updated {}", bike.label());
        }
        BikeCommand::Delete { id, yes } => {
            let bike = fleet
                .bike(&id)
                .ok_or_else(|| bikefleet::Error::bike_not_found(&id))?;
            if !yes {
                let records = fleet.maintenance_history(&id).len();
                let bookings = fleet.bike_bookings(&id).len();
                println!(
                    "This will delete {} with {records} maintenance records and {bookings} bookings.",
                    bike.label()
                );
                println!("Use --yes to confirm.");
                return Ok(());
            }
            let bike = fleet.delete_bike(&id)?;
            println!("Deleted {}", bike.label());
        }
        BikeCommand::Brands => {
            for brand in brands(fleet) {
                println!("{brand}");
            }
        }
        BikeCommand::Models { brand } => {
            for model in models_for_brand(fleet, brand.as_deref()) {
                println!("{model}");
            }
        }
    }
    Ok(())
}

fn handle_maintenance(
    fleet: &mut Fleet,
    cmd: MaintenanceCommand,
    now: DateTime<Utc>,
    out: &Printer<'_>,
) -> Result<()> {
    match cmd {
        MaintenanceCommand::Report { bike, description } => {
            let record = fleet.report_fault(&bike, &description, now)?;
            println!("Reported fault {} on bike {}", record.id, record.bike_id);
        }
        MaintenanceCommand::Start { bike } => {
            let record = fleet.start_maintenance(&bike, now)?;
            println!("Bike {} is in maintenance ({})", record.bike_id, record.id);
        }
        MaintenanceCommand::Update(args) => {
            let record = fleet.record_progress(&args.record, args.to_progress(), now)?;
            if record.is_pending() {
                println!("Saved progress on {}", record.id);
            } else {
                println!("Concluded {}", record.id);
            }
        }
        MaintenanceCommand::List { pending, format } => {
            let mut records: Vec<&MaintenanceRecord> = fleet
                .maintenance()
                .iter()
                .filter(|m| !pending || m.is_pending())
                .collect();
            records.sort_by(|a, b| b.reported_date.cmp(&a.reported_date));
            out.records(fleet, &records, format)?;
        }
        MaintenanceCommand::History { bike, format } => {
            if fleet.bike(&bike).is_none() {
                return Err(bikefleet::Error::bike_not_found(&bike).into());
            }
            out.records(fleet, &fleet.maintenance_history(&bike), format)?;
        }
    }
    Ok(())
}

fn handle_tasks(fleet: &mut Fleet, cmd: TasksCommand) {
    match cmd {
        TasksCommand::List => {
            for task in fleet.task_types() {
                println!("{task}");
            }
        }
        TasksCommand::Add { name } => {
            if fleet.add_task_type(&name) {
                println!("Added task '{}'", name.trim());
            } else {
                println!("Task '{}' is blank or already listed", name.trim());
            }
        }
        TasksCommand::Remove { name } => {
            if fleet.remove_task_type(&name) {
                println!("Removed task '{name}'");
            } else {
                println!("No task named '{name}'");
            }
        }
    }
}

fn handle_booking(
    fleet: &mut Fleet,
    cmd: BookingCommand,
    now: DateTime<Utc>,
    out: &Printer<'_>,
) -> Result<()> {
    match cmd {
        BookingCommand::List(args) => {
            let bookings = args.filter().apply(fleet);
            out.bookings(fleet, &bookings, args.format)?;
        }
        BookingCommand::Add(args) => {
            let booking = fleet.add_booking(args.to_new_booking(), now)?;
            println!(
                "Booked {} as {} ({})",
                booking.bike_id,
                booking.booking_number,
                out.period(booking)
            );
        }
        BookingCommand::Edit(args) => {
            let booking = fleet.update_booking(&args.id, args.to_update())?;
            println!(
                "Updated {} ({})",
                booking.booking_number,
                out.period(booking)
            );
        }
        BookingCommand::Delete { id, yes } => {
            let booking = fleet
                .booking(&id)
                .ok_or_else(|| bikefleet::Error::booking_not_found(&id))?;
            if !yes {
                println!(
                    "This will delete booking {} ({}).",
                    booking.booking_number,
                    out.period(booking)
                );
                println!("Use --yes to confirm.");
                return Ok(());
            }
            let booking = fleet.delete_booking(&id)?;
            println!("Deleted booking {}", booking.booking_number);
        }
        BookingCommand::Days {
            bike,
            month,
            exclude,
        } => {
            if fleet.bike(&bike).is_none() {
                return Err(bikefleet::Error::bike_not_found(&bike).into());
            }
            let (year, month) = resolve_month(month.as_deref(), now)?;
            let grid: Vec<NaiveDate> = month_grid(year, month)?
                .into_iter()
                .filter(|d| d.month() == month)
                .collect();
            let booked = fleet.booked_days(&bike, exclude.as_deref(), &grid);
            if booked.is_empty() {
                println!("No booked days.");
            }
            for day in booked {
                println!("{}", out.date(day));
            }
        }
    }
    Ok(())
}

fn resolve_month(month: Option<&str>, now: DateTime<Utc>) -> Result<(i32, u32)> {
    match month {
        Some(text) => Ok(parse_month(text)?),
        None => Ok((now.year(), now.month())),
    }
}

fn handle_calendar(
    fleet: &Fleet,
    cmd: &CalendarCommand,
    now: DateTime<Utc>,
    out: &Printer<'_>,
) -> Result<()> {
    let bookings: Vec<&Booking> = match &cmd.bike {
        Some(id) => {
            if fleet.bike(id).is_none() {
                return Err(bikefleet::Error::bike_not_found(id).into());
            }
            fleet.bike_bookings(id)
        }
        None => fleet.bookings().iter().collect(),
    };

    if let Some(day) = cmd.day {
        let on = calendar::bookings_on(&bookings, day);
        if cmd.json {
            return Printer::json(&on);
        }
        println!("{}", out.date(day));
        if on.is_empty() {
            println!("No bookings.");
        }
        for booking in on {
            println!(
                "  {}  {}  {}",
                booking.booking_number,
                bike_label(fleet, &booking.bike_id),
                out.period(booking)
            );
        }
        return Ok(());
    }

    let (year, month) = resolve_month(cmd.month.as_deref(), now)?;
    let view = MonthView::build(year, month, now.date_naive(), &bookings, fleet.bikes())?;
    if cmd.json {
        return Printer::json(&view);
    }

    println!("{}", view.title());
    println!(
        "{}",
        WEEKDAYS
            .iter()
            .map(|d| format!("{d:>5}"))
            .collect::<String>()
    );
    for week in view.weeks() {
        let line: String = week
            .iter()
            .map(|cell| {
                let mark = if cell.booked > 0 { '*' } else { ' ' };
                if !cell.in_month {
                    "    .".to_string()
                } else if cell.is_today {
                    format!(" [{:>2}]", cell.date.day())
                } else {
                    format!("  {:>2}{mark}", cell.date.day())
                }
            })
            .collect();
        println!("{line}");
    }

    let booked: Vec<_> = view
        .days
        .iter()
        .filter(|c| c.in_month && !c.summary.is_empty())
        .collect();
    if !booked.is_empty() {
        println!();
        for cell in booked {
            println!("{}  {}", out.date(cell.date), cell.summary);
        }
    }
    Ok(())
}

fn handle_notifications(
    fleet: &Fleet,
    config: &Config,
    cmd: &NotificationsCommand,
    now: DateTime<Utc>,
) -> Result<()> {
    let threshold = cmd
        .threshold
        .map_or_else(|| config.overdue_threshold(), i64::from);
    let overdue = overdue_maintenance(fleet, now, threshold);

    if cmd.json {
        return Printer::json(&overdue);
    }
    if overdue.is_empty() {
        println!("No overdue maintenance.");
    }
    for item in &overdue {
        println!("{}  {}", item.record.id, item.message());
    }
    Ok(())
}

fn handle_export(fleet: &Fleet, file: Option<&Path>) -> Result<()> {
    let json = export_json(fleet)?;
    match file {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported fleet to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn handle_status(
    storage: &Storage,
    fleet: &Fleet,
    config: &Config,
    json: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let stats = storage.stats()?;
    let overdue = overdue_maintenance(fleet, now, config.overdue_threshold()).len();
    let count = |status: bikefleet::BikeStatus| {
        fleet.bikes().iter().filter(|b| b.status == status).count()
    };

    if json {
        return Printer::json(&serde_json::json!({
            "database_path": storage.path(),
            "storage": stats,
            "available": count(bikefleet::BikeStatus::Available),
            "rented": count(bikefleet::BikeStatus::Rented),
            "maintenance": count(bikefleet::BikeStatus::Maintenance),
            "overdue_maintenance": overdue,
        }));
    }

    println!("fleet status");
    println!("------------");
    println!("Database:      {}", storage.path().display());
    println!("Schema:        v{}", stats.schema_version);
    println!("Size:          {} bytes", stats.db_size_bytes);
    if let Some(saved) = stats.last_saved {
        println!("Last saved:    {}", saved.to_rfc3339());
    }
    println!();
    println!("Bikes:         {}", stats.bikes);
    println!("  available:   {}", count(bikefleet::BikeStatus::Available));
    println!("  rented:      {}", count(bikefleet::BikeStatus::Rented));
    println!("  maintenance: {}", count(bikefleet::BikeStatus::Maintenance));
    println!("Maintenance:   {} records", stats.maintenance_records);
    println!("Overdue:       {overdue}");
    println!("Bookings:      {}", stats.bookings);
    println!("Task types:    {}", stats.task_types);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                Printer::json(config)?;
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Seed demo data:     {}", config.storage.seed_demo_data);
                println!();
                println!("[Maintenance]");
                println!(
                    "  Overdue after:      {} days",
                    config.maintenance.overdue_days_threshold
                );
                println!(
                    "  Task types:         {}",
                    config.maintenance.task_types.join(", ")
                );
                println!();
                println!("[Inventory]");
                println!(
                    "  Ref-no pattern:     {}",
                    config.inventory.ref_no_pattern.as_deref().unwrap_or("(any)")
                );
                println!();
                println!("[Display]");
                println!("  Date format:        {}", config.display.date_format);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
