use chrono::NaiveDate;
use clap::Subcommand;
use renewal_core::{Config, ReminderEngine, ReminderStatus, Store};

use super::{not_found, parse_date, print_json, today, CliResult};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Create pending reminders for policies nearing expiry
    Generate {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,
        /// Horizon in days, defaults to reminders.horizon_days
        #[arg(long)]
        days: Option<u32>,
    },
    /// List pending reminders
    Pending,
    /// List all reminders
    List,
    /// Mark a reminder as pending, sent or acknowledged
    Status {
        id: String,
        status: String,
    },
}

pub fn run(action: ReminderAction) -> CliResult {
    let store = Store::open()?;

    match action {
        ReminderAction::Generate { as_of, days } => {
            let config = Config::load()?;
            let mut engine = ReminderEngine::from_config(&store, &config);
            if let Some(days) = days {
                engine = engine.with_horizon(days);
            }
            let report = engine.run(as_of.unwrap_or_else(today))?;
            eprintln!("Reminders created: {}", report.created_count());
            print_json(&report)?;
        }
        ReminderAction::Pending => {
            print_json(&store.find_pending_reminders()?)?;
        }
        ReminderAction::List => {
            print_json(&store.list_reminders()?)?;
        }
        ReminderAction::Status { id, status } => {
            let status: ReminderStatus = status.parse()?;
            let reminder = store
                .update_reminder_status(&id, status)?
                .ok_or_else(|| not_found("reminder", &id))?;
            print_json(&reminder)?;
        }
    }
    Ok(())
}
