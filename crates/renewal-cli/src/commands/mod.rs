pub mod client;
pub mod config;
pub mod policy;
pub mod reminder;
pub mod seed;

use chrono::{Local, NaiveDate};
use renewal_core::{Config, DeleteMode};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `--cascade` overrides the configured delete mode.
pub fn delete_mode(cascade: bool, config: &Config) -> DeleteMode {
    if cascade {
        DeleteMode::Cascade
    } else {
        config.deletion.mode
    }
}

pub fn not_found(kind: &str, id: &str) -> Box<dyn std::error::Error> {
    format!("{kind} not found: {id}").into()
}
