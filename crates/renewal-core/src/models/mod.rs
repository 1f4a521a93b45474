//! Domain records: clients, their policies, and renewal reminders.

mod client;
mod policy;
mod reminder;

pub use client::{Client, ClientUpdate, NewClient};
pub use policy::{NewPolicy, Policy, PolicyUpdate};
pub use reminder::{Reminder, ReminderStatus};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// The three persisted record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Client,
    Policy,
    Reminder,
}

impl EntityKind {
    /// Backing table name.
    pub(crate) fn table(self) -> &'static str {
        match self {
            EntityKind::Client => "clients",
            EntityKind::Policy => "policies",
            EntityKind::Reminder => "reminders",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Client => "client",
            EntityKind::Policy => "policy",
            EntityKind::Reminder => "reminder",
        };
        f.write_str(s)
    }
}

/// A record of any kind, as returned by the generic queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Client(Client),
    Policy(Policy),
    Reminder(Reminder),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Client(_) => EntityKind::Client,
            Record::Policy(_) => EntityKind::Policy,
            Record::Reminder(_) => EntityKind::Reminder,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Client(c) => &c.id,
            Record::Policy(p) => &p.id,
            Record::Reminder(r) => &r.id,
        }
    }
}

/// How deletes treat records that still own dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Refuse to delete while dependents exist.
    #[default]
    Restrict,
    /// Delete dependents in the same transaction.
    Cascade,
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

/// Dates are stored as `YYYY-MM-DD` text; only four-digit years sort correctly.
pub(crate) fn require_storable_date(date: NaiveDate) -> Result<(), ValidationError> {
    if (1..=9999).contains(&date.year()) {
        Ok(())
    } else {
        Err(ValidationError::DateOutOfRange(date))
    }
}

/// Last date the store can hold.
pub(crate) fn max_storable_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}
