//! Reminder generation engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DEFAULT_HORIZON_DAYS;
use crate::error::Result;
use crate::models::Reminder;
use crate::storage::{Config, Store};

/// Outcome of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub as_of: NaiveDate,
    pub horizon_days: u32,
    /// Policies that matched the expiry scan.
    pub scanned: usize,
    pub created: Vec<Reminder>,
    /// Policies skipped because they already had a pending reminder.
    pub already_pending: Vec<String>,
}

impl GenerationReport {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

/// Create a pending reminder dated `as_of` for every policy with
/// `end_date <= as_of + horizon_days` that does not already have one.
///
/// The scan and all inserts share one immediate transaction. If any insert
/// fails, nothing from this run is kept and the error is returned.
pub fn generate_reminders(
    store: &Store,
    as_of: NaiveDate,
    horizon_days: u32,
) -> Result<GenerationReport> {
    let report = store.write_transaction(|| {
        let policies = store.find_expiring_policies(as_of, horizon_days)?;
        let mut report = GenerationReport {
            as_of,
            horizon_days,
            scanned: policies.len(),
            created: Vec::new(),
            already_pending: Vec::new(),
        };

        for policy in policies {
            if store.pending_reminder_for_policy(&policy.id)?.is_some() {
                report.already_pending.push(policy.id);
                continue;
            }
            let reminder = store.insert_pending_reminder(&policy.id, as_of)?;
            tracing::debug!(
                policy_id = %policy.id,
                policy_number = %policy.policy_number,
                end_date = %policy.end_date,
                "pending reminder created"
            );
            report.created.push(reminder);
        }

        Ok(report)
    })?;

    tracing::info!(
        %as_of,
        horizon_days,
        scanned = report.scanned,
        created = report.created.len(),
        already_pending = report.already_pending.len(),
        "reminder generation finished"
    );
    Ok(report)
}

/// Runs generation against one store with a default horizon.
pub struct ReminderEngine<'a> {
    store: &'a Store,
    horizon_days: u32,
}

impl<'a> ReminderEngine<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    /// Take the default horizon from `reminders.horizon_days`.
    pub fn from_config(store: &'a Store, config: &Config) -> Self {
        Self {
            store,
            horizon_days: config.reminders.horizon_days,
        }
    }

    pub fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// Generate with the engine's horizon.
    pub fn run(&self, as_of: NaiveDate) -> Result<GenerationReport> {
        generate_reminders(self.store, as_of, self.horizon_days)
    }
}
