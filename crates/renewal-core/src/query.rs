//! Read-side lookups over the store.
//!
//! Every result is a snapshot taken when the call runs; nothing here stays
//! live if the store changes afterwards.

use chrono::{Days, NaiveDate};
use rusqlite::{params, OptionalExtension};

use crate::error::Result;
use crate::models::{max_storable_date, EntityKind, Policy, Record, Reminder};
use crate::storage::store::{
    format_date, row_to_policy, row_to_reminder, POLICY_COLUMNS, REMINDER_COLUMNS,
};
use crate::storage::Store;

/// Last `end_date` that still counts as expiring: `as_of + horizon_days`.
///
/// Clamped to the last storable date, so an oversized horizon just matches
/// every policy.
pub fn expiry_cutoff(as_of: NaiveDate, horizon_days: u32) -> NaiveDate {
    as_of
        .checked_add_days(Days::new(u64::from(horizon_days)))
        .map_or_else(max_storable_date, |d| d.min(max_storable_date()))
}

impl Store {
    /// Every record of one kind, in insertion order.
    pub fn list_all(&self, kind: EntityKind) -> Result<Vec<Record>> {
        let records = match kind {
            EntityKind::Client => self
                .list_clients()?
                .into_iter()
                .map(Record::Client)
                .collect(),
            EntityKind::Policy => self
                .list_policies()?
                .into_iter()
                .map(Record::Policy)
                .collect(),
            EntityKind::Reminder => self
                .list_reminders()?
                .into_iter()
                .map(Record::Reminder)
                .collect(),
        };
        Ok(records)
    }

    pub fn find_by_id(&self, kind: EntityKind, id: &str) -> Result<Option<Record>> {
        let record = match kind {
            EntityKind::Client => self.get_client(id)?.map(Record::Client),
            EntityKind::Policy => self.get_policy(id)?.map(Record::Policy),
            EntityKind::Reminder => self.get_reminder(id)?.map(Record::Reminder),
        };
        Ok(record)
    }

    /// Policies owned by a client. Empty when the client has none or does not exist.
    pub fn find_policies_by_client(&self, client_id: &str) -> Result<Vec<Policy>> {
        let sql = format!("SELECT {POLICY_COLUMNS} FROM policies WHERE client_id = ?1 ORDER BY rowid");
        let mut stmt = self.conn().prepare(&sql)?;
        let policies = stmt
            .query_map(params![client_id], row_to_policy)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(policies)
    }

    /// Reminders for a policy, any status, oldest first.
    pub fn find_reminders_by_policy(&self, policy_id: &str) -> Result<Vec<Reminder>> {
        let sql = format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE policy_id = ?1 ORDER BY rowid");
        let mut stmt = self.conn().prepare(&sql)?;
        let reminders = stmt
            .query_map(params![policy_id], row_to_reminder)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reminders)
    }

    /// Policies with `end_date <= as_of + horizon_days`, soonest first.
    ///
    /// This is a "due by" test: policies that already lapsed before `as_of`
    /// are included.
    pub fn find_expiring_policies(&self, as_of: NaiveDate, horizon_days: u32) -> Result<Vec<Policy>> {
        let cutoff = expiry_cutoff(as_of, horizon_days);
        let sql = format!(
            "SELECT {POLICY_COLUMNS} FROM policies WHERE end_date <= ?1 ORDER BY end_date, rowid"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let policies = stmt
            .query_map(params![format_date(cutoff)], row_to_policy)?
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(%as_of, horizon_days, %cutoff, found = policies.len(), "expiring policy scan");
        Ok(policies)
    }

    /// Same as [`Store::find_expiring_policies`].
    pub fn get_expiring_policies(&self, as_of: NaiveDate, horizon_days: u32) -> Result<Vec<Policy>> {
        self.find_expiring_policies(as_of, horizon_days)
    }

    /// Reminders still awaiting follow-up, in creation order.
    pub fn find_pending_reminders(&self) -> Result<Vec<Reminder>> {
        let sql = format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE status = 'pending' ORDER BY rowid"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let reminders = stmt
            .query_map([], row_to_reminder)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reminders)
    }

    /// Same as [`Store::find_pending_reminders`].
    pub fn list_pending_reminders(&self) -> Result<Vec<Reminder>> {
        self.find_pending_reminders()
    }

    /// The pending reminder for a policy, if one exists.
    pub fn pending_reminder_for_policy(&self, policy_id: &str) -> Result<Option<Reminder>> {
        let sql = format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders
             WHERE policy_id = ?1 AND status = 'pending'
             ORDER BY rowid LIMIT 1"
        );
        Ok(self
            .conn()
            .query_row(&sql, params![policy_id], row_to_reminder)
            .optional()?)
    }
}
