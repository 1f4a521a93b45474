//! SQLite-based storage for clients, policies and reminders.
//!
//! Every write runs inside `BEGIN IMMEDIATE`, so a failed check or statement
//! rolls the whole operation back and concurrent writers queue on the lock.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{migrations, Config};
use crate::error::{ConstraintViolation, DatabaseError, Result};
use crate::models::{
    require_storable_date, Client, ClientUpdate, DeleteMode, EntityKind, NewClient, NewPolicy,
    Policy, PolicyUpdate, Reminder, ReminderStatus,
};

pub(crate) const CLIENT_COLUMNS: &str = "id, name, email, phone, address, created_at";
pub(crate) const POLICY_COLUMNS: &str = "id, client_id, policy_number, type, start_date, end_date, \
     premium_amount, insurance_company, created_at";
pub(crate) const REMINDER_COLUMNS: &str = "id, policy_id, reminder_date, status, created_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

// === Helper Functions ===

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date_column(row: &Row, idx: usize) -> Result<NaiveDate, rusqlite::Error> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

pub(crate) fn row_to_client(row: &Row) -> Result<Client, rusqlite::Error> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        created_at: parse_datetime_fallback(&row.get::<_, String>(5)?),
    })
}

pub(crate) fn row_to_policy(row: &Row) -> Result<Policy, rusqlite::Error> {
    Ok(Policy {
        id: row.get(0)?,
        client_id: row.get(1)?,
        policy_number: row.get(2)?,
        policy_type: row.get(3)?,
        start_date: parse_date_column(row, 4)?,
        end_date: parse_date_column(row, 5)?,
        premium_amount: row.get(6)?,
        insurance_company: row.get(7)?,
        created_at: parse_datetime_fallback(&row.get::<_, String>(8)?),
    })
}

pub(crate) fn row_to_reminder(row: &Row) -> Result<Reminder, rusqlite::Error> {
    let status_str: String = row.get(3)?;
    let status = status_str
        .parse::<ReminderStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(Reminder {
        id: row.get(0)?,
        policy_id: row.get(1)?,
        reminder_date: parse_date_column(row, 2)?,
        status,
        created_at: parse_datetime_fallback(&row.get::<_, String>(4)?),
    })
}

/// SQLite store for clients, policies and reminders.
///
/// Owns its connection; open one per unit of work or keep one per process.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// File backing this store, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Open the database named by the configuration in the data directory.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or the database cannot
    /// be opened or migrated.
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        Self::open_at(&config.database_path()?)
    }

    /// Open (creating if needed) the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened renewal store");
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Open an isolated in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn, path })
    }

    /// Run `work` inside one immediate transaction: commit if it succeeds,
    /// roll back and return its error otherwise.
    pub(crate) fn write_transaction<T>(&self, work: impl FnOnce() -> Result<T>) -> Result<T> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result = work();
        match result {
            Ok(value) => {
                if let Err(err) = self.conn.execute_batch("COMMIT;") {
                    let _ = self.conn.execute_batch("ROLLBACK;");
                    return Err(err.into());
                }
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK;") {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    fn exists(&self, kind: EntityKind, id: &str) -> Result<bool> {
        let sql = format!("SELECT 1 FROM {} WHERE id = ?1", kind.table());
        Ok(self
            .conn
            .query_row(&sql, params![id], |_| Ok(()))
            .optional()?
            .is_some())
    }

    fn ensure_client_exists(&self, client_id: &str) -> Result<()> {
        if self.exists(EntityKind::Client, client_id)? {
            Ok(())
        } else {
            Err(ConstraintViolation::UnknownClient(client_id.to_string()).into())
        }
    }

    fn ensure_policy_number_free(&self, number: &str, except_id: Option<&str>) -> Result<()> {
        let holder: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM policies WHERE policy_number = ?1",
                params![number],
                |row| row.get(0),
            )
            .optional()?;
        match holder {
            Some(id) if Some(id.as_str()) != except_id => {
                Err(ConstraintViolation::DuplicatePolicyNumber(number.to_string()).into())
            }
            _ => Ok(()),
        }
    }

    fn count_where(&self, table: &str, column: &str, value: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?1");
        let count: i64 = self.conn.query_row(&sql, params![value], |row| row.get(0))?;
        Ok(count as usize)
    }

    // === Client CRUD ===

    /// Create a client and return it with its assigned id.
    pub fn add_client(&self, new: NewClient) -> Result<Client> {
        new.validate()?;
        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            address: new.address,
            created_at: Utc::now(),
        };
        self.write_transaction(|| {
            self.conn.execute(
                "INSERT INTO clients (id, name, email, phone, address, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    client.id,
                    client.name,
                    client.email,
                    client.phone,
                    client.address,
                    client.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;
        tracing::debug!(client_id = %client.id, "client created");
        Ok(client)
    }

    pub fn get_client(&self, id: &str) -> Result<Option<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1");
        Ok(self.conn.query_row(&sql, params![id], row_to_client).optional()?)
    }

    /// All clients in insertion order.
    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let clients = stmt
            .query_map([], row_to_client)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(clients)
    }

    /// Apply a partial update. Returns `None` if the client does not exist.
    pub fn update_client(&self, id: &str, update: ClientUpdate) -> Result<Option<Client>> {
        self.write_transaction(|| {
            let Some(mut client) = self.get_client(id)? else {
                return Ok(None);
            };
            update.apply(&mut client)?;
            self.conn.execute(
                "UPDATE clients SET name = ?1, email = ?2, phone = ?3, address = ?4 WHERE id = ?5",
                params![client.name, client.email, client.phone, client.address, client.id],
            )?;
            Ok(Some(client))
        })
    }

    /// Delete a client. Returns `false` if it did not exist.
    ///
    /// With [`DeleteMode::Restrict`] a client that still owns policies is left
    /// in place and the call fails; [`DeleteMode::Cascade`] removes its
    /// policies and their reminders in the same transaction.
    pub fn delete_client(&self, id: &str, mode: DeleteMode) -> Result<bool> {
        self.write_transaction(|| {
            if !self.exists(EntityKind::Client, id)? {
                return Ok(false);
            }
            let policies = self.count_where("policies", "client_id", id)?;
            if policies > 0 {
                match mode {
                    DeleteMode::Restrict => {
                        tracing::warn!(client_id = id, policies, "refusing to delete client with policies");
                        return Err(ConstraintViolation::HasDependents {
                            kind: EntityKind::Client,
                            id: id.to_string(),
                            dependents: policies,
                        }
                        .into());
                    }
                    DeleteMode::Cascade => {
                        let reminders = self.conn.execute(
                            "DELETE FROM reminders
                             WHERE policy_id IN (SELECT id FROM policies WHERE client_id = ?1)",
                            params![id],
                        )?;
                        self.conn
                            .execute("DELETE FROM policies WHERE client_id = ?1", params![id])?;
                        tracing::info!(client_id = id, policies, reminders, "cascading client delete");
                    }
                }
            }
            self.conn.execute("DELETE FROM clients WHERE id = ?1", params![id])?;
            Ok(true)
        })
    }

    // === Policy CRUD ===

    /// Create a policy for an existing client.
    ///
    /// Fails with [`ConstraintViolation::UnknownClient`] or
    /// [`ConstraintViolation::DuplicatePolicyNumber`] without writing anything.
    pub fn add_policy(&self, new: NewPolicy) -> Result<Policy> {
        new.validate()?;
        let policy = Policy {
            id: Uuid::new_v4().to_string(),
            client_id: new.client_id,
            policy_number: new.policy_number.trim().to_string(),
            policy_type: new.policy_type,
            start_date: new.start_date,
            end_date: new.end_date,
            premium_amount: new.premium_amount,
            insurance_company: new.insurance_company,
            created_at: Utc::now(),
        };
        self.write_transaction(|| {
            self.ensure_client_exists(&policy.client_id)?;
            self.ensure_policy_number_free(&policy.policy_number, None)?;
            self.conn.execute(
                "INSERT INTO policies (id, client_id, policy_number, type, start_date, end_date,
                                       premium_amount, insurance_company, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    policy.id,
                    policy.client_id,
                    policy.policy_number,
                    policy.policy_type,
                    format_date(policy.start_date),
                    format_date(policy.end_date),
                    policy.premium_amount,
                    policy.insurance_company,
                    policy.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;
        tracing::debug!(policy_id = %policy.id, policy_number = %policy.policy_number, "policy created");
        Ok(policy)
    }

    pub fn get_policy(&self, id: &str) -> Result<Option<Policy>> {
        let sql = format!("SELECT {POLICY_COLUMNS} FROM policies WHERE id = ?1");
        Ok(self.conn.query_row(&sql, params![id], row_to_policy).optional()?)
    }

    /// All policies in insertion order.
    pub fn list_policies(&self) -> Result<Vec<Policy>> {
        let sql = format!("SELECT {POLICY_COLUMNS} FROM policies ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let policies = stmt
            .query_map([], row_to_policy)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(policies)
    }

    /// Apply a partial update. Returns `None` if the policy does not exist.
    pub fn update_policy(&self, id: &str, update: PolicyUpdate) -> Result<Option<Policy>> {
        self.write_transaction(|| {
            let Some(mut policy) = self.get_policy(id)? else {
                return Ok(None);
            };
            let client_changed = update
                .client_id
                .as_deref()
                .is_some_and(|c| c != policy.client_id);
            update.apply(&mut policy)?;
            policy.policy_number = policy.policy_number.trim().to_string();

            if client_changed {
                self.ensure_client_exists(&policy.client_id)?;
            }
            self.ensure_policy_number_free(&policy.policy_number, Some(&policy.id))?;
            self.conn.execute(
                "UPDATE policies
                 SET client_id = ?1, policy_number = ?2, type = ?3, start_date = ?4,
                     end_date = ?5, premium_amount = ?6, insurance_company = ?7
                 WHERE id = ?8",
                params![
                    policy.client_id,
                    policy.policy_number,
                    policy.policy_type,
                    format_date(policy.start_date),
                    format_date(policy.end_date),
                    policy.premium_amount,
                    policy.insurance_company,
                    policy.id,
                ],
            )?;
            Ok(Some(policy))
        })
    }

    /// Delete a policy. Returns `false` if it did not exist.
    ///
    /// Reminders are dependents: refused under [`DeleteMode::Restrict`],
    /// removed alongside under [`DeleteMode::Cascade`].
    pub fn delete_policy(&self, id: &str, mode: DeleteMode) -> Result<bool> {
        self.write_transaction(|| {
            if !self.exists(EntityKind::Policy, id)? {
                return Ok(false);
            }
            let reminders = self.count_where("reminders", "policy_id", id)?;
            if reminders > 0 {
                match mode {
                    DeleteMode::Restrict => {
                        tracing::warn!(policy_id = id, reminders, "refusing to delete policy with reminders");
                        return Err(ConstraintViolation::HasDependents {
                            kind: EntityKind::Policy,
                            id: id.to_string(),
                            dependents: reminders,
                        }
                        .into());
                    }
                    DeleteMode::Cascade => {
                        self.conn
                            .execute("DELETE FROM reminders WHERE policy_id = ?1", params![id])?;
                    }
                }
            }
            self.conn.execute("DELETE FROM policies WHERE id = ?1", params![id])?;
            Ok(true)
        })
    }

    // === Reminders ===

    pub fn get_reminder(&self, id: &str) -> Result<Option<Reminder>> {
        let sql = format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?1");
        Ok(self.conn.query_row(&sql, params![id], row_to_reminder).optional()?)
    }

    /// All reminders, any status, in insertion order.
    pub fn list_reminders(&self) -> Result<Vec<Reminder>> {
        let sql = format!("SELECT {REMINDER_COLUMNS} FROM reminders ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let reminders = stmt
            .query_map([], row_to_reminder)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reminders)
    }

    /// Insert a pending reminder. Callers hold the write transaction.
    pub(crate) fn insert_pending_reminder(
        &self,
        policy_id: &str,
        reminder_date: NaiveDate,
    ) -> Result<Reminder> {
        require_storable_date(reminder_date)?;
        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            policy_id: policy_id.to_string(),
            reminder_date,
            status: ReminderStatus::Pending,
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO reminders (id, policy_id, reminder_date, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                reminder.id,
                reminder.policy_id,
                format_date(reminder.reminder_date),
                reminder.status.as_str(),
                reminder.created_at.to_rfc3339(),
            ],
        )?;
        Ok(reminder)
    }

    /// Move a reminder to `status`. Returns `None` if it does not exist.
    ///
    /// Moving a reminder back to pending is refused while its policy already
    /// has another pending reminder.
    pub fn update_reminder_status(
        &self,
        id: &str,
        status: ReminderStatus,
    ) -> Result<Option<Reminder>> {
        self.write_transaction(|| {
            let Some(mut reminder) = self.get_reminder(id)? else {
                return Ok(None);
            };
            if reminder.status == status {
                return Ok(Some(reminder));
            }
            if status == ReminderStatus::Pending
                && self.pending_reminder_for_policy(&reminder.policy_id)?.is_some()
            {
                return Err(ConstraintViolation::DuplicatePendingReminder {
                    policy_id: reminder.policy_id.clone(),
                }
                .into());
            }
            self.conn.execute(
                "UPDATE reminders SET status = ?1 WHERE id = ?2",
                params![status.as_str(), id],
            )?;
            tracing::debug!(reminder_id = id, from = %reminder.status, to = %status, "reminder status changed");
            reminder.status = status;
            Ok(Some(reminder))
        })
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("path", &self.path).finish()
    }
}
