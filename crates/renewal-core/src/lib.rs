//! # Renewal Core Library
//!
//! Business logic for the insurance renewal tracker: it keeps clients and
//! their policies, answers "what is about to expire", and raises renewal
//! reminders so someone follows up. The `renewal` CLI is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Storage**: SQLite-backed [`Store`] for clients, policies and reminders,
//!   with versioned migrations and TOML-based [`Config`]
//! - **Query**: lookups by id, by owner, by expiry horizon and by status
//! - **Reminders**: the expiry scan that creates at most one pending reminder
//!   per policy
//! - **Seed**: reproducible sample data
//!
//! ## Key Components
//!
//! - [`Store`]: explicit persistence handle, one per unit of work
//! - [`generate_reminders`] / [`ReminderEngine`]: reminder generation
//! - [`CoreError`]: error hierarchy shared by every operation

pub mod error;
pub mod models;
pub mod query;
pub mod reminders;
pub mod seed;
pub mod storage;

pub use error::{ConfigError, ConstraintViolation, CoreError, DatabaseError, Result, ValidationError};
pub use models::{
    Client, ClientUpdate, DeleteMode, EntityKind, NewClient, NewPolicy, Policy, PolicyUpdate,
    Record, Reminder, ReminderStatus,
};
pub use query::expiry_cutoff;
pub use reminders::{generate_reminders, GenerationReport, ReminderEngine, DEFAULT_HORIZON_DAYS};
pub use seed::{seed, SeedOptions, SeedSummary};
pub use storage::{data_dir, Config, Store};
