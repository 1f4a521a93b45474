//! Renewal reminder generation.
//!
//! Scans for policies due within the expiry horizon and gives each one a
//! pending reminder, unless it already has one.

pub mod engine;

pub use engine::{generate_reminders, GenerationReport, ReminderEngine};

/// Horizon used when the caller does not pick one.
pub const DEFAULT_HORIZON_DAYS: u32 = 90;
