use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Follow-up state of a renewal reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    #[default]
    Pending,
    Sent,
    Acknowledged,
}

impl ReminderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::Sent => "sent",
            ReminderStatus::Acknowledged => "acknowledged",
        }
    }
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ReminderStatus::Pending),
            "sent" => Ok(ReminderStatus::Sent),
            "acknowledged" => Ok(ReminderStatus::Acknowledged),
            _ => Err(ValidationError::InvalidStatus(s.to_string())),
        }
    }
}

/// A renewal reminder created by the reminder engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub policy_id: String,
    /// The as-of date of the generation run that created it.
    pub reminder_date: NaiveDate,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn is_pending(&self) -> bool {
        self.status == ReminderStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("SENT".parse::<ReminderStatus>().unwrap(), ReminderStatus::Sent);
        assert_eq!(
            " Acknowledged ".parse::<ReminderStatus>().unwrap(),
            ReminderStatus::Acknowledged
        );
    }

    #[test]
    fn status_rejects_unknown_value() {
        let err = "snoozed".parse::<ReminderStatus>().unwrap_err();
        assert_eq!(err, ValidationError::InvalidStatus("snoozed".to_string()));
    }

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(ReminderStatus::default(), ReminderStatus::Pending);
        assert_eq!(
            serde_json::to_string(&ReminderStatus::Acknowledged).unwrap(),
            "\"acknowledged\""
        );
    }
}
