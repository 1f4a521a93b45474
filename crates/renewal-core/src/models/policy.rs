use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_empty, require_storable_date};
use crate::error::ValidationError;

/// An insurance policy held by a client.
///
/// `start_date <= end_date` always holds for stored policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub client_id: String,
    pub policy_number: String,
    /// Free-text category, e.g. "Motor Vehicle Insurance".
    #[serde(rename = "type")]
    pub policy_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub premium_amount: f64,
    pub insurance_company: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Policy {
    /// Days from `as_of` until the policy ends. Negative once it has lapsed.
    pub fn days_until_expiry(&self, as_of: NaiveDate) -> i64 {
        (self.end_date - as_of).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPolicy {
    pub client_id: String,
    pub policy_number: String,
    #[serde(rename = "type")]
    pub policy_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub premium_amount: f64,
    pub insurance_company: Option<String>,
}

impl NewPolicy {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(
            &self.policy_number,
            &self.policy_type,
            self.start_date,
            self.end_date,
            self.premium_amount,
        )
    }
}

/// Partial update for a policy. `None` leaves the field unchanged.
///
/// Reassigning `client_id` is checked against the client table like a create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyUpdate {
    pub client_id: Option<String>,
    pub policy_number: Option<String>,
    #[serde(rename = "type")]
    pub policy_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub premium_amount: Option<f64>,
    pub insurance_company: Option<String>,
}

impl PolicyUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply onto an existing record and validate the merged result, so a
    /// lone `end_date` change is still checked against the stored start.
    pub(crate) fn apply(self, policy: &mut Policy) -> Result<(), ValidationError> {
        if let Some(client_id) = self.client_id {
            policy.client_id = client_id;
        }
        if let Some(number) = self.policy_number {
            policy.policy_number = number;
        }
        if let Some(policy_type) = self.policy_type {
            policy.policy_type = policy_type;
        }
        if let Some(start) = self.start_date {
            policy.start_date = start;
        }
        if let Some(end) = self.end_date {
            policy.end_date = end;
        }
        if let Some(premium) = self.premium_amount {
            policy.premium_amount = premium;
        }
        if let Some(company) = self.insurance_company {
            policy.insurance_company = Some(company);
        }
        validate_fields(
            &policy.policy_number,
            &policy.policy_type,
            policy.start_date,
            policy.end_date,
            policy.premium_amount,
        )
    }
}

fn validate_fields(
    policy_number: &str,
    policy_type: &str,
    start: NaiveDate,
    end: NaiveDate,
    premium: f64,
) -> Result<(), ValidationError> {
    require_non_empty("policy_number", policy_number)?;
    require_non_empty("type", policy_type)?;
    require_storable_date(start)?;
    require_storable_date(end)?;
    if start > end {
        return Err(ValidationError::InvalidDateRange { start, end });
    }
    if !premium.is_finite() || premium < 0.0 {
        return Err(ValidationError::InvalidPremium(premium));
    }
    Ok(())
}
