//! Policy management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use renewal_core::{Config, NewPolicy, PolicyUpdate, Store};
use serde::Serialize;

use super::{delete_mode, not_found, parse_date, print_json, today, CliResult};

#[derive(Subcommand)]
pub enum PolicyAction {
    /// Register a policy for an existing client
    Add {
        /// Owning client id
        client_id: String,
        /// Unique policy number
        policy_number: String,
        /// Policy type, e.g. "Motor Vehicle Insurance"
        #[arg(long = "type")]
        policy_type: String,
        /// Cover start (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,
        /// Cover end (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,
        #[arg(long)]
        premium: f64,
        #[arg(long)]
        company: Option<String>,
    },
    /// Show one policy
    Get { id: String },
    /// List all policies
    List,
    /// Change policy fields
    Update {
        id: String,
        /// Move the policy to another client
        #[arg(long)]
        client_id: Option<String>,
        #[arg(long)]
        policy_number: Option<String>,
        #[arg(long = "type")]
        policy_type: Option<String>,
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,
        #[arg(long)]
        premium: Option<f64>,
        #[arg(long)]
        company: Option<String>,
    },
    /// Delete a policy
    Delete {
        id: String,
        /// Also delete the policy's reminders
        #[arg(long)]
        cascade: bool,
    },
    /// Policies ending on or before as-of + days
    Expiring {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,
        /// Horizon in days, defaults to reminders.horizon_days
        #[arg(long)]
        days: Option<u32>,
    },
    /// List reminders raised for a policy
    Reminders { id: String },
}

/// Policy as shown by `policy expiring`.
#[derive(Serialize)]
struct ExpiringPolicy {
    #[serde(flatten)]
    policy: renewal_core::Policy,
    days_until_expiry: i64,
}

pub fn run(action: PolicyAction) -> CliResult {
    let store = Store::open()?;

    match action {
        PolicyAction::Add {
            client_id,
            policy_number,
            policy_type,
            start,
            end,
            premium,
            company,
        } => {
            let policy = store.add_policy(NewPolicy {
                client_id,
                policy_number,
                policy_type,
                start_date: start,
                end_date: end,
                premium_amount: premium,
                insurance_company: company,
            })?;
            eprintln!("Policy created: {}", policy.id);
            print_json(&policy)?;
        }
        PolicyAction::Get { id } => {
            let policy = store.get_policy(&id)?.ok_or_else(|| not_found("policy", &id))?;
            print_json(&policy)?;
        }
        PolicyAction::List => {
            print_json(&store.list_policies()?)?;
        }
        PolicyAction::Update {
            id,
            client_id,
            policy_number,
            policy_type,
            start,
            end,
            premium,
            company,
        } => {
            let update = PolicyUpdate {
                client_id,
                policy_number,
                policy_type,
                start_date: start,
                end_date: end,
                premium_amount: premium,
                insurance_company: company,
            };
            if update.is_empty() {
                return Err("nothing to update".into());
            }
            let policy = store
                .update_policy(&id, update)?
                .ok_or_else(|| not_found("policy", &id))?;
            print_json(&policy)?;
        }
        PolicyAction::Delete { id, cascade } => {
            let config = Config::load()?;
            if !store.delete_policy(&id, delete_mode(cascade, &config))? {
                return Err(not_found("policy", &id));
            }
            println!("Policy deleted: {id}");
        }
        PolicyAction::Expiring { as_of, days } => {
            let as_of = as_of.unwrap_or_else(today);
            let days = match days {
                Some(d) => d,
                None => Config::load()?.reminders.horizon_days,
            };
            let expiring: Vec<ExpiringPolicy> = store
                .find_expiring_policies(as_of, days)?
                .into_iter()
                .map(|policy| ExpiringPolicy {
                    days_until_expiry: policy.days_until_expiry(as_of),
                    policy,
                })
                .collect();
            print_json(&expiring)?;
        }
        PolicyAction::Reminders { id } => {
            if store.get_policy(&id)?.is_none() {
                return Err(not_found("policy", &id));
            }
            print_json(&store.find_reminders_by_policy(&id)?)?;
        }
    }
    Ok(())
}
