//! Sample data for demos and manual testing.
//!
//! Generates Kenyan-market clients with one to three annual policies each,
//! then runs reminder generation over them.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::models::{NewClient, NewPolicy};
use crate::reminders::{generate_reminders, DEFAULT_HORIZON_DAYS};
use crate::storage::Store;

const CITIES: &[&str] = &[
    "Nairobi", "Mombasa", "Kisumu", "Nakuru", "Eldoret", "Thika", "Malindi", "Kitale", "Garissa",
    "Kakamega",
];
const SURNAMES: &[&str] = &[
    "Kamau", "Ochieng", "Wanjiru", "Muthomi", "Otieno", "Ngugi", "Akinyi", "Mutua", "Ouko", "Njeri",
];
const FIRST_NAMES: &[&str] = &[
    "Grace", "Brian", "Faith", "Kevin", "Mercy", "Dennis", "Joy", "Samuel", "Esther", "Peter",
    "Ann", "David",
];
const STREETS: &[&str] = &[
    "Moi Avenue", "Kenyatta Avenue", "Ngong Road", "Tom Mboya Street", "Oginga Odinga Street",
    "Uhuru Highway", "Haile Selassie Avenue", "Biashara Street",
];
const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];
const PHONE_PREFIXES: &[&str] = &["070", "071", "072", "074", "075", "076", "077", "078", "079"];

pub const POLICY_TYPES: &[&str] = &[
    "Motor Vehicle Insurance",
    "Health Insurance",
    "Property Insurance",
    "Life Insurance",
    "Business Insurance",
    "Travel Insurance",
];

pub const INSURANCE_COMPANIES: &[&str] = &[
    "Jubilee Insurance",
    "APA Insurance",
    "Britam",
    "CIC Insurance Group",
    "UAP Old Mutual",
    "Kenya Orient Insurance",
    "Madison Insurance",
];

/// Policies run for a year.
const TERM_DAYS: u64 = 365;
/// Start dates fall within this many days before `today`.
const START_WINDOW_DAYS: u64 = 730;

#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub clients: usize,
    /// Fixed seed for reproducible data; `None` draws from entropy.
    pub rng_seed: Option<u64>,
    pub today: NaiveDate,
}

impl SeedOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            clients: 10,
            rng_seed: None,
            today,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub clients: usize,
    pub policies: usize,
    pub reminders: usize,
}

fn pick<'a>(rng: &mut Pcg64, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn phone(rng: &mut Pcg64) -> String {
    format!("{}{:07}", pick(rng, PHONE_PREFIXES), rng.gen_range(0..10_000_000u32))
}

fn address(rng: &mut Pcg64) -> String {
    format!(
        "{} {}, {}, Kenya",
        rng.gen_range(1..=999u32),
        pick(rng, STREETS),
        pick(rng, CITIES)
    )
}

fn sample_client(rng: &mut Pcg64, index: usize) -> NewClient {
    let first = pick(rng, FIRST_NAMES);
    let surname = pick(rng, SURNAMES);
    let email = format!(
        "{}.{}{}@{}",
        first.to_lowercase(),
        surname.to_lowercase(),
        index,
        pick(rng, EMAIL_DOMAINS)
    );
    NewClient::new(format!("{first} {surname}"), email)
        .with_phone(phone(rng))
        .with_address(address(rng))
}

fn unique_policy_number(rng: &mut Pcg64, used: &mut HashSet<String>) -> String {
    loop {
        let number = format!("KE-{:08}", rng.gen_range(10_000_000..100_000_000u32));
        if used.insert(number.clone()) {
            return number;
        }
    }
}

fn sample_policy(
    rng: &mut Pcg64,
    client_id: &str,
    today: NaiveDate,
    used_numbers: &mut HashSet<String>,
) -> Result<NewPolicy> {
    let start_date = today
        .checked_sub_days(Days::new(rng.gen_range(0..=START_WINDOW_DAYS)))
        .ok_or_else(|| CoreError::Custom(format!("cannot seed policies relative to {today}")))?;
    let end_date = start_date
        .checked_add_days(Days::new(TERM_DAYS))
        .ok_or_else(|| CoreError::Custom(format!("cannot seed policies relative to {today}")))?;
    let premium = (rng.gen_range(5_000.0..100_000.0f64) * 100.0).round() / 100.0;

    Ok(NewPolicy {
        client_id: client_id.to_string(),
        policy_number: unique_policy_number(rng, used_numbers),
        policy_type: pick(rng, POLICY_TYPES).to_string(),
        start_date,
        end_date,
        premium_amount: premium,
        insurance_company: Some(pick(rng, INSURANCE_COMPANIES).to_string()),
    })
}

/// Populate `store` with sample clients and policies, then generate
/// reminders as of `options.today` over the default horizon.
///
/// Stops at the first failed write and returns the error; records written
/// before it stay in place.
pub fn seed(store: &Store, options: &SeedOptions) -> Result<SeedSummary> {
    let mut rng = match options.rng_seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    };

    let mut used_numbers: HashSet<String> = store
        .list_policies()?
        .into_iter()
        .map(|p| p.policy_number)
        .collect();

    let mut summary = SeedSummary::default();
    for index in 0..options.clients {
        let client = store.add_client(sample_client(&mut rng, index))?;
        summary.clients += 1;

        for _ in 0..rng.gen_range(1..=3) {
            let policy = sample_policy(&mut rng, &client.id, options.today, &mut used_numbers)?;
            store.add_policy(policy)?;
            summary.policies += 1;
        }
    }

    let report = generate_reminders(store, options.today, DEFAULT_HORIZON_DAYS)?;
    summary.reminders = report.created_count();

    tracing::info!(
        clients = summary.clients,
        policies = summary.policies,
        reminders = summary.reminders,
        "sample data seeded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn options(clients: usize, seed: u64) -> SeedOptions {
        SeedOptions {
            clients,
            rng_seed: Some(seed),
            ..SeedOptions::new(today())
        }
    }

    #[test]
    fn seeds_one_to_three_policies_per_client() {
        let store = Store::open_memory().unwrap();
        let summary = seed(&store, &options(10, 7)).unwrap();

        assert_eq!(summary.clients, 10);
        assert!((10..=30).contains(&summary.policies));
        for client in store.list_clients().unwrap() {
            let count = store.find_policies_by_client(&client.id).unwrap().len();
            assert!((1..=3).contains(&count), "client has {count} policies");
        }
    }

    #[test]
    fn seeded_policies_follow_the_sample_shape() {
        let store = Store::open_memory().unwrap();
        seed(&store, &options(5, 42)).unwrap();

        let earliest = today() - Days::new(START_WINDOW_DAYS);
        for policy in store.list_policies().unwrap() {
            assert!(policy.policy_number.starts_with("KE-"));
            assert_eq!(policy.policy_number.len(), 11);
            assert_eq!(policy.days_until_expiry(policy.start_date), 365);
            assert!(policy.start_date >= earliest && policy.start_date <= today());
            assert!((5_000.0..=100_000.0).contains(&policy.premium_amount));
            assert!(POLICY_TYPES.contains(&policy.policy_type.as_str()));
        }
    }

    #[test]
    fn reminders_cover_every_expiring_policy() {
        let store = Store::open_memory().unwrap();
        let summary = seed(&store, &options(8, 3)).unwrap();

        let expiring = store.find_expiring_policies(today(), 90).unwrap();
        assert_eq!(summary.reminders, expiring.len());
        for policy in expiring {
            assert!(store.pending_reminder_for_policy(&policy.id).unwrap().is_some());
        }
    }

    #[test]
    fn same_seed_gives_same_data() {
        let a = Store::open_memory().unwrap();
        let b = Store::open_memory().unwrap();
        seed(&a, &options(4, 99)).unwrap();
        seed(&b, &options(4, 99)).unwrap();

        let numbers = |s: &Store| -> Vec<String> {
            s.list_policies()
                .unwrap()
                .into_iter()
                .map(|p| p.policy_number)
                .collect()
        };
        assert_eq!(numbers(&a), numbers(&b));
    }

    #[test]
    fn seeding_twice_keeps_policy_numbers_unique() {
        let store = Store::open_memory().unwrap();
        seed(&store, &options(5, 1)).unwrap();
        seed(&store, &options(5, 1)).unwrap();

        let policies = store.list_policies().unwrap();
        let unique: HashSet<_> = policies.iter().map(|p| &p.policy_number).collect();
        assert_eq!(unique.len(), policies.len());
    }
}
