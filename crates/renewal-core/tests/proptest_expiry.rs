use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use renewal_core::{expiry_cutoff, generate_reminders, NewClient, NewPolicy, Store};

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // 2000-01-01 plus up to ~60 years
    (0u64..22_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Days::new(offset)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn expiring_iff_end_date_within_cutoff(
        as_of in arb_date(),
        horizon in 0u32..400,
        offsets in prop::collection::vec(-500i64..900, 1..8),
    ) {
        let store = Store::open_memory().unwrap();
        let client = store.add_client(NewClient::new("Brian Otieno", "brian@example.com")).unwrap();

        let mut expected = Vec::new();
        for (n, offset) in offsets.iter().enumerate() {
            let end_date = if *offset >= 0 {
                as_of + Days::new(*offset as u64)
            } else {
                as_of - Days::new(offset.unsigned_abs())
            };
            let policy = store.add_policy(NewPolicy {
                client_id: client.id.clone(),
                policy_number: format!("KE-{n:08}"),
                policy_type: "Health Insurance".to_string(),
                start_date: end_date,
                end_date,
                premium_amount: 1.0,
                insurance_company: None,
            }).unwrap();
            if *offset <= i64::from(horizon) {
                expected.push(policy.id);
            }
        }

        let mut found: Vec<_> = store
            .find_expiring_policies(as_of, horizon)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        found.sort();
        expected.sort();
        prop_assert_eq!(found, expected);

        for policy in store.find_expiring_policies(as_of, horizon).unwrap() {
            prop_assert!(policy.end_date <= expiry_cutoff(as_of, horizon));
        }
    }

    #[test]
    fn generating_twice_never_adds_pending(
        as_of in arb_date(),
        horizon in 0u32..200,
        offsets in prop::collection::vec(0u64..300, 1..6),
    ) {
        let store = Store::open_memory().unwrap();
        let client = store.add_client(NewClient::new("Mercy Mutua", "mercy@example.com")).unwrap();
        for (n, offset) in offsets.iter().enumerate() {
            let end_date = as_of + Days::new(*offset);
            store.add_policy(NewPolicy {
                client_id: client.id.clone(),
                policy_number: format!("KE-{n:08}"),
                policy_type: "Life Insurance".to_string(),
                start_date: as_of,
                end_date,
                premium_amount: 10.0,
                insurance_company: None,
            }).unwrap();
        }

        let first = generate_reminders(&store, as_of, horizon).unwrap();
        let second = generate_reminders(&store, as_of, horizon).unwrap();
        prop_assert!(second.created.is_empty());
        prop_assert_eq!(store.find_pending_reminders().unwrap().len(), first.created.len());
    }
}
