//! Basic CLI E2E tests.
//!
//! Each test runs the built `renewal` binary against its own data directory.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

struct Cli {
    home: TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_renewal"))
            .args(args)
            .env("RENEWAL_HOME", self.home.path())
            .env_remove("RUST_LOG")
            .env_remove("RENEWAL_SEED")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        (stdout, stderr, code)
    }

    fn ok(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "command {args:?} failed: {stderr}");
        stdout
    }

    fn json(&self, args: &[&str]) -> Value {
        serde_json::from_str(&self.ok(args)).expect("Failed to parse JSON output")
    }

    fn fail(&self, args: &[&str]) -> String {
        let (_, stderr, code) = self.run(args);
        assert_ne!(code, 0, "command {args:?} unexpectedly succeeded");
        stderr
    }

    fn add_client(&self, name: &str, email: &str) -> String {
        let client = self.json(&["client", "add", name, email, "--phone", "0712345678"]);
        client["id"].as_str().unwrap().to_string()
    }

    fn add_policy(&self, client_id: &str, number: &str, end: &str) -> String {
        let policy = self.json(&[
            "policy",
            "add",
            client_id,
            number,
            "--type",
            "Health Insurance",
            "--start",
            "2026-01-01",
            "--end",
            end,
            "--premium",
            "45000",
            "--company",
            "Britam",
        ]);
        policy["id"].as_str().unwrap().to_string()
    }
}

#[test]
fn test_client_add_and_list() {
    let cli = Cli::new();
    let id = cli.add_client("Grace Kamau", "grace@example.com");

    let clients = cli.json(&["client", "list"]);
    let clients = clients.as_array().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0]["id"], id.as_str());
    assert_eq!(clients[0]["phone"], "0712345678");

    let fetched = cli.json(&["client", "get", &id]);
    assert_eq!(fetched["name"], "Grace Kamau");
}

#[test]
fn test_client_update() {
    let cli = Cli::new();
    let id = cli.add_client("Kevin Otieno", "kevin@example.com");
    let updated = cli.json(&["client", "update", &id, "--email", "kevin@example.org"]);
    assert_eq!(updated["email"], "kevin@example.org");
    assert_eq!(updated["name"], "Kevin Otieno");
}

#[test]
fn test_missing_client_fails() {
    let cli = Cli::new();
    let stderr = cli.fail(&["client", "get", "does-not-exist"]);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_policy_add_and_expiring() {
    let cli = Cli::new();
    let client_id = cli.add_client("Ann Njeri", "ann@example.com");
    let soon = cli.add_policy(&client_id, "KE-10000001", "2026-12-31");
    cli.add_policy(&client_id, "KE-10000002", "2027-06-30");

    let expiring = cli.json(&["policy", "expiring", "--as-of", "2026-10-19", "--days", "90"]);
    let expiring = expiring.as_array().unwrap();
    assert_eq!(expiring.len(), 1);
    assert_eq!(expiring[0]["id"], soon.as_str());
    assert_eq!(expiring[0]["type"], "Health Insurance");
    assert_eq!(expiring[0]["days_until_expiry"], 73);

    let owned = cli.json(&["client", "policies", &client_id]);
    assert_eq!(owned.as_array().unwrap().len(), 2);
}

#[test]
fn test_duplicate_policy_number_rejected() {
    let cli = Cli::new();
    let client_id = cli.add_client("David Mutua", "david@example.com");
    cli.add_policy(&client_id, "KE-20000000", "2026-12-31");

    let stderr = cli.fail(&[
        "policy", "add", &client_id, "KE-20000000", "--type", "Life Insurance", "--start",
        "2026-01-01", "--end", "2026-12-31", "--premium", "100",
    ]);
    assert!(stderr.contains("KE-20000000"));
    assert_eq!(cli.json(&["policy", "list"]).as_array().unwrap().len(), 1);
}

#[test]
fn test_invalid_date_is_rejected() {
    let cli = Cli::new();
    cli.fail(&["policy", "expiring", "--as-of", "19/10/2026"]);
}

#[test]
fn test_reminder_generate_is_idempotent() {
    let cli = Cli::new();
    let client_id = cli.add_client("Mercy Wanjiru", "mercy@example.com");
    let policy_id = cli.add_policy(&client_id, "KE-30000000", "2026-11-15");

    let first = cli.json(&["reminder", "generate", "--as-of", "2026-10-19", "--days", "90"]);
    assert_eq!(first["created"].as_array().unwrap().len(), 1);
    assert_eq!(first["created"][0]["reminder_date"], "2026-10-19");

    let second = cli.json(&["reminder", "generate", "--as-of", "2026-10-19", "--days", "90"]);
    assert!(second["created"].as_array().unwrap().is_empty());
    assert_eq!(second["already_pending"][0], policy_id.as_str());

    let pending = cli.json(&["reminder", "pending"]);
    assert_eq!(pending.as_array().unwrap().len(), 1);
}

#[test]
fn test_reminder_status_change() {
    let cli = Cli::new();
    let client_id = cli.add_client("Joy Akinyi", "joy@example.com");
    let policy_id = cli.add_policy(&client_id, "KE-40000000", "2026-11-01");

    let report = cli.json(&["reminder", "generate", "--as-of", "2026-10-19"]);
    let reminder_id = report["created"][0]["id"].as_str().unwrap().to_string();

    let sent = cli.json(&["reminder", "status", &reminder_id, "sent"]);
    assert_eq!(sent["status"], "sent");
    assert!(cli.json(&["reminder", "pending"]).as_array().unwrap().is_empty());

    cli.fail(&["reminder", "status", &reminder_id, "forgotten"]);

    let again = cli.json(&["reminder", "generate", "--as-of", "2026-10-19"]);
    assert_eq!(again["created"].as_array().unwrap().len(), 1);
    let history = cli.json(&["policy", "reminders", &policy_id]);
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[test]
fn test_delete_client_restrict_then_cascade() {
    let cli = Cli::new();
    let client_id = cli.add_client("Samuel Ngugi", "samuel@example.com");
    cli.add_policy(&client_id, "KE-50000000", "2026-11-01");

    cli.fail(&["client", "delete", &client_id]);
    assert_eq!(cli.json(&["client", "list"]).as_array().unwrap().len(), 1);

    cli.ok(&["client", "delete", &client_id, "--cascade"]);
    assert!(cli.json(&["client", "list"]).as_array().unwrap().is_empty());
    assert!(cli.json(&["policy", "list"]).as_array().unwrap().is_empty());
}

#[test]
fn test_config_set_and_get() {
    let cli = Cli::new();
    assert_eq!(cli.ok(&["config", "get", "reminders.horizon_days"]).trim(), "90");

    cli.ok(&["config", "set", "reminders.horizon_days", "30"]);
    assert_eq!(cli.ok(&["config", "get", "reminders.horizon_days"]).trim(), "30");

    cli.fail(&["config", "get", "no.such.key"]);
    cli.fail(&["config", "set", "reminders.horizon_days", "soon"]);

    cli.ok(&["config", "reset"]);
    assert_eq!(cli.ok(&["config", "get", "reminders.horizon_days"]).trim(), "90");
}

#[test]
fn test_configured_horizon_is_default() {
    let cli = Cli::new();
    let client_id = cli.add_client("Esther Ouko", "esther@example.com");
    cli.add_policy(&client_id, "KE-60000000", "2026-12-31");
    cli.ok(&["config", "set", "reminders.horizon_days", "30"]);

    let expiring = cli.json(&["policy", "expiring", "--as-of", "2026-10-19"]);
    assert!(expiring.as_array().unwrap().is_empty());
}

#[test]
fn test_seed_is_reproducible() {
    let a = Cli::new();
    let b = Cli::new();
    let summary = a.json(&["seed", "--clients", "3", "--seed", "11"]);
    b.json(&["seed", "--clients", "3", "--seed", "11"]);
    assert_eq!(summary["clients"], 3);

    let numbers = |cli: &Cli| -> Vec<Value> {
        cli.json(&["policy", "list"])
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["policy_number"].clone())
            .collect()
    };
    assert_eq!(numbers(&a), numbers(&b));
}

#[test]
fn test_completions() {
    let cli = Cli::new();
    let script = cli.ok(&["completions", "bash"]);
    assert!(script.contains("renewal"));
}
