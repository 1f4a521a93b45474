use clap::Args;
use renewal_core::{SeedOptions, Store};

use super::{print_json, today, CliResult};

#[derive(Args)]
pub struct SeedArgs {
    /// Number of clients to create
    #[arg(long, default_value_t = 10)]
    clients: usize,
    /// RNG seed for reproducible data
    #[arg(long, env = "RENEWAL_SEED")]
    seed: Option<u64>,
}

pub fn run(args: SeedArgs) -> CliResult {
    let store = Store::open()?;
    let options = SeedOptions {
        clients: args.clients,
        rng_seed: args.seed,
        ..SeedOptions::new(today())
    };
    let summary = renewal_core::seed(&store, &options)?;
    print_json(&summary)
}
