use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use renewal_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "renewal", version, about = "Insurance renewal tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Client management
    Client {
        #[command(subcommand)]
        action: commands::client::ClientAction,
    },
    /// Policy management and expiry lookups
    Policy {
        #[command(subcommand)]
        action: commands::policy::PolicyAction,
    },
    /// Renewal reminders
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Fill the store with sample clients and policies
    Seed(commands::seed::SeedArgs),
    /// Print a shell completion script
    Completions {
        shell: Shell,
    },
}

fn init_logging() {
    // RUST_LOG wins over the configured filter
    let fallback = Config::load()
        .map(|c| c.log.filter)
        .unwrap_or_else(|_| "warn".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "renewal", &mut std::io::stdout());
        return;
    }

    init_logging();

    let result = match cli.command {
        Commands::Client { action } => commands::client::run(action),
        Commands::Policy { action } => commands::policy::run(action),
        Commands::Reminder { action } => commands::reminder::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Seed(args) => commands::seed::run(args),
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
