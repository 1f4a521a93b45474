//! Client management commands for CLI.

use clap::Subcommand;
use renewal_core::{ClientUpdate, Config, NewClient, Store};

use super::{delete_mode, not_found, print_json, CliResult};

#[derive(Subcommand)]
pub enum ClientAction {
    /// Register a new client
    Add {
        /// Full name
        name: String,
        /// Contact email
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Show one client
    Get { id: String },
    /// List all clients
    List,
    /// Change client fields
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Delete a client
    Delete {
        id: String,
        /// Also delete the client's policies and their reminders
        #[arg(long)]
        cascade: bool,
    },
    /// List the policies a client holds
    Policies { id: String },
}

pub fn run(action: ClientAction) -> CliResult {
    let store = Store::open()?;

    match action {
        ClientAction::Add {
            name,
            email,
            phone,
            address,
        } => {
            let client = store.add_client(NewClient {
                name,
                email,
                phone,
                address,
            })?;
            eprintln!("Client created: {}", client.id);
            print_json(&client)?;
        }
        ClientAction::Get { id } => {
            let client = store.get_client(&id)?.ok_or_else(|| not_found("client", &id))?;
            print_json(&client)?;
        }
        ClientAction::List => {
            print_json(&store.list_clients()?)?;
        }
        ClientAction::Update {
            id,
            name,
            email,
            phone,
            address,
        } => {
            let update = ClientUpdate {
                name,
                email,
                phone,
                address,
            };
            if update.is_empty() {
                return Err("nothing to update".into());
            }
            let client = store
                .update_client(&id, update)?
                .ok_or_else(|| not_found("client", &id))?;
            print_json(&client)?;
        }
        ClientAction::Delete { id, cascade } => {
            let config = Config::load()?;
            if !store.delete_client(&id, delete_mode(cascade, &config))? {
                return Err(not_found("client", &id));
            }
            println!("Client deleted: {id}");
        }
        ClientAction::Policies { id } => {
            if store.get_client(&id)?.is_none() {
                return Err(not_found("client", &id));
            }
            print_json(&store.find_policies_by_client(&id)?)?;
        }
    }
    Ok(())
}
