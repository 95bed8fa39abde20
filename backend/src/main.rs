use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use finance_tracker::config::AppConfig;
use finance_tracker::domain::models::RawAttributes;
use finance_tracker::initialize_backend;
use finance_tracker::io::mappers::user_mapper::UserMapper;

#[derive(Parser)]
#[command(name = "finance-tracker")]
#[command(about = "Accounts and identity-provider logins for the finance tracker", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database URL, overrides the configuration
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with a provider's user-info JSON, provisioning the account if needed
    Login {
        /// Provider tag, e.g. google or vk
        #[arg(long)]
        provider: String,

        /// File holding the user-info JSON object; stdin when omitted or "-"
        #[arg(long)]
        attributes: Option<PathBuf>,
    },
    /// Inspect provisioned users
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// List enabled identity providers
    Providers,
}

#[derive(Subcommand)]
enum UsersCommand {
    List,
    Show { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let state = initialize_backend(&config).await?;
    let accounts = &state.account_service;

    match cli.command {
        Commands::Login { provider, attributes } => {
            let attributes = read_attributes(attributes)?;
            let outcome = accounts.login(&provider, &attributes).await?;
            info!("Login complete for user {}", outcome.user.id);
            print_json(&UserMapper::to_login_dto(outcome))
        }
        Commands::Users { command: UsersCommand::List } => {
            let users = accounts.list_users().await?;
            print_json(&UserMapper::to_user_list_dto(users))
        }
        Commands::Users { command: UsersCommand::Show { id } } => {
            let user = accounts
                .get_user(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("User not found: {}", id))?;
            print_json(&UserMapper::to_dto(user))
        }
        Commands::Providers => {
            print_json(&UserMapper::to_provider_list_dto(accounts.enabled_providers()))
        }
    }
}

fn read_attributes(source: Option<PathBuf>) -> Result<RawAttributes> {
    let content = match source {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read attributes from {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read attributes from stdin")?;
            buffer
        }
    };

    serde_json::from_str(&content).context("User info must be a JSON object")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
