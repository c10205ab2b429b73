//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and routes each subcommand to
//! its handler. Handlers are thin consumers of [`crate::api::ApiClient`]
//! and [`crate::session::SessionManager`].

pub mod ask;
pub mod billing;
pub mod credits;
pub mod health;
pub mod stats;
pub mod user;
pub mod workspace;

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::api::ApiClient;
use crate::core::config::Config;
use crate::session::store::KeyringStore;
use crate::session::SessionManager;

#[derive(Parser)]
#[command(name = "fraga")]
#[command(about = "A terminal client for a document question-answering backend")]
#[command(version, long_about = "Fraga asks questions against your indexed documents through a \
RAG backend and manages the workspaces, account, and credits behind them.\n\n\
Configuration:\n\
  fraga set base-url <URL>         Point at a specific backend\n\
  fraga set default-workspace <WS> Workspace used when --workspace is absent\n\n\
Environment Variables:\n\
  FRAGA_BASE_URL    Backend base URL (config file takes precedence;\n\
                    defaults to http://localhost:8000)\n\
  RUST_LOG          Diagnostic log filter, e.g. fraga=debug")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with email and password
    Login {
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and log in
    Register {
        name: String,
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Drop the stored session
    Logout,
    /// Show the identity behind the current session
    Whoami,
    /// Ask a question against the indexed documents
    Ask {
        question: String,
        /// Workspace to query (falls back to the configured default)
        #[arg(short, long)]
        workspace: Option<String>,
        /// answer | summary | extract
        #[arg(short, long, default_value = "answer")]
        mode: String,
        /// Restrict the query to specific documents (repeatable)
        #[arg(long = "doc-id")]
        doc_ids: Vec<String>,
        /// Ask the backend for debug output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Check backend health and index status
    Health,
    /// Manage workspaces
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },
    /// Show usage statistics for the current account
    Stats,
    /// Show recent queries
    Recent,
    /// Show query activity per workspace
    Activity,
    /// Credits balance, history, and purchases
    Credits {
        #[command(subcommand)]
        command: CreditsCommands,
    },
    /// Subscription info, checkout, and the billing portal
    Billing {
        #[command(subcommand)]
        command: BillingCommands,
    },
    /// Set configuration values (base-url, default-workspace)
    Set { key: String, value: String },
    /// Unset configuration values
    Unset { key: String },
}

#[derive(Subcommand)]
pub enum WorkspaceCommands {
    /// List workspaces
    List,
    /// Create a workspace
    Create { name: String },
    /// Rename a workspace
    Rename { id: String, name: String },
    /// Delete a workspace
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum CreditsCommands {
    /// Show the current balance and monthly allocation
    Balance,
    /// Show the transaction history
    History,
    /// Buy a credit package (e.g. credits_100)
    Buy { package_id: String },
}

#[derive(Subcommand)]
pub enum BillingCommands {
    /// Show the current subscription
    Info,
    /// Start a subscription checkout for a price id
    Checkout { price_id: String },
    /// Open the billing portal
    Portal,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    crate::logging::init();
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        Commands::Login { email, password } => user::login(&email, password).await,
        Commands::Register {
            name,
            email,
            password,
        } => user::register(&name, &email, password).await,
        Commands::Logout => user::logout(),
        Commands::Whoami => user::whoami().await,
        Commands::Ask {
            question,
            workspace,
            mode,
            doc_ids,
            verbose,
        } => ask::run_ask(&question, workspace, &mode, doc_ids, verbose).await,
        Commands::Health => health::run_health().await,
        Commands::Workspace { command } => workspace::run(command).await,
        Commands::Stats => stats::run_stats().await,
        Commands::Recent => stats::run_recent().await,
        Commands::Activity => stats::run_activity().await,
        Commands::Credits { command } => credits::run(command).await,
        Commands::Billing { command } => billing::run(command).await,
        Commands::Set { key, value } => set_config(&key, &value),
        Commands::Unset { key } => unset_config(&key),
    }
}

/// Build a restored session for commands that may need authentication.
pub(crate) fn build_session() -> Result<SessionManager, Box<dyn Error>> {
    let config = Config::load()?;
    let client = ApiClient::from_config(&config);
    let mut session = SessionManager::new(client, Box::new(KeyringStore::new()));
    session.restore()?;
    Ok(session)
}

fn set_config(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    match key {
        "base-url" => {
            Config::mutate(|config| {
                config.base_url = Some(value.to_string());
                Ok(())
            })?;
            println!("✅ Set base-url to: {value}");
            Ok(())
        }
        "default-workspace" => {
            Config::mutate(|config| {
                config.default_workspace = Some(value.to_string());
                Ok(())
            })?;
            println!("✅ Set default-workspace to: {value}");
            Ok(())
        }
        _ => Err(format!("Unknown config key: {key}").into()),
    }
}

fn unset_config(key: &str) -> Result<(), Box<dyn Error>> {
    match key {
        "base-url" => {
            Config::mutate(|config| {
                config.base_url = None;
                Ok(())
            })?;
            println!("✅ Unset base-url");
            Ok(())
        }
        "default-workspace" => {
            Config::mutate(|config| {
                config.default_workspace = None;
                Ok(())
            })?;
            println!("✅ Unset default-workspace");
            Ok(())
        }
        _ => Err(format!("Unknown config key: {key}").into()),
    }
}
