//! Shopfront CLI - Browse the catalog and replay shopping sessions.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally narrowed like the home screen
//! shop-cli catalog list --category Electronics --query watch
//!
//! # Search like the search screen
//! shop-cli catalog search "running shoes"
//!
//! # Estimate shipping, tax and total for a subtotal
//! shop-cli quote 50.01
//!
//! # Replay a session script, answering every confirmation with yes
//! shop-cli session run demos/weekend.yaml --yes
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, search and show products and categories
//! - `quote` - Order total estimate
//! - `session run` - Replay a YAML session script against fresh stores

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Estimate shipping, tax and total for a subtotal
    Quote {
        /// Subtotal in dollars (e.g. 25.00)
        subtotal: String,
    },
    /// Replay shopping sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, filtered by category and query
    List {
        /// Category name (`All` for every category)
        #[arg(short, long, default_value = "All")]
        category: String,

        /// Case-insensitive match on name or category
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Search products by name or category
    Search {
        /// Search text
        query: String,
    },
    /// Show a single product
    Show {
        /// Product ID
        id: String,
    },
    /// List categories
    Categories,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Run a YAML session script
    Run {
        /// Path to the script
        file: PathBuf,

        /// Confirm every removal and checkout without asking
        #[arg(short, long)]
        yes: bool,

        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout carries only command output (`--json`).
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_cli=info,shopfront_store=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::from_env()?;

    match cli.command {
        Commands::Catalog { action } => {
            let catalog = commands::load_catalog(&config).await?;
            match action {
                CatalogAction::List { category, query } => {
                    commands::catalog::list(&catalog, &category, &query);
                }
                CatalogAction::Search { query } => commands::catalog::search(&catalog, &query),
                CatalogAction::Show { id } => commands::catalog::show(&catalog, &id)?,
                CatalogAction::Categories => commands::catalog::categories(&catalog),
            }
        }
        Commands::Quote { subtotal } => commands::quote::quote(&subtotal)?,
        Commands::Session { action } => match action {
            SessionAction::Run { file, yes, json } => {
                let catalog = commands::load_catalog(&config).await?;
                let auto_confirm = yes || config.auto_confirm;
                commands::session::run(catalog, &file, auto_confirm, json).await?;
            }
        },
    }
    Ok(())
}
