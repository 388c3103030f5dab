//! Mono CLI - Catalog inspection and shop state management.
//!
//! # Usage
//!
//! ```bash
//! # List the product catalog
//! mono-cli catalog list
//!
//! # List featured earbuds only
//! mono-cli catalog list --category Earbuds --featured
//!
//! # Show one product
//! mono-cli catalog show 1
//!
//! # Clear the persisted cart
//! mono-cli reset cart
//!
//! # Clear everything (cart, wishlist, saved address)
//! mono-cli reset all
//! ```
//!
//! # Commands
//!
//! - `catalog` - Inspect the product catalog
//! - `reset` - Remove persisted shop state records

#![cfg_attr(not(test), forbid(unsafe_code))]
// Command output belongs on stdout
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use mono_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "mono-cli")]
#[command(author, version, about = "Mono Audio CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Remove persisted shop state records
    Reset {
        /// What to remove (default: all)
        #[command(subcommand)]
        target: Option<ResetTarget>,

        /// Data directory holding the records (default: MONO_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List catalog products as JSON
    List {
        /// Filter by category (Headphones, Earbuds, Accessories)
        #[arg(short, long)]
        category: Option<String>,

        /// Only list featured products
        #[arg(short, long)]
        featured: bool,
    },
    /// Show one product as JSON
    Show {
        /// Product id
        id: i32,
    },
}

#[derive(Subcommand)]
enum ResetTarget {
    /// Remove the persisted cart
    Cart,
    /// Remove the persisted wishlist
    Wishlist,
    /// Remove the saved checkout address
    Address,
    /// Remove all persisted records
    All,
}

fn main() {
    // Load .env first so RUST_LOG from it reaches the subscriber
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { category, featured } => {
                commands::catalog::list(category.as_deref(), featured)?;
            }
            CatalogAction::Show { id } => commands::catalog::show(id)?,
        },
        Commands::Reset { target, data_dir } => {
            let data_dir = match data_dir {
                Some(dir) => dir,
                None => StorefrontConfig::from_env()?.data_dir,
            };
            let target = match target {
                Some(ResetTarget::Cart) => commands::reset::Target::Cart,
                Some(ResetTarget::Wishlist) => commands::reset::Target::Wishlist,
                Some(ResetTarget::Address) => commands::reset::Target::Address,
                Some(ResetTarget::All) | None => commands::reset::Target::All,
            };
            commands::reset::run(&data_dir, target)?;
        }
    }
    Ok(())
}
