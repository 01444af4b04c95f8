//! Nighthawk CLI - Database migrations, seeding and customer backfills.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! nh-cli migrate
//!
//! # Insert the sample customers and jokes that are missing
//! nh-cli seed
//!
//! # Give blank-password customers a password and product-less customers a product
//! nh-cli defaults --password 'S0me-Strong!Pass' --product ROLE_USER
//!
//! # Manage products
//! nh-cli product add ROLE_ADMIN
//! nh-cli product list
//! nh-cli product grant --email toby@gmail.com --product ROLE_ADMIN
//! ```
//!
//! # Environment Variables
//!
//! - `NIGHTHAWK_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "nh-cli")]
#[command(author, version, about = "Nighthawk customer CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert missing sample customers and jokes
    Seed,
    /// Backfill default passwords and products
    Defaults {
        /// Password given to customers that have none
        #[arg(short, long)]
        password: String,

        /// Product granted to customers that have none
        #[arg(long, default_value = "ROLE_USER")]
        product: String,
    },
    /// Manage customer products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create a product unless it already exists
    Add {
        /// Product name (e.g. `ROLE_ADMIN`)
        name: String,
    },
    /// List every product
    List,
    /// Attach a product to a customer
    Grant {
        /// Customer email address
        #[arg(short, long)]
        email: String,

        /// Product name
        #[arg(short, long)]
        product: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Defaults { password, product } => {
            commands::defaults::run(&password, &product).await?;
        }
        Commands::Product { action } => match action {
            ProductAction::Add { name } => commands::product::add(&name).await?,
            ProductAction::List => commands::product::list().await?,
            ProductAction::Grant { email, product } => {
                commands::product::grant(&email, &product).await?;
            }
        },
    }
    Ok(())
}
