//! CLI subcommands.

pub mod defaults;
pub mod migrate;
pub mod product;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by every subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Rejected command-line value.
    #[error("{0}")]
    Config(#[from] nighthawk_server::config::ConfigError),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Service operation failed.
    #[error("{0}")]
    Service(#[from] nighthawk_server::services::ServiceError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Invalid product name.
    #[error("Product name must not be blank")]
    BlankProduct,

    /// Product does not exist.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// No customer uses this email.
    #[error("Unknown customer: {0}")]
    UnknownCustomer(String),
}

/// Resolve the database URL from `NIGHTHAWK_DATABASE_URL` or `DATABASE_URL`.
fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("NIGHTHAWK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("NIGHTHAWK_DATABASE_URL"))
}

/// Connect to the customer database.
async fn connect() -> Result<PgPool, CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    Ok(nighthawk_server::db::create_pool(&database_url).await?)
}
