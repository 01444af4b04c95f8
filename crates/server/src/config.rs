//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `NIGHTHAWK_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `NIGHTHAWK_HOST` - Bind address (default: 127.0.0.1)
//! - `NIGHTHAWK_PORT` - Listen port (default: 8085)
//! - `NIGHTHAWK_BASE_URL` - Public URL (default: <http://localhost:8085>)
//! - `NIGHTHAWK_STATIC_DIR` - Static asset directory (default: crates/server/static)
//! - `NIGHTHAWK_SEED_ON_STARTUP` - Run the sample-data seeder before serving (default: true)
//! - `NIGHTHAWK_DEFAULT_PASSWORD` - Password backfilled onto customers without one
//! - `NIGHTHAWK_DEFAULT_PRODUCT` - Product granted to customers without any (default: `ROLE_USER`)
//! - `NIGHTHAWK_LOG_JSON` - Emit JSON logs instead of text (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate, 0.0 to 1.0 (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 2.5;
const DEFAULT_PRODUCT: &str = "ROLE_USER";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Whether to run the seeder before binding the listener
    pub seed_on_startup: bool,
    /// Backfill applied after seeding (only when a default password is configured)
    pub defaults: Option<DefaultsConfig>,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Defaults backfilled onto existing customers.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct DefaultsConfig {
    /// Plaintext password hashed onto customers with a blank password
    pub password: SecretString,
    /// Product granted to customers with no products
    pub product: String,
}

impl std::fmt::Debug for DefaultsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultsConfig")
            .field("password", &"[REDACTED]")
            .field("product", &self.product)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the default password fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("NIGHTHAWK_DATABASE_URL")?;
        let host = parse_env("NIGHTHAWK_HOST", "127.0.0.1")?;
        let port = parse_env("NIGHTHAWK_PORT", "8085")?;
        let base_url = get_env_or_default("NIGHTHAWK_BASE_URL", "http://localhost:8085");
        let static_dir =
            PathBuf::from(get_env_or_default("NIGHTHAWK_STATIC_DIR", "crates/server/static"));
        let seed_on_startup = get_bool_env("NIGHTHAWK_SEED_ON_STARTUP", true)?;
        let defaults = DefaultsConfig::from_env()?;
        let log_json = get_bool_env("NIGHTHAWK_LOG_JSON", false)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            static_dir,
            seed_on_startup,
            defaults,
            log_json,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl DefaultsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(password) = get_optional_env("NIGHTHAWK_DEFAULT_PASSWORD") else {
            return Ok(None);
        };
        validate_secret_strength(&password, "NIGHTHAWK_DEFAULT_PASSWORD")?;

        Ok(Some(Self {
            password: SecretString::from(password),
            product: get_env_or_default("NIGHTHAWK_DEFAULT_PRODUCT", DEFAULT_PRODUCT),
        }))
    }

    /// The plaintext default password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Read a boolean flag from the environment.
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| parse_bool(key, &raw))
}

/// Parse the usual spellings of a boolean flag.
fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
///
/// `var_name` names the source of the secret in the error.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` for placeholders, blank values and
/// low-entropy strings.
pub fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            database_url: SecretString::from("postgres://localhost/nighthawk"),
            host: "0.0.0.0".parse().unwrap(),
            port: 8085,
            base_url: "http://localhost:8085".to_string(),
            static_dir: PathBuf::from("static"),
            seed_on_startup: true,
            defaults: Some(DefaultsConfig {
                password: SecretString::from("s3cr3t-Backfill!"),
                product: "ROLE_USER".to_string(),
            }),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_parse_bool_spellings() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(parse_bool("X", " on ").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(!parse_bool("X", "no").unwrap());
        assert!(matches!(
            parse_bool("X", "maybe"),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "X"
        ));
    }

    #[test]
    fn test_shannon_entropy_bounds() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("zzzz") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_default_password_rejects_placeholders() {
        let err = validate_secret_strength("changeme-now", "NIGHTHAWK_DEFAULT_PASSWORD");
        assert!(matches!(err, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_default_password_rejects_low_entropy() {
        let err = validate_secret_strength("aaaaaaaaaaaa", "NIGHTHAWK_DEFAULT_PASSWORD");
        assert!(matches!(err, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_default_password_rejects_blank() {
        let err = validate_secret_strength("", "--password");
        assert!(matches!(err, Err(ConfigError::InsecureSecret(name, _)) if name == "--password"));
    }

    #[test]
    fn test_default_password_accepts_seed_style_password() {
        assert!(validate_secret_strength("123Qwerty!", "NIGHTHAWK_DEFAULT_PASSWORD").is_ok());
    }

    #[test]
    fn test_socket_addr_and_secure_flag() {
        let mut config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.to_string(), "0.0.0.0:8085");
        assert!(!config.is_secure());

        config.base_url = "https://customers.nighthawk.dev".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_defaults_debug_redacts_password() {
        let config = test_config();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("ROLE_USER"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("s3cr3t-Backfill!"));
    }
}
