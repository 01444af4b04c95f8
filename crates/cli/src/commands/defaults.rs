//! Customer defaults backfill command.

use nighthawk_server::config::validate_secret_strength;
use nighthawk_server::services::CustomerService;

use super::{CommandError, connect};

/// Set `password` on customers without one and grant `product` to customers without any.
///
/// The password must pass the same strength check as `NIGHTHAWK_DEFAULT_PASSWORD`.
pub async fn run(password: &str, product: &str) -> Result<(), CommandError> {
    check_arguments(password, product)?;

    let pool = connect().await?;
    let report = CustomerService::new(&pool)
        .defaults(password, product.trim())
        .await?;

    tracing::info!(
        "Defaults applied: {} passwords set, {} customers granted {}",
        report.passwords_set,
        report.products_granted,
        product
    );
    Ok(())
}

/// Reject weak passwords and blank product names before connecting.
fn check_arguments(password: &str, product: &str) -> Result<(), CommandError> {
    validate_secret_strength(password, "--password")?;
    if product.trim().is_empty() {
        return Err(CommandError::BlankProduct);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use nighthawk_server::config::ConfigError;

    use super::*;

    #[test]
    fn test_blank_password_is_rejected() {
        assert!(matches!(
            check_arguments("", "ROLE_USER"),
            Err(CommandError::Config(ConfigError::InsecureSecret(_, _)))
        ));
    }

    #[test]
    fn test_weak_password_is_rejected() {
        assert!(matches!(
            check_arguments("aaaaaaaa", "ROLE_USER"),
            Err(CommandError::Config(ConfigError::InsecureSecret(_, _)))
        ));
        assert!(matches!(
            check_arguments("changeme123", "ROLE_USER"),
            Err(CommandError::Config(ConfigError::InsecureSecret(_, _)))
        ));
    }

    #[test]
    fn test_blank_product_is_rejected() {
        assert!(matches!(
            check_arguments("s3cr3t-Backfill!", "  "),
            Err(CommandError::BlankProduct)
        ));
    }

    #[test]
    fn test_strong_password_passes() {
        assert!(check_arguments("s3cr3t-Backfill!", "ROLE_USER").is_ok());
    }
}
