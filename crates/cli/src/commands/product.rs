//! Product management commands.
//!
//! # Usage
//!
//! ```bash
//! nh-cli product add ROLE_ADMIN
//! nh-cli product list
//! nh-cli product grant -e toby@gmail.com -p ROLE_ADMIN
//! ```

use nighthawk_core::Email;
use nighthawk_server::services::CustomerService;

use super::{CommandError, connect};

/// Create a product if no product with that name exists.
pub async fn add(name: &str) -> Result<(), CommandError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::BlankProduct);
    }

    let pool = connect().await?;
    let product = CustomerService::new(&pool).save_product(name).await?;

    tracing::info!("Product ready: {} (ID: {})", product.name, product.id);
    Ok(())
}

/// Log every product.
pub async fn list() -> Result<(), CommandError> {
    let pool = connect().await?;
    let products = CustomerService::new(&pool).list_products().await?;

    tracing::info!("{} products", products.len());
    for product in products {
        tracing::info!("  {} (ID: {})", product.name, product.id);
    }
    Ok(())
}

/// Attach `product` to the customer registered under `email`.
///
/// Granting a product the customer already holds is a no-op.
pub async fn grant(email: &str, product: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|_| CommandError::InvalidEmail(email.to_owned()))?;

    let pool = connect().await?;
    let service = CustomerService::new(&pool);

    if service.find_product(product).await?.is_none() {
        return Err(CommandError::UnknownProduct(product.to_owned()));
    }
    if service.get_by_email(&email).await?.is_none() {
        return Err(CommandError::UnknownCustomer(email.to_string()));
    }

    if service.add_product_to_customer(email.as_str(), product).await? {
        tracing::info!("Granted {} to {}", product, email);
    } else {
        tracing::info!("{} already holds {}", email, product);
    }
    Ok(())
}
