//! Customer product repository for database operations.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::CustomerProduct;

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every product, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<CustomerProduct>, RepositoryError> {
        let products = sqlx::query_as::<_, CustomerProduct>(
            "SELECT id, name FROM customer_product ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by exact name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<CustomerProduct>, RepositoryError> {
        let product = sqlx::query_as::<_, CustomerProduct>(
            "SELECT id, name FROM customer_product WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Insert a product unless one with the same name exists.
    ///
    /// Returns the stored product and whether it was newly created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_if_absent(
        &self,
        name: &str,
    ) -> Result<(CustomerProduct, bool), RepositoryError> {
        let inserted = sqlx::query_as::<_, CustomerProduct>(
            r"
            INSERT INTO customer_product (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name
            ",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        if let Some(product) = inserted {
            return Ok((product, true));
        }

        self.find_by_name(name)
            .await?
            .map(|product| (product, false))
            .ok_or(RepositoryError::NotFound)
    }
}
