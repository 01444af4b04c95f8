//! Membership repository for database operations.

use sqlx::{PgConnection, PgPool};

use nighthawk_core::CustomerId;

use super::RepositoryError;
use crate::models::Membership;

/// Repository for membership database operations.
pub struct MembershipRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MembershipRepository<'a> {
    /// Create a new membership repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a membership for a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including an unknown customer).
    pub async fn create(
        &self,
        customer_id: CustomerId,
        description: &str,
    ) -> Result<Membership, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        insert_for_customer(&mut conn, customer_id, description).await
    }

    /// All memberships held by a customer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Membership>, RepositoryError> {
        let memberships = sqlx::query_as::<_, Membership>(
            "SELECT id, description, customer_id FROM membership WHERE customer_id = $1 ORDER BY id",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(memberships)
    }
}

/// Insert a membership on an existing connection or transaction.
pub(crate) async fn insert_for_customer(
    conn: &mut PgConnection,
    customer_id: CustomerId,
    description: &str,
) -> Result<Membership, RepositoryError> {
    let membership = sqlx::query_as::<_, Membership>(
        r"
        INSERT INTO membership (description, customer_id)
        VALUES ($1, $2)
        RETURNING id, description, customer_id
        ",
    )
    .bind(description)
    .bind(customer_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(membership)
}

/// Delete a customer's memberships on an existing connection or transaction.
pub(crate) async fn delete_for_customer(
    conn: &mut PgConnection,
    customer_id: CustomerId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM membership WHERE customer_id = $1")
        .bind(customer_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
