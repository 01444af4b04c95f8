//! Customer repository for database operations.
//!
//! Customers are always loaded together with their products, aggregated
//! into a JSON array by the query so a listing costs one round trip.

use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use nighthawk_core::{CustomerId, Email, OrderEntry, OrderHistory, ProductId};

use super::RepositoryError;
use super::memberships;
use crate::models::{Customer, CustomerProduct};

/// Select list shared by every customer query. Callers append a `WHERE`
/// clause (optional) followed by [`GROUP_AND_ORDER`].
const SELECT_CUSTOMER: &str = r"
    SELECT c.id, c.email, c.password, c.name, c.last_visited, c.order_history,
           COALESCE(
               json_agg(json_build_object('id', p.id, 'name', p.name) ORDER BY p.name)
                   FILTER (WHERE p.id IS NOT NULL),
               '[]'::json
           ) AS products
    FROM customer c
    LEFT JOIN customer_product_link l ON l.customer_id = c.id
    LEFT JOIN customer_product p ON p.id = l.product_id
";

const GROUP_AND_ORDER: &str = " GROUP BY c.id ORDER BY c.name ASC, c.id ASC";

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    email: String,
    password: String,
    name: String,
    last_visited: Option<NaiveDate>,
    order_history: Json<OrderHistory>,
    products: Json<Vec<CustomerProduct>>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            password: row.password,
            name: row.name,
            last_visited: row.last_visited,
            products: row.products.0,
            order_history: row.order_history.0,
        })
    }
}

/// Fields written when inserting a customer.
#[derive(Debug)]
pub struct NewCustomer<'a> {
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub last_visited: Option<NaiveDate>,
    pub order_history: &'a OrderHistory,
}

/// Fields written when updating a customer. `None` keeps the stored hash.
#[derive(Debug)]
pub struct CustomerUpdate<'a> {
    pub email: &'a Email,
    pub password_hash: Option<&'a str>,
    pub name: &'a str,
    pub last_visited: Option<NaiveDate>,
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every customer, ordered by name ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let sql = format!("{SELECT_CUSTOMER}{GROUP_AND_ORDER}");
        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    /// Customers whose name contains `name` or whose email contains `email`,
    /// ignoring case. An empty filter matches every row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name_or_email(
        &self,
        name: &str,
        email: &str,
    ) -> Result<Vec<Customer>, RepositoryError> {
        let sql = format!(
            "{SELECT_CUSTOMER} WHERE strpos(lower(c.name), lower($1)) > 0 \
             OR strpos(lower(c.email), lower($2)) > 0{GROUP_AND_ORDER}"
        );
        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(name)
            .bind(email)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id(&mut conn, id).await
    }

    /// Get a customer by exact email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        let sql = format!("{SELECT_CUSTOMER} WHERE c.email = $1{GROUP_AND_ORDER}");
        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Insert a customer and return it with its generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(&self, customer: &NewCustomer<'_>) -> Result<Customer, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let id = insert_row(&mut conn, customer).await?;

        fetch_by_id(&mut conn, id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Insert a customer together with one membership, atomically.
    ///
    /// Either both rows are written or neither is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` if either insert fails.
    pub async fn insert_with_membership(
        &self,
        customer: &NewCustomer<'_>,
        membership: &str,
    ) -> Result<Customer, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id = insert_row(&mut tx, customer).await?;
        memberships::insert_for_customer(&mut tx, id, membership).await?;
        let inserted = fetch_by_id(&mut tx, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;
        Ok(inserted)
    }

    /// Overwrite a customer's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email belongs to someone else.
    pub async fn update(
        &self,
        id: CustomerId,
        update: &CustomerUpdate<'_>,
    ) -> Result<Customer, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customer
            SET email = $2,
                password = COALESCE($3, password),
                name = $4,
                last_visited = $5,
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(update.email)
        .bind(update.password_hash)
        .bind(update.name)
        .bind(update.last_visited)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "email"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a customer and their memberships in one transaction.
    ///
    /// Returns the customer as it was before deletion, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is deleted then.
    pub async fn delete(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let Some(customer) = fetch_by_id(&mut tx, id).await? else {
            return Ok(None);
        };

        memberships::delete_for_customer(&mut tx, id).await?;
        sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(customer))
    }

    /// Replace the order-history entry for one date, keeping all other dates.
    ///
    /// Returns the updated customer, or `None` if the ID is unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_order_entry(
        &self,
        id: CustomerId,
        date: &str,
        entry: &OrderEntry,
    ) -> Result<Option<Customer>, RepositoryError> {
        let updated: Option<CustomerId> = sqlx::query_scalar(
            r"
            UPDATE customer
            SET order_history = order_history || jsonb_build_object($2::text, $3::jsonb),
                updated_at = now()
            WHERE id = $1
            RETURNING id
            ",
        )
        .bind(id)
        .bind(date)
        .bind(Json(entry))
        .fetch_optional(self.pool)
        .await?;

        match updated {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    /// Attach a product to a customer.
    ///
    /// Returns `true` if a new link was created, `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn link_product(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO customer_product_link (customer_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(customer_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Attach a product to every customer that has no products yet.
    ///
    /// Returns the number of customers updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn link_product_where_missing(
        &self,
        product_id: ProductId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO customer_product_link (customer_id, product_id)
            SELECT c.id, $1
            FROM customer c
            WHERE NOT EXISTS (
                SELECT 1 FROM customer_product_link l WHERE l.customer_id = c.id
            )
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// IDs of customers whose password is blank.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_ids_without_password(&self) -> Result<Vec<CustomerId>, RepositoryError> {
        let ids = sqlx::query_scalar("SELECT id FROM customer WHERE btrim(password) = '' ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        Ok(ids)
    }

    /// Set the password hash of a customer whose password is still blank.
    ///
    /// Returns `false` if the customer is gone or already has a password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_password_if_blank(
        &self,
        id: CustomerId,
        password_hash: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customer
            SET password = $2, updated_at = now()
            WHERE id = $1 AND btrim(password) = ''
            ",
        )
        .bind(id)
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Insert the customer row on an existing connection, returning its ID.
async fn insert_row(
    conn: &mut PgConnection,
    customer: &NewCustomer<'_>,
) -> Result<CustomerId, RepositoryError> {
    sqlx::query_scalar(
        r"
        INSERT INTO customer (email, password, name, last_visited, order_history)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        ",
    )
    .bind(customer.email)
    .bind(customer.password_hash)
    .bind(customer.name)
    .bind(customer.last_visited)
    .bind(Json(customer.order_history))
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| RepositoryError::from_unique(e, "email"))
}

/// Load one customer on an existing connection (pooled or transactional).
async fn fetch_by_id(
    conn: &mut PgConnection,
    id: CustomerId,
) -> Result<Option<Customer>, RepositoryError> {
    let sql = format!("{SELECT_CUSTOMER} WHERE c.id = $1{GROUP_AND_ORDER}");
    let row = sqlx::query_as::<_, CustomerRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.map(Customer::try_from).transpose()
}
