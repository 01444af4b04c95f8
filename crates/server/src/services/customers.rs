//! Customer service.
//!
//! Orchestrates the customer, product and membership repositories, hashes
//! passwords before they are stored and exposes customers to the login flow
//! through [`IdentityProvider`].

use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use nighthawk_core::{CustomerId, Email, OrderEntry, OrderHistory, OrderHistoryError};

use crate::db::customers::{CustomerUpdate, NewCustomer};
use crate::db::{CustomerRepository, MembershipRepository, ProductRepository, RepositoryError};
use crate::models::{Customer, CustomerDraft, CustomerProduct, Membership, ValidationError};
use crate::services::auth::{AuthError, Identity, IdentityProvider, hash_password};

/// Body keys of a stats update that are not order attributes.
pub const STATS_RESERVED_KEYS: &[&str] = &["id", "date"];

/// Errors returned by [`CustomerService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Another customer already uses this email.
    #[error("{0} is already registered")]
    DuplicateEmail(Email),

    /// The customer being updated does not exist.
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    /// Order-history input was rejected.
    #[error(transparent)]
    OrderHistory(#[from] OrderHistoryError),

    /// Customer input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Password hashing failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Outcome of [`CustomerService::defaults`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultsReport {
    /// Customers that received the default password.
    pub passwords_set: u64,
    /// Customers that received the default product.
    pub products_granted: u64,
}

/// Customer service.
pub struct CustomerService<'a> {
    customers: CustomerRepository<'a>,
    products: ProductRepository<'a>,
    memberships: MembershipRepository<'a>,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            products: ProductRepository::new(pool),
            memberships: MembershipRepository::new(pool),
        }
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Every customer, ordered by name ascending.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Customer>, ServiceError> {
        Ok(self.customers.find_all().await?)
    }

    /// Customers whose name contains `name` or whose email contains `email`,
    /// ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list(&self, name: &str, email: &str) -> Result<Vec<Customer>, ServiceError> {
        Ok(self.customers.find_by_name_or_email(name, email).await?)
    }

    /// Customers whose name or email contains `term`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn search(&self, term: &str) -> Result<Vec<Customer>, ServiceError> {
        self.list(term, term).await
    }

    /// Insert or update a customer, hashing the password first.
    ///
    /// An update with an empty password keeps the stored hash.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DuplicateEmail` if the email belongs to another customer.
    /// Returns `ServiceError::CustomerNotFound` when updating an unknown ID.
    #[instrument(skip(self, draft), fields(email = %draft.email))]
    pub async fn save(&self, draft: &CustomerDraft) -> Result<Customer, ServiceError> {
        let plaintext = draft.password.expose_secret();

        let result = match draft.id {
            None => {
                let password_hash = hash_password(plaintext)?;
                let history = OrderHistory::new();
                self.customers
                    .insert(&NewCustomer {
                        email: &draft.email,
                        password_hash: &password_hash,
                        name: &draft.name,
                        last_visited: draft.last_visited,
                        order_history: &history,
                    })
                    .await
            }
            Some(id) => {
                let password_hash = if plaintext.is_empty() {
                    None
                } else {
                    Some(hash_password(plaintext)?)
                };
                self.customers
                    .update(
                        id,
                        &CustomerUpdate {
                            email: &draft.email,
                            password_hash: password_hash.as_deref(),
                            name: &draft.name,
                            last_visited: draft.last_visited,
                        },
                    )
                    .await
            }
        };

        match result {
            Ok(customer) => {
                tracing::info!(customer_id = %customer.id, "Customer saved");
                Ok(customer)
            }
            Err(RepositoryError::Conflict(_)) => Err(ServiceError::DuplicateEmail(draft.email.clone())),
            Err(RepositoryError::NotFound) => match draft.id {
                Some(id) => Err(ServiceError::CustomerNotFound(id)),
                None => Err(RepositoryError::NotFound.into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a customer with an initial order-history and one membership.
    ///
    /// The customer and membership rows are written in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DuplicateEmail` if the email is taken.
    /// Returns `ServiceError::Repository` if either insert fails; nothing is written.
    pub async fn create_member(
        &self,
        draft: &CustomerDraft,
        history: &OrderHistory,
        membership: &str,
    ) -> Result<Customer, ServiceError> {
        let password_hash = hash_password(draft.password.expose_secret())?;
        let new_customer = NewCustomer {
            email: &draft.email,
            password_hash: &password_hash,
            name: &draft.name,
            last_visited: draft.last_visited,
            order_history: history,
        };
        self.customers
            .insert_with_membership(&new_customer, membership)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ServiceError::DuplicateEmail(draft.email.clone()),
                other => other.into(),
            })
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, ServiceError> {
        Ok(self.customers.find_by_id(id).await?)
    }

    /// Get a customer by email.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Customer>, ServiceError> {
        Ok(self.customers.find_by_email(email).await?)
    }

    /// Delete a customer and their memberships.
    ///
    /// Returns the deleted customer, or `None` if the ID was unknown.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the transaction fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<Option<Customer>, ServiceError> {
        let deleted = self.customers.delete(id).await?;
        if deleted.is_some() {
            tracing::info!(customer_id = %id, "Customer deleted");
        }
        Ok(deleted)
    }

    /// Memberships held by a customer.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn memberships(&self, id: CustomerId) -> Result<Vec<Membership>, ServiceError> {
        Ok(self.memberships.find_by_customer(id).await?)
    }

    /// Give a customer a membership.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the insert fails.
    pub async fn add_membership(
        &self,
        id: CustomerId,
        description: &str,
    ) -> Result<Membership, ServiceError> {
        Ok(self.memberships.create(id, description).await?)
    }

    /// Replace the order-history entry for `date` with the attributes of `body`.
    ///
    /// The `id` and `date` keys of `body` are not stored as attributes.
    /// Returns `None` if the customer does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::OrderHistory` for a blank date or non-scalar attributes.
    #[instrument(skip(self, body))]
    pub async fn set_stats(
        &self,
        id: CustomerId,
        date: &str,
        body: &Map<String, Value>,
    ) -> Result<Option<Customer>, ServiceError> {
        let date = OrderHistory::date_key(date)?;
        let entry = OrderEntry::from_json_object(body, STATS_RESERVED_KEYS)?;

        Ok(self.customers.set_order_entry(id, &date, &entry).await?)
    }

    /// Backfill a password and a product onto existing customers.
    ///
    /// Every customer with a blank password gets `password` hashed (each
    /// with its own salt). Every customer with no products gets
    /// `product_name`, if such a product exists.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if `password` is blank.
    /// Returns `ServiceError::Repository` if a query fails.
    #[instrument(skip(self, password))]
    pub async fn defaults(
        &self,
        password: &str,
        product_name: &str,
    ) -> Result<DefaultsReport, ServiceError> {
        if password.trim().is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }
        let mut report = DefaultsReport::default();

        for id in self.customers.find_ids_without_password().await? {
            let password_hash = hash_password(password)?;
            if self.customers.set_password_if_blank(id, &password_hash).await? {
                report.passwords_set += 1;
            }
        }

        match self.products.find_by_name(product_name).await? {
            Some(product) => {
                report.products_granted = self.customers.link_product_where_missing(product.id).await?;
            }
            None => tracing::warn!(product = product_name, "Default product does not exist"),
        }

        tracing::info!(
            passwords_set = report.passwords_set,
            products_granted = report.products_granted,
            "Customer defaults applied"
        );
        Ok(report)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product unless one with the same name exists.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn save_product(&self, name: &str) -> Result<CustomerProduct, ServiceError> {
        let (product, created) = self.products.insert_if_absent(name.trim()).await?;
        if created {
            tracing::info!(product = %product.name, "Product created");
        }
        Ok(product)
    }

    /// Every product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list_products(&self) -> Result<Vec<CustomerProduct>, ServiceError> {
        Ok(self.products.find_all().await?)
    }

    /// Find a product by name.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn find_product(&self, name: &str) -> Result<Option<CustomerProduct>, ServiceError> {
        Ok(self.products.find_by_name(name).await?)
    }

    /// Attach a product to the customer with `email`.
    ///
    /// Does nothing if either side does not resolve or the link already exists.
    /// Returns `true` only when a new link was created.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if a query fails.
    #[instrument(skip(self))]
    pub async fn add_product_to_customer(
        &self,
        email: &str,
        product_name: &str,
    ) -> Result<bool, ServiceError> {
        let Ok(email) = Email::parse(email) else {
            return Ok(false);
        };
        let Some(customer) = self.customers.find_by_email(&email).await? else {
            return Ok(false);
        };
        let Some(product) = self.products.find_by_name(product_name).await? else {
            return Ok(false);
        };

        Ok(self.customers.link_product(customer.id, product.id).await?)
    }
}

impl IdentityProvider for CustomerService<'_> {
    async fn load_identity(&self, username: &Email) -> Result<Identity, AuthError> {
        let customer = self
            .customers
            .find_by_email(username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

        Ok(identity_for(customer))
    }
}

/// Map a customer onto the identity shape used by the login flow.
#[must_use]
pub fn identity_for(customer: Customer) -> Identity {
    Identity {
        authorities: customer.products.into_iter().map(|p| p.name).collect(),
        username: customer.email,
        credential: customer.password,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nighthawk_core::ProductId;

    use super::*;

    #[test]
    fn test_identity_uses_email_hash_and_product_names() {
        let customer = Customer {
            id: CustomerId::new(5),
            email: Email::parse("jm1021@gmail.com").unwrap(),
            password: "$argon2id$hash".to_string(),
            name: "John Mortensen".to_string(),
            last_visited: None,
            products: vec![
                CustomerProduct {
                    id: ProductId::new(1),
                    name: "ROLE_ADMIN".to_string(),
                },
                CustomerProduct {
                    id: ProductId::new(2),
                    name: "ROLE_USER".to_string(),
                },
            ],
            order_history: OrderHistory::new(),
        };

        let identity = identity_for(customer);
        assert_eq!(identity.username.as_str(), "jm1021@gmail.com");
        assert_eq!(identity.credential, "$argon2id$hash");
        assert_eq!(identity.authorities, vec!["ROLE_ADMIN", "ROLE_USER"]);
    }

    #[tokio::test]
    async fn test_defaults_rejects_blank_password_before_touching_the_database() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://nighthawk@localhost/nighthawk_test")
            .unwrap();
        let service = CustomerService::new(&pool);

        for blank in ["", "   "] {
            let err = service.defaults(blank, "ROLE_USER").await.unwrap_err();
            assert!(matches!(
                err,
                ServiceError::Validation(ValidationError::EmptyPassword)
            ));
        }
    }

    #[test]
    fn test_duplicate_email_message() {
        let err = ServiceError::DuplicateEmail(Email::parse("toby@gmail.com").unwrap());
        assert_eq!(err.to_string(), "toby@gmail.com is already registered");
    }
}
