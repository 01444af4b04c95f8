//! Integration tests for Nighthawk customers.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database, migrate and run the server (seeding on startup)
//! nh-cli migrate
//! cargo run -p nighthawk-server
//!
//! # Run the ignored integration tests
//! cargo test -p nighthawk-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `NIGHTHAWK_TEST_BASE_URL` - Server under test (default: <http://localhost:8085>)
//! - `NIGHTHAWK_DATABASE_URL` - Database the server uses (falls back to `DATABASE_URL`)
//!
//! # Test Categories
//!
//! - `customers_api` - Customer JSON API
//! - `jokes_api` - Joke JSON API
//! - `login` - Login and logout flow
//! - `services` - Service layer against the database

#![allow(clippy::missing_panics_doc)]

use reqwest::{Client, Response};
use secrecy::SecretString;
use serde::Deserialize;
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};

/// Default address of the server under test.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8085";

/// Seeded customer used by login tests.
pub const SEEDED_EMAIL: &str = "toby@gmail.com";
pub const SEEDED_PASSWORD: &str = "123Toby!";

/// HTTP client plus the server location.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Client with a cookie jar so sessions survive across requests.
    #[must_use]
    pub fn new() -> Self {
        let base_url = std::env::var("NIGHTHAWK_TEST_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    /// Absolute URL for a server path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Create a customer through the JSON API.
    ///
    /// `name` must already be URL-safe (use `%20` for spaces).
    pub async fn create_customer(&self, email: &str, name: &str, dob: &str) -> Response {
        let url = self.url(&format!(
            "/api/customer/post?email={email}&password=Str0ng!Pass&name={name}&dob={dob}"
        ));
        self.client
            .post(url)
            .send()
            .await
            .expect("create request failed")
    }

    /// Find a customer by exact email through the search endpoint.
    pub async fn find_customer(&self, email: &str) -> Option<CustomerJson> {
        let customers: Vec<CustomerJson> = self
            .client
            .post(self.url("/api/customer/search"))
            .json(&serde_json::json!({ "term": email }))
            .send()
            .await
            .expect("search request failed")
            .json()
            .await
            .expect("search response was not JSON");

        customers.into_iter().find(|c| c.email == email)
    }

    /// Delete a customer, ignoring the outcome.
    pub async fn delete_customer(&self, id: i64) {
        let _ = self
            .client
            .delete(self.url(&format!("/api/customer/delete/{id}")))
            .send()
            .await;
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Customer as returned by the JSON API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerJson {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub last_visited: Option<String>,
    pub products: Vec<ProductJson>,
    pub order_history: serde_json::Map<String, serde_json::Value>,
}

/// Product as embedded in [`CustomerJson`].
#[derive(Debug, Deserialize)]
pub struct ProductJson {
    pub id: i64,
    pub name: String,
}

/// Joke as returned by the JSON API.
#[derive(Debug, Deserialize)]
pub struct JokeJson {
    pub id: i64,
    pub joke: String,
    pub haha: i64,
    pub boohoo: i64,
}

/// Email address that no other test run will collide with.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", uuid::Uuid::new_v4().simple())
}

static DATABASE_LOCK: Mutex<()> = Mutex::const_new(());

/// Serialize tests that touch every customer row (for example
/// `CustomerService::defaults`) against tests that assert on products.
pub async fn lock_database() -> MutexGuard<'static, ()> {
    DATABASE_LOCK.lock().await
}

/// Connect to the database the server under test uses.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("NIGHTHAWK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("NIGHTHAWK_DATABASE_URL or DATABASE_URL must be set");

    nighthawk_server::db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to test database")
}
