//! Business logic services.
//!
//! # Services
//!
//! - `customers` - Customer, product and membership orchestration
//! - `jokes` - Joke listing and reactions
//! - `auth` - Password authentication over an identity provider

pub mod auth;
pub mod customers;
pub mod jokes;

pub use auth::{AuthError, AuthService, Identity, IdentityProvider};
pub use customers::{CustomerService, DefaultsReport, ServiceError};
pub use jokes::JokeService;
