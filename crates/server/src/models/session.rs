//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use nighthawk_core::Email;

use crate::services::auth::Identity;

/// Session-stored identity of the signed-in customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCustomer {
    /// Login username.
    pub email: Email,
    /// Product names granted to the customer.
    pub authorities: Vec<String>,
}

impl From<Identity> for CurrentCustomer {
    fn from(identity: Identity) -> Self {
        Self {
            email: identity.username,
            authorities: identity.authorities,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";
}
