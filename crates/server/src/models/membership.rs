//! Membership model.

use serde::Serialize;

use nighthawk_core::{CustomerId, MembershipId};

/// A membership owned by a single customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: MembershipId,
    pub description: String,
    pub customer_id: CustomerId,
}
