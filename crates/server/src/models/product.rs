//! Customer product model.

use serde::{Deserialize, Serialize};

use nighthawk_core::ProductId;

/// A named product attached to customers.
///
/// Product names double as authorization roles (e.g. `ROLE_USER`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerProduct {
    pub id: ProductId,
    pub name: String,
}
