//! Core types for Nighthawk.
//!
//! This module provides type-safe wrappers for the customer domain.

pub mod email;
pub mod id;
pub mod order_history;

pub use email::{Email, EmailError};
pub use id::*;
pub use order_history::{AttributeValue, OrderEntry, OrderHistory, OrderHistoryError};
