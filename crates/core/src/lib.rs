//! Nighthawk Core - Shared types library.
//!
//! This crate provides the domain types used by every Nighthawk component:
//! - `server` - REST API and server-rendered customer pages
//! - `cli` - Command-line tools for migrations, seeding and backfills
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. With the `postgres` feature enabled the types gain
//! `sqlx` encode/decode support so repositories can bind them directly.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, validated emails, and the order-history value types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
