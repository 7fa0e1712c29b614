//! Clove Core - Shared types library.
//!
//! This crate provides common types used across all Clove components:
//! - `server` - Storefront + back-office API binary
//! - `cli` - Command-line tools for migrations and staff management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, slugs, money, and
//!   the order/payment/role state enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
