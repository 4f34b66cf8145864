//! Shopfront Core - Shared types library.
//!
//! This crate provides common types used across all Shopfront components:
//! - `store` - Catalog, cart, wishlist and checkout state
//! - `cli` - Command-line front end for browsing and replaying sessions
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no global state, no locking.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices, plus product records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
