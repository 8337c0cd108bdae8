//! Ethos Core - Storefront domain library.
//!
//! This crate holds everything the storefront knows about coffee gear, carts,
//! and checkout, independent of how it is served:
//! - `storefront` - axum binary rendering the shop and owning per-visitor state
//! - `integration-tests` - end-to-end tests against the running router
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions, and traits - no I/O, no
//! HTTP, no timers. Payment submission is expressed through the
//! [`checkout::PaymentProcessor`] trait so the storefront decides how (and how
//! slowly) a charge happens.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and countries
//! - [`catalog`] - The static product catalog and collection filters
//! - [`cart`] - Line items, grouping by variant, and subtotals
//! - [`checkout`] - Input formatting, validation, and the checkout state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use cart::{Cart, GroupKey, GroupedEntry, LineItem};
pub use catalog::{Catalog, CategoryFilter, Finish, Product, ProductLink};
pub use types::*;
