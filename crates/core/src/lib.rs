//! Mono Core - Shared domain library.
//!
//! This crate holds the domain model shared by the MONO binaries:
//! - `mono-storefront` - Public-facing JSON API
//! - `mono-cli` - Command-line tools for catalog inspection and state resets
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP,
//! no persistence. Everything in here can be exercised from a plain unit
//! test without standing up a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails
//! - [`catalog`] - The static product catalog
//! - [`cart`] - Cart and wishlist state machine
//! - [`checkout`] - Order totals derivation and discount codes
//! - [`forms`] - Payment/delivery form validation and card classification
//! - [`order`] - Order receipt snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod forms;
pub mod order;
pub mod types;

pub use types::*;
