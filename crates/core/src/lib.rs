//! Knuspr Core - Domain records for the Knuspr.de storefront API.
//!
//! This crate provides the typed payloads shared by the client and CLI:
//! - `client` - Authenticated HTTP gateway to the storefront
//! - `cli` - Command-line presentation layer
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Records are
//! immutable snapshots of one API response. Every record that is parsed from
//! the wire keeps fields it does not recognise in a side map, so upstream API
//! additions are never silently dropped.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, and the search/cart/order/slot records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
