//! Knuspr Client - Authenticated HTTP client for the Knuspr.de storefront.
//!
//! # Overview
//!
//! [`KnusprClient`] logs in with account credentials, keeps the session in
//! a cookie store, and exposes the storefront's product search, cart,
//! delivery slot, order and account endpoints as typed async methods.
//! Requests are spaced by a minimum interval and no request is retried.
//!
//! # Example
//!
//! ```rust,ignore
//! use knuspr_client::KnusprClient;
//!
//! let mut client = KnusprClient::from_env()?;
//! client.connect().await?;
//! for product in client.search_products("Milch", 10).await? {
//!     println!("{} {:.2}", product.name, product.price_value());
//! }
//! client.close().await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod auth;
mod client;
mod config;
pub mod endpoints;
mod envelope;
mod error;
mod pacer;

pub use auth::Authenticator;
pub use client::{DEFAULT_ADD_QUANTITY, DEFAULT_ORDER_HISTORY_LIMIT, KnusprClient};
pub use config::{ConfigError, DEFAULT_BASE_URL, DEFAULT_LANGUAGE, KnusprConfig};
pub use error::KnusprError;
pub use pacer::Pacer;

pub use knuspr_core::types;
