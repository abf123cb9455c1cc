//! Core types for Knuspr.
//!
//! This module provides type-safe IDs and the records parsed from the
//! storefront API.

pub mod account;
pub mod cart;
pub mod id;
mod lenient;
pub mod order;
pub mod price;
pub mod search;
pub mod slot;

pub use account::{AccountData, PremiumProfile};
pub use cart::{Cart, CartItem};
pub use id::*;
pub use order::{Order, OrderProduct, UNKNOWN_PRODUCT_NAME};
pub use price::{PriceBreakdown, ProductPrice};
pub use search::SearchResult;
pub use slot::DeliverySlot;
