//! Delivery time slots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::FlexibleId;
use super::lenient::{default_true, null_as_true};

/// A delivery window offered for the logged-in user's address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverySlot {
    #[serde(default)]
    pub id: Option<FlexibleId>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(
        alias = "isAvailable",
        default = "default_true",
        deserialize_with = "null_as_true"
    )]
    pub is_available: bool,
    /// Delivery fee, if the slot has one.
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Default for DeliverySlot {
    fn default() -> Self {
        Self {
            id: None,
            start: None,
            end: None,
            is_available: true,
            price: None,
            extra: Map::new(),
        }
    }
}

impl DeliverySlot {
    /// Fields the API sent that have no typed counterpart.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}
