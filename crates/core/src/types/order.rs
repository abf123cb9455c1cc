//! Order history and order detail records.
//!
//! The order endpoints are inconsistent about naming: a product line may
//! carry `productName` or just `name`, and an order lists its lines under
//! `products` on some endpoints and `items` on others. The accessors here
//! resolve those differences so callers don't have to.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::FlexibleId;
use super::lenient::null_as_default;

/// Placeholder returned by [`OrderProduct::display_name`] when a line has no name.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown";

/// One product line of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    #[serde(alias = "product_id", default)]
    pub product_id: Option<FlexibleId>,
    #[serde(alias = "product_name", default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(alias = "total_price", default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl OrderProduct {
    /// `product_name`, else `name`, else `"Unknown"`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_empty(self.product_name.as_deref())
            .or_else(|| non_empty(self.name.as_deref()))
            .unwrap_or(UNKNOWN_PRODUCT_NAME)
    }

    /// Fields the API sent that have no typed counterpart.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// A delivered, upcoming, or single detailed order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: Option<FlexibleId>,
    #[serde(alias = "order_number", default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(alias = "created_at", default)]
    pub created_at: Option<String>,
    #[serde(alias = "delivered_at", default)]
    pub delivered_at: Option<String>,
    #[serde(alias = "delivery_date", default)]
    pub delivery_date: Option<String>,
    #[serde(alias = "total_price", default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<OrderProduct>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderProduct>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Order {
    /// `products` when non-empty, otherwise `items`. The two are never merged.
    #[must_use]
    pub fn all_products(&self) -> &[OrderProduct] {
        if self.products.is_empty() {
            &self.items
        } else {
            &self.products
        }
    }

    /// `id`, else `order_number`, else `"?"`.
    #[must_use]
    pub fn display_id(&self) -> String {
        self.id.as_ref().map_or_else(
            || {
                non_empty(self.order_number.as_deref())
                    .unwrap_or("?")
                    .to_owned()
            },
            ToString::to_string,
        )
    }

    /// Most specific date the order carries: delivered, scheduled, created.
    #[must_use]
    pub fn display_date(&self) -> Option<&str> {
        non_empty(self.delivered_at.as_deref())
            .or_else(|| non_empty(self.delivery_date.as_deref()))
            .or_else(|| non_empty(self.created_at.as_deref()))
    }

    /// `total_price`, else `price`.
    #[must_use]
    pub fn display_total(&self) -> Option<f64> {
        self.total_price.or(self.price)
    }

    /// Fields the API sent that have no typed counterpart.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
