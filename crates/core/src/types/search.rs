//! Product search results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;
use super::lenient::{default_true, null_as_default, null_as_true};
use super::price::ProductPrice;

/// One product from the search endpoint's `productList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Product ID (pass to `add_to_cart`).
    #[serde(rename = "productId")]
    pub id: ProductId,
    /// Display name.
    #[serde(rename = "productName")]
    pub name: String,
    /// Price as sent by the API; see [`SearchResult::price_value`].
    #[serde(default)]
    pub price: Option<ProductPrice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    /// Package size, e.g. "1 l".
    #[serde(
        rename = "textualAmount",
        alias = "amount",
        default,
        deserialize_with = "null_as_default"
    )]
    pub amount: String,
    /// Badge list (promotions, labels). Kept verbatim.
    #[serde(default)]
    pub badge: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub favourite: bool,
    #[serde(
        rename = "inStock",
        alias = "in_stock",
        default = "default_true",
        deserialize_with = "null_as_true"
    )]
    pub in_stock: bool,
    /// Relative image path on the storefront CDN.
    #[serde(rename = "imgPath", alias = "image_path", default)]
    pub image_path: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl SearchResult {
    /// Numeric price, `0.0` when the API sent none.
    #[must_use]
    pub fn price_value(&self) -> f64 {
        self.price.as_ref().map_or(0.0, ProductPrice::value)
    }

    /// Fields the API sent that have no typed counterpart.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}
