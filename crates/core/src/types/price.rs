//! Search result prices.
//!
//! The search endpoint reports a price either as a bare number or as an
//! object such as `{"full": 1.49, "currency": "EUR"}`. [`ProductPrice`]
//! accepts both and anything else it is handed, and [`ProductPrice::value`]
//! reduces all of them to one number.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A product price as sent by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductPrice {
    /// Bare numeric price.
    Amount(f64),
    /// Composite price object (`full`, `currency`, ...).
    Breakdown(PriceBreakdown),
    /// Any other JSON shape, kept verbatim.
    Other(Value),
}

/// Composite price object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Full price in the currency's standard unit.
    pub full: Option<f64>,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

impl ProductPrice {
    /// Numeric price: `full` for composite prices, the number itself
    /// otherwise, and `0.0` for anything that does not coerce.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            Self::Amount(amount) => *amount,
            Self::Breakdown(breakdown) => breakdown.full.unwrap_or(0.0),
            Self::Other(Value::Object(map)) => map.get("full").and_then(coerce).unwrap_or(0.0),
            Self::Other(other) => coerce(other).unwrap_or(0.0),
        }
    }
}

impl PriceBreakdown {
    /// Fields of the price object that have no typed counterpart.
    #[must_use]
    pub const fn extra(&self) -> &serde_json::Map<String, Value> {
        &self.extra
    }
}

/// Numbers and numeric strings coerce; everything else does not.
fn coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_composite_price_uses_full() {
        let price: ProductPrice =
            serde_json::from_value(json!({"full": 1.49, "currency": "EUR"})).unwrap();
        assert!(matches!(price, ProductPrice::Breakdown(_)));
        assert!((price.value() - 1.49).abs() < f64::EPSILON);
    }

    #[test]
    fn test_numeric_price() {
        let price: ProductPrice = serde_json::from_value(json!(1.29)).unwrap();
        assert!((price.value() - 1.29).abs() < f64::EPSILON);
    }

    #[test]
    fn test_string_full_price_still_coerces() {
        let price: ProductPrice = serde_json::from_value(json!({"full": "2.50"})).unwrap();
        assert!((price.value() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unusable_price_is_zero() {
        let price: ProductPrice = serde_json::from_value(json!(["nope"])).unwrap();
        assert!(price.value().abs() < f64::EPSILON);
    }
}
