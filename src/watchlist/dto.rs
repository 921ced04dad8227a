use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::watchlist::repo::WatchlistItem;

/// Body for adding a lot. With `manual` set, `price_at_time` and `added_at`
/// are both required and used verbatim; otherwise the price comes from the
/// shared cache-or-fetch path and the timestamp is the current time.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(default)]
    pub stock_symbol: String,
    pub quantity: Option<i64>,
    pub industry: Option<String>,
    pub price_at_time: Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub added_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub manual: bool,
}

/// Body for a partial update; omitted fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: Option<i64>,
    pub price_at_time: Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub added_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub total: f64,
    pub watchlist: Vec<WatchlistItem>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Quantity defaults to 1 when absent or zero-equivalent.
pub fn normalize_quantity(quantity: Option<i64>) -> i64 {
    match quantity {
        Some(q) if q != 0 => q,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn quantity_defaults_to_one() {
        assert_eq!(normalize_quantity(None), 1);
        assert_eq!(normalize_quantity(Some(0)), 1);
        assert_eq!(normalize_quantity(Some(5)), 5);
    }

    #[test]
    fn add_request_parses_manual_entry() {
        let req: AddItemRequest = serde_json::from_str(
            r#"{"stock_symbol":"AAPL","manual":true,"price_at_time":150.0,
                "quantity":2,"added_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(req.manual);
        assert_eq!(req.price_at_time, Some(150.0));
        assert_eq!(req.added_at, Some(datetime!(2024-01-01 00:00:00 UTC)));
    }

    #[test]
    fn add_request_defaults_are_automatic_mode() {
        let req: AddItemRequest = serde_json::from_str(r#"{"stock_symbol":"AAPL"}"#).unwrap();
        assert!(!req.manual);
        assert!(req.quantity.is_none());
        assert!(req.added_at.is_none());
        assert!(req.industry.is_none());
    }

    #[test]
    fn update_request_fields_are_independently_optional() {
        let req: UpdateItemRequest = serde_json::from_str(r#"{"quantity":3}"#).unwrap();
        assert_eq!(req.quantity, Some(3));
        assert!(req.price_at_time.is_none());
        assert!(req.added_at.is_none());
    }
}
