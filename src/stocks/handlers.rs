use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;
use crate::stocks::service::resolve_price;

pub fn stock_routes() -> Router<AppState> {
    Router::new().route("/stocks/:ticker", get(get_stock))
}

#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub stock_symbol: String,
    pub last_price: f64,
    pub source: &'static str,
}

#[instrument(skip(state))]
pub async fn get_stock(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<StockResponse>, ApiError> {
    let ticker = ticker.trim().to_string();
    if ticker.is_empty() {
        return Err(ApiError::Validation("Stock ticker is required".into()));
    }

    let (price, source) = resolve_price(&state.db, state.provider.as_ref(), &ticker).await?;
    Ok(Json(StockResponse {
        stock_symbol: ticker,
        last_price: price,
        source: source.as_str(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_response_serializes_expected_shape() {
        let res = StockResponse {
            stock_symbol: "AAPL".into(),
            last_price: 185.64,
            source: "cache",
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["stock_symbol"], "AAPL");
        assert_eq!(json["last_price"], 185.64);
        assert_eq!(json["source"], "cache");
    }
}
