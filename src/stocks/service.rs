//! Cache-or-fetch price resolution, shared by the stock lookup endpoint and
//! watchlist adds.

use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::debug;

use crate::error::ApiError;
use crate::stocks::provider::PriceProvider;
use crate::stocks::repo::StockQuote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Cache,
    Provider,
}

impl PriceSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PriceSource::Cache => "cache",
            PriceSource::Provider => "provider",
        }
    }
}

/// Returns the cached price when fresh, otherwise fetches the previous close
/// from the provider and upserts the cache row.
///
/// Concurrent callers can both miss and both fetch-and-upsert; the cache row
/// ends up with whichever write lands last. That race is accepted, there is
/// no mutual exclusion around the check-fetch-upsert sequence.
pub async fn resolve_price(
    db: &PgPool,
    provider: &dyn PriceProvider,
    symbol: &str,
) -> Result<(f64, PriceSource), ApiError> {
    let now = OffsetDateTime::now_utc();
    if let Some(quote) = StockQuote::find(db, symbol).await? {
        if quote.is_fresh(now) {
            debug!(symbol, price = quote.last_price, "price cache hit");
            return Ok((quote.last_price, PriceSource::Cache));
        }
    }

    let price = provider.previous_close(symbol).await?;
    StockQuote::upsert(db, symbol, price).await?;
    debug!(symbol, price, "price fetched from provider");
    Ok((price, PriceSource::Provider))
}
