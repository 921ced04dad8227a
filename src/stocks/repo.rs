use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};

/// Cached rows older than this are treated as stale and overwritten on the
/// next successful fetch; nothing actively evicts them.
pub const STALENESS_WINDOW: Duration = Duration::hours(24);

/// Last-known price per symbol, at most one row per symbol.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockQuote {
    pub stock_symbol: String,
    pub last_price: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl StockQuote {
    pub fn is_fresh(&self, now: OffsetDateTime) -> bool {
        now - self.updated_at < STALENESS_WINDOW
    }

    pub async fn find(db: &PgPool, symbol: &str) -> anyhow::Result<Option<StockQuote>> {
        let quote = sqlx::query_as::<_, StockQuote>(
            r#"
            SELECT stock_symbol, last_price, updated_at
            FROM stocks
            WHERE stock_symbol = $1
            "#,
        )
        .bind(symbol)
        .fetch_optional(db)
        .await?;
        Ok(quote)
    }

    /// Insert-or-update keyed by symbol; last write wins on concurrent fetches.
    pub async fn upsert(db: &PgPool, symbol: &str, price: f64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO stocks (stock_symbol, last_price, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (stock_symbol)
            DO UPDATE SET last_price = $2, updated_at = NOW()
            "#,
        )
        .bind(symbol)
        .bind(price)
        .execute(db)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_updated_at(updated_at: OffsetDateTime) -> StockQuote {
        StockQuote {
            stock_symbol: "AAPL".into(),
            last_price: 185.64,
            updated_at,
        }
    }

    #[test]
    fn quote_within_window_is_fresh() {
        let now = OffsetDateTime::now_utc();
        assert!(quote_updated_at(now - Duration::hours(23)).is_fresh(now));
        assert!(quote_updated_at(now).is_fresh(now));
    }

    #[test]
    fn quote_at_or_past_window_is_stale() {
        let now = OffsetDateTime::now_utc();
        assert!(!quote_updated_at(now - Duration::hours(24)).is_fresh(now));
        assert!(!quote_updated_at(now - Duration::hours(48)).is_fresh(now));
    }
}
