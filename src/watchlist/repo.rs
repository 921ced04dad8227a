use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// One tracked lot: a quantity of a symbol at a specific price and time.
/// Duplicate symbols for the same user are deliberately separate rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WatchlistItem {
    pub id: i64,
    pub user_id: i64,
    pub stock_symbol: String,
    pub price_at_time: f64,
    pub quantity: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
    pub industry: Option<String>,
}

/// Display aggregate over the user's lots. Plain floating-point accumulation,
/// no rounding or currency precision.
pub fn watchlist_total(items: &[WatchlistItem]) -> f64 {
    items
        .iter()
        .map(|item| item.price_at_time * item.quantity as f64)
        .sum()
}

impl WatchlistItem {
    pub async fn list_by_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<WatchlistItem>> {
        let rows = sqlx::query_as::<_, WatchlistItem>(
            r#"
            SELECT id, user_id, stock_symbol, price_at_time, quantity, added_at, industry
            FROM watchlist
            WHERE user_id = $1
            ORDER BY added_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Always inserts a new row; adds never merge into an existing lot.
    pub async fn insert(
        db: &PgPool,
        user_id: i64,
        stock_symbol: &str,
        price_at_time: f64,
        quantity: i64,
        added_at: OffsetDateTime,
        industry: Option<&str>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO watchlist (user_id, stock_symbol, price_at_time, quantity, added_at, industry)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user_id)
        .bind(stock_symbol)
        .bind(price_at_time)
        .bind(quantity)
        .bind(added_at)
        .bind(industry)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Ownership-scoped lookup; absent and not-owned are indistinguishable.
    pub async fn find_owned(
        db: &PgPool,
        id: i64,
        user_id: i64,
    ) -> anyhow::Result<Option<WatchlistItem>> {
        let row = sqlx::query_as::<_, WatchlistItem>(
            r#"
            SELECT id, user_id, stock_symbol, price_at_time, quantity, added_at, industry
            FROM watchlist
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Per-field partial update; omitted fields keep their prior value.
    pub async fn update_partial(
        db: &PgPool,
        id: i64,
        quantity: Option<i64>,
        price_at_time: Option<f64>,
        added_at: Option<OffsetDateTime>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE watchlist
            SET quantity = COALESCE($1, quantity),
                price_at_time = COALESCE($2, price_at_time),
                added_at = COALESCE($3, added_at)
            WHERE id = $4
            "#,
        )
        .bind(quantity)
        .bind(price_at_time)
        .bind(added_at)
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Returns false when no row matched both the id and the owner.
    pub async fn delete_owned(db: &PgPool, id: i64, user_id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM watchlist
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn lot(symbol: &str, price: f64, quantity: i64) -> WatchlistItem {
        WatchlistItem {
            id: 1,
            user_id: 1,
            stock_symbol: symbol.into(),
            price_at_time: price,
            quantity,
            added_at: datetime!(2024-01-01 00:00:00 UTC),
            industry: None,
        }
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let items = vec![lot("AAPL", 150.0, 2), lot("MSFT", 10.5, 3)];
        assert_eq!(watchlist_total(&items), 300.0 + 31.5);
    }

    #[test]
    fn total_of_empty_watchlist_is_zero() {
        assert_eq!(watchlist_total(&[]), 0.0);
    }

    #[test]
    fn total_accumulates_in_floating_point() {
        // No rounding is applied anywhere along the way.
        let items = vec![lot("A", 0.1, 3)];
        assert_eq!(watchlist_total(&items), 0.1 * 3.0);
    }

    #[test]
    fn item_serializes_added_at_as_rfc3339() {
        let json = serde_json::to_value(lot("AAPL", 150.0, 2)).unwrap();
        assert_eq!(json["added_at"], "2024-01-01T00:00:00Z");
        assert_eq!(json["stock_symbol"], "AAPL");
        assert!(json["industry"].is_null());
    }
}
