use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::stocks::service::resolve_price;
use crate::watchlist::dto::{
    normalize_quantity, AddItemRequest, ListResponse, MessageResponse, UpdateItemRequest,
};
use crate::watchlist::repo::{watchlist_total, WatchlistItem};

pub fn watchlist_routes() -> Router<AppState> {
    Router::new()
        .route("/watchlist", get(list_watchlist).post(add_to_watchlist))
        .route(
            "/watchlist/:id",
            put(update_watchlist_item).delete(remove_from_watchlist),
        )
}

#[instrument(skip(state))]
pub async fn list_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ListResponse>, ApiError> {
    let items = WatchlistItem::list_by_user(&state.db, user_id).await?;
    let total = watchlist_total(&items);
    Ok(Json(ListResponse {
        total,
        watchlist: items,
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.stock_symbol.is_empty() {
        return Err(ApiError::Validation("Stock symbol is required".into()));
    }
    let quantity = normalize_quantity(payload.quantity);

    let (price_at_time, added_at) = if payload.manual {
        // Manual entry takes the supplied price and date verbatim, no lookup.
        match (payload.price_at_time, payload.added_at) {
            (Some(price), Some(at)) => (price, at),
            _ => {
                return Err(ApiError::Validation(
                    "Manual entry requires price and added_at date.".into(),
                ))
            }
        }
    } else {
        let (price, _source) =
            resolve_price(&state.db, state.provider.as_ref(), &payload.stock_symbol).await?;
        (price, OffsetDateTime::now_utc())
    };

    WatchlistItem::insert(
        &state.db,
        user_id,
        &payload.stock_symbol,
        price_at_time,
        quantity,
        added_at,
        payload.industry.as_deref(),
    )
    .await?;

    info!(user_id, symbol = %payload.stock_symbol, price_at_time, quantity, "lot added");
    Ok(Json(MessageResponse {
        message: format!(
            "Stock {} added with price {} and quantity {}",
            payload.stock_symbol, price_at_time, quantity
        ),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_watchlist_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Ownership check by a prior read; absent and not-owned look identical.
    if WatchlistItem::find_owned(&state.db, id, user_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Watchlist item not found".into()));
    }

    WatchlistItem::update_partial(
        &state.db,
        id,
        payload.quantity,
        payload.price_at_time,
        payload.added_at,
    )
    .await?;

    info!(user_id, item_id = id, "lot updated");
    Ok(Json(MessageResponse {
        message: "Watchlist item updated".into(),
    }))
}

#[instrument(skip(state))]
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !WatchlistItem::delete_owned(&state.db, id, user_id).await? {
        return Err(ApiError::NotFound("Watchlist item not found".into()));
    }

    info!(user_id, item_id = id, "lot removed");
    Ok(Json(MessageResponse {
        message: "Watchlist item removed".into(),
    }))
}
