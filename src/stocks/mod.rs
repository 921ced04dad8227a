use axum::Router;

use crate::state::AppState;

pub mod handlers;
pub mod provider;
pub mod repo;
pub mod service;

pub fn router() -> Router<AppState> {
    handlers::stock_routes()
}
