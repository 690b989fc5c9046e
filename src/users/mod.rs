use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod history;
pub mod recommend;
pub mod watchlist;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
