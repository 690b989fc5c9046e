use crate::state::AppState;
use axum::Router;

pub mod admin;
mod dto;
pub mod handlers;
pub mod slug;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::movie_routes())
}
