use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;

pub use dto::PublicUser;
pub use jwt::{AdminUser, AuthUser, Claims, JwtKeys};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
