use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{Movie, Role};

/// Body for `POST /users/recently-watched`. The movie id arrives as a
/// string so missing or malformed values map to 400 instead of a body
/// rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyWatchedRequest {
    pub movie_id: Option<String>,
    #[serde(default)]
    pub position: f64,
}

/// Body for `POST /users/watchlist`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistRequest {
    pub movie_id: Option<String>,
}

/// A recently-watched entry with its movie populated (when it still
/// exists in the catalog).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryItem {
    pub movie: Option<Movie>,
    #[serde(with = "time::serde::rfc3339")]
    pub watched_at: OffsetDateTime,
    pub position: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub limit: Option<i64>,
}

/// Full profile for `GET /users/me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub watchlist: Vec<Uuid>,
    pub recently_watched: Vec<WatchHistoryItem>,
}
