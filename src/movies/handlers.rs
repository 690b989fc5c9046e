use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
    state::AppState,
};

/// Browsing cap on the public listing.
const PUBLIC_LIST_LIMIT: i64 = 50;

pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/:slug", get(get_movie_by_slug))
}

#[instrument(skip(state))]
pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.movies.find_published(PUBLIC_LIST_LIMIT).await?;
    Ok(Json(movies))
}

#[instrument(skip(state))]
pub async fn get_movie_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Movie>> {
    let movie = state
        .movies
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".into()))?;
    Ok(Json(movie))
}
