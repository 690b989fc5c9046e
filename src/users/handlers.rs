use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{Movie, User, WatchEntry},
    state::AppState,
    users::dto::{
        ProfileResponse, RecentlyWatchedRequest, RecommendQuery, WatchHistoryItem,
        WatchlistRequest,
    },
    users::{history, recommend, watchlist},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me))
        .route("/users/watchlist", get(get_watchlist).post(add_to_watchlist))
        .route("/users/watchlist/:movie_id", axum::routing::delete(remove_from_watchlist))
        .route("/users/recently-watched", post(update_recently_watched))
        .route("/users/recommendations", get(get_recommendations))
}

async fn load_user(state: &AppState, id: Uuid) -> AppResult<User> {
    state
        .users
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

fn parse_movie_id(raw: Option<String>) -> AppResult<Uuid> {
    let raw = raw.ok_or_else(|| AppError::InvalidArgument("Missing params".into()))?;
    raw.parse()
        .map_err(|_| AppError::InvalidArgument("Invalid movie id".into()))
}

/// Fetches the referenced movies and returns them in the order of `ids`.
async fn populate(state: &AppState, ids: &[Uuid]) -> AppResult<Vec<Movie>> {
    let movies = state.movies.get_many(ids).await?;
    let mut by_id: HashMap<Uuid, Movie> = movies.into_iter().map(|m| (m.id, m)).collect();
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

async fn populate_history(
    state: &AppState,
    entries: &[WatchEntry],
) -> AppResult<Vec<WatchHistoryItem>> {
    let ids: Vec<Uuid> = entries.iter().map(|e| e.movie_id).collect();
    let movies = state.movies.get_many(&ids).await?;
    let mut by_id: HashMap<Uuid, Movie> = movies.into_iter().map(|m| (m.id, m)).collect();
    Ok(entries
        .iter()
        .map(|e| WatchHistoryItem {
            movie: by_id.remove(&e.movie_id),
            watched_at: e.watched_at,
            position: e.position,
        })
        .collect())
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let user = load_user(&state, auth.id).await?;
    let recently_watched = populate_history(&state, &user.recently_watched).await?;
    Ok(Json(ProfileResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        watchlist: user.watchlist,
        recently_watched,
    }))
}

#[instrument(skip(state))]
pub async fn get_watchlist(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<Movie>>> {
    let user = load_user(&state, auth.id).await?;
    Ok(Json(populate(&state, &user.watchlist).await?))
}

#[instrument(skip(state, payload))]
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<WatchlistRequest>,
) -> AppResult<Json<Vec<Movie>>> {
    let movie_id = parse_movie_id(payload.movie_id)?;
    let mut user = load_user(&state, auth.id).await?;

    watchlist::add(&mut user.watchlist, movie_id);
    state.users.save(&user).await?;

    info!(user_id = %user.id, %movie_id, "watchlist add");
    Ok(Json(populate(&state, &user.watchlist).await?))
}

#[instrument(skip(state))]
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(movie_id): Path<Uuid>,
) -> AppResult<Json<Vec<Movie>>> {
    let mut user = load_user(&state, auth.id).await?;

    let before = user.watchlist.len();
    watchlist::remove(&mut user.watchlist, movie_id);
    state.users.save(&user).await?;

    debug!(user_id = %user.id, %movie_id, before, after = user.watchlist.len(), "watchlist remove");
    Ok(Json(populate(&state, &user.watchlist).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_recently_watched(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecentlyWatchedRequest>,
) -> AppResult<Json<Vec<WatchHistoryItem>>> {
    let movie_id = parse_movie_id(payload.movie_id)?;
    let mut user = load_user(&state, auth.id).await?;

    history::push_watch(
        &mut user.recently_watched,
        movie_id,
        payload.position,
        OffsetDateTime::now_utc(),
    );
    state.users.save(&user).await?;

    debug!(user_id = %user.id, %movie_id, position = payload.position, "recently-watched updated");
    Ok(Json(populate_history(&state, &user.recently_watched).await?))
}

#[instrument(skip(state))]
pub async fn get_recommendations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(q): Query<RecommendQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let user = load_user(&state, auth.id).await?;
    let limit = q.limit.unwrap_or(recommend::DEFAULT_LIMIT);

    let watched_ids: Vec<Uuid> = user.recently_watched.iter().map(|e| e.movie_id).collect();
    let movies = state.movies.get_many(&watched_ids).await?;
    let by_id: HashMap<Uuid, Movie> = movies.into_iter().map(|m| (m.id, m)).collect();

    let top = recommend::top_genres(&user.recently_watched, &by_id, recommend::TOP_GENRES);
    if top.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let recs = state
        .movies
        .find_by_genres_excluding(&top, &watched_ids, limit)
        .await?;
    debug!(user_id = %user.id, genres = ?top, count = recs.len(), "recommendations");
    Ok(Json(recs))
}
