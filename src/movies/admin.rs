use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AdminUser,
    error::{AppError, AppResult},
    models::Movie,
    movies::dto::{CreateMovieRequest, UpdateMovieRequest},
    movies::slug::slugify,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/movies", get(list_all_movies).post(create_movie))
        .route("/admin/movies/:id", put(update_movie).delete(delete_movie))
}

#[instrument(skip(state))]
pub async fn list_all_movies(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> AppResult<Json<Vec<Movie>>> {
    Ok(Json(state.movies.list_all().await?))
}

#[instrument(skip(state, payload))]
pub async fn create_movie(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Json(payload): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    if payload.title.trim().is_empty() {
        return Err(AppError::InvalidArgument("Title is required".into()));
    }
    if matches!(payload.runtime_minutes, Some(m) if m <= 0) {
        return Err(AppError::InvalidArgument(
            "Runtime must be a positive integer".into(),
        ));
    }

    let slug = match payload.slug {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => slugify(&payload.title),
    };
    if slug.is_empty() {
        return Err(AppError::InvalidArgument("Cannot derive a slug".into()));
    }

    let movie = Movie {
        id: Uuid::new_v4(),
        title: payload.title.trim().to_string(),
        slug,
        description: payload.description,
        genres: payload.genres,
        release_date: payload.release_date,
        runtime_minutes: payload.runtime_minutes,
        cast: payload.cast,
        director: payload.director,
        language: payload.language,
        poster_url: payload.poster_url,
        trailer_url: payload.trailer_url,
        video_url: payload.video_url,
        is_published: payload.is_published.unwrap_or(true),
        created_at: OffsetDateTime::now_utc(),
        updated_at: None,
    };
    state.movies.insert(&movie).await?;

    info!(admin_id = %admin_id, movie_id = %movie.id, slug = %movie.slug, "movie created");
    Ok((StatusCode::CREATED, Json(movie)))
}

#[instrument(skip(state, payload))]
pub async fn update_movie(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovieRequest>,
) -> AppResult<Json<Movie>> {
    let mut movie = state
        .movies
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".into()))?;

    if let Some(title) = payload.title {
        if title.trim().is_empty() {
            return Err(AppError::InvalidArgument("Title is required".into()));
        }
        movie.title = title.trim().to_string();
    }
    if let Some(slug) = payload.slug {
        movie.slug = slug;
    }
    if let Some(description) = payload.description {
        movie.description = description;
    }
    if let Some(genres) = payload.genres {
        movie.genres = genres;
    }
    if let Some(release_date) = payload.release_date {
        movie.release_date = Some(release_date);
    }
    if let Some(runtime) = payload.runtime_minutes {
        if runtime <= 0 {
            return Err(AppError::InvalidArgument(
                "Runtime must be a positive integer".into(),
            ));
        }
        movie.runtime_minutes = Some(runtime);
    }
    if let Some(cast) = payload.cast {
        movie.cast = cast;
    }
    if let Some(director) = payload.director {
        movie.director = Some(director);
    }
    if let Some(language) = payload.language {
        movie.language = Some(language);
    }
    if let Some(poster_url) = payload.poster_url {
        movie.poster_url = Some(poster_url);
    }
    if let Some(trailer_url) = payload.trailer_url {
        movie.trailer_url = Some(trailer_url);
    }
    if let Some(video_url) = payload.video_url {
        movie.video_url = Some(video_url);
    }
    if let Some(is_published) = payload.is_published {
        movie.is_published = is_published;
    }
    movie.updated_at = Some(OffsetDateTime::now_utc());

    state.movies.update(&movie).await?;

    info!(admin_id = %admin_id, movie_id = %movie.id, "movie updated");
    Ok(Json(movie))
}

#[instrument(skip(state))]
pub async fn delete_movie(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.movies.delete(id).await? {
        return Err(AppError::NotFound("Movie not found".into()));
    }
    info!(admin_id = %admin_id, movie_id = %id, "movie deleted");
    Ok(StatusCode::NO_CONTENT)
}
