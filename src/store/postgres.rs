use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Movie, Role, User, WatchEntry};
use crate::store::{MovieStore, UserStore};

/// Connects the pool, runs the embedded migrations and hands back the two
/// store halves sharing it.
pub async fn connect(database_url: &str) -> anyhow::Result<(PgUserStore, PgMovieStore)> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("run migrations")?;

    Ok((PgUserStore { pool: pool.clone() }, PgMovieStore { pool }))
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    watchlist: Vec<Uuid>,
    recently_watched: Json<Vec<WatchEntry>>,
    created_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            name: r.name,
            email: r.email,
            password_hash: r.password_hash,
            role: Role::parse(&r.role),
            watchlist: r.watchlist,
            recently_watched: r.recently_watched.0,
            created_at: r.created_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, watchlist, recently_watched, created_at";

fn unique_violation(e: sqlx::Error, conflict: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(conflict.to_string())
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, watchlist, recently_watched, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.watchlist)
        .bind(Json(&user.recently_watched))
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Email already registered"))?;
        Ok(())
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, watchlist, recently_watched, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                role = EXCLUDED.role,
                watchlist = EXCLUDED.watchlist,
                recently_watched = EXCLUDED.recently_watched
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.watchlist)
        .bind(Json(&user.recently_watched))
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

const MOVIE_COLUMNS: &str = "id, title, slug, description, genres, release_date, runtime_minutes, \
     cast_members, director, language, poster_url, trailer_url, video_url, \
     is_published, created_at, updated_at";

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn get(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(movie)
    }

    async fn get_many(&self, ids: &[Uuid]) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(movies)
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(movie)
    }

    async fn find_published(&self, limit: i64) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE is_published ORDER BY created_at LIMIT $1"
        ))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(movies)
    }

    async fn find_by_genres_excluding(
        &self,
        genres: &[String],
        exclude_ids: &[Uuid],
        limit: i64,
    ) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(&format!(
            r#"
            SELECT {MOVIE_COLUMNS} FROM movies
            WHERE is_published
              AND genres && $1
              AND NOT (id = ANY($2))
            ORDER BY created_at
            LIMIT $3
            "#
        ))
        .bind(genres)
        .bind(exclude_ids)
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(movies)
    }

    async fn list_all(&self) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(movies)
    }

    async fn insert(&self, movie: &Movie) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO movies (id, title, slug, description, genres, release_date,
                runtime_minutes, cast_members, director, language, poster_url,
                trailer_url, video_url, is_published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(&movie.slug)
        .bind(&movie.description)
        .bind(&movie.genres)
        .bind(movie.release_date)
        .bind(movie.runtime_minutes)
        .bind(&movie.cast)
        .bind(&movie.director)
        .bind(&movie.language)
        .bind(&movie.poster_url)
        .bind(&movie.trailer_url)
        .bind(&movie.video_url)
        .bind(movie.is_published)
        .bind(movie.created_at)
        .bind(movie.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Slug already in use"))?;
        Ok(())
    }

    async fn update(&self, movie: &Movie) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE movies SET
                title = $2, slug = $3, description = $4, genres = $5,
                release_date = $6, runtime_minutes = $7, cast_members = $8,
                director = $9, language = $10, poster_url = $11,
                trailer_url = $12, video_url = $13, is_published = $14,
                updated_at = $15
            WHERE id = $1
            "#,
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(&movie.slug)
        .bind(&movie.description)
        .bind(&movie.genres)
        .bind(movie.release_date)
        .bind(movie.runtime_minutes)
        .bind(&movie.cast)
        .bind(&movie.director)
        .bind(&movie.language)
        .bind(&movie.poster_url)
        .bind(&movie.trailer_url)
        .bind(&movie.video_url)
        .bind(movie.is_published)
        .bind(movie.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Slug already in use"))?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Movie not found".into()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
