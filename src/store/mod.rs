use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Movie, User};

pub mod memory;
pub mod postgres;

/// Persistence seam for user records. Selected once at startup; handlers
/// never branch on the backing implementation.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, user: &User) -> AppResult<()>;
    /// Whole-document upsert. Concurrent saves of the same user are
    /// last-write-wins.
    async fn save(&self, user: &User) -> AppResult<()>;
}

/// Persistence seam for the movie catalog.
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn get(&self, id: Uuid) -> AppResult<Option<Movie>>;
    async fn get_many(&self, ids: &[Uuid]) -> AppResult<Vec<Movie>>;
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Movie>>;
    /// Published movies in catalog order.
    async fn find_published(&self, limit: i64) -> AppResult<Vec<Movie>>;
    /// Published movies whose genre list intersects `genres`, excluding
    /// `exclude_ids`, in catalog order.
    async fn find_by_genres_excluding(
        &self,
        genres: &[String],
        exclude_ids: &[Uuid],
        limit: i64,
    ) -> AppResult<Vec<Movie>>;
    /// Every movie including unpublished ones (admin listing).
    async fn list_all(&self) -> AppResult<Vec<Movie>>;
    /// Fails with `Conflict` when the slug is already taken.
    async fn insert(&self, movie: &Movie) -> AppResult<()>;
    /// Fails with `NotFound` when the movie no longer exists.
    async fn update(&self, movie: &Movie) -> AppResult<()>;
    /// Returns whether a row was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
