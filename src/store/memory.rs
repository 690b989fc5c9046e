use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Movie, User};
use crate::store::{MovieStore, UserStore};

/// In-memory user store, used by the test suite and when no `DATABASE_URL`
/// is configured.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

/// In-memory catalog. A `Vec` keeps insertion order, which stands in for
/// the catalog order of the persistent store.
#[derive(Default)]
pub struct MemoryMovieStore {
    movies: RwLock<Vec<Movie>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn get(&self, id: Uuid) -> AppResult<Option<Movie>> {
        Ok(self.movies.read().await.iter().find(|m| m.id == id).cloned())
    }

    async fn get_many(&self, ids: &[Uuid]) -> AppResult<Vec<Movie>> {
        Ok(self
            .movies
            .read()
            .await
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Movie>> {
        Ok(self
            .movies
            .read()
            .await
            .iter()
            .find(|m| m.slug == slug)
            .cloned())
    }

    async fn find_published(&self, limit: i64) -> AppResult<Vec<Movie>> {
        Ok(self
            .movies
            .read()
            .await
            .iter()
            .filter(|m| m.is_published)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_by_genres_excluding(
        &self,
        genres: &[String],
        exclude_ids: &[Uuid],
        limit: i64,
    ) -> AppResult<Vec<Movie>> {
        Ok(self
            .movies
            .read()
            .await
            .iter()
            .filter(|m| {
                m.is_published
                    && !exclude_ids.contains(&m.id)
                    && m.genres.iter().any(|g| genres.contains(g))
            })
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> AppResult<Vec<Movie>> {
        Ok(self.movies.read().await.clone())
    }

    async fn insert(&self, movie: &Movie) -> AppResult<()> {
        let mut movies = self.movies.write().await;
        if movies.iter().any(|m| m.slug == movie.slug) {
            return Err(AppError::Conflict("Slug already in use".into()));
        }
        movies.push(movie.clone());
        Ok(())
    }

    async fn update(&self, movie: &Movie) -> AppResult<()> {
        let mut movies = self.movies.write().await;
        if movies
            .iter()
            .any(|m| m.slug == movie.slug && m.id != movie.id)
        {
            return Err(AppError::Conflict("Slug already in use".into()));
        }
        match movies.iter_mut().find(|m| m.id == movie.id) {
            Some(slot) => {
                *slot = movie.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("Movie not found".into())),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut movies = self.movies.write().await;
        let before = movies.len();
        movies.retain(|m| m.id != id);
        Ok(movies.len() < before)
    }
}
