use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::memory::{MemoryMovieStore, MemoryUserStore};
use crate::store::{self, MovieStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub movies: Arc<dyn MovieStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Picks the storage backend once, at process start. Handlers only ever
    /// see the trait objects.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        match config.database_url.clone() {
            Some(url) => {
                let (users, movies) = store::postgres::connect(&url).await?;
                tracing::info!("using postgres-backed store");
                Ok(Self {
                    users: Arc::new(users),
                    movies: Arc::new(movies),
                    config,
                })
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store");
                Ok(Self::in_memory(config))
            }
        }
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self {
            users: Arc::new(MemoryUserStore::default()),
            movies: Arc::new(MemoryMovieStore::default()),
            config,
        }
    }

    /// In-memory state with a fixed test configuration.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: crate::config::JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_days: 7,
            },
        });
        Self::in_memory(config)
    }
}
