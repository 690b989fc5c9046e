use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Two-value role enumeration; admin gates the catalog write endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Role {
        match s {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// One playback event in the recently-watched log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchEntry {
    pub movie_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub watched_at: OffsetDateTime,
    /// Playback position in seconds.
    pub position: f64,
}

/// User record. `watchlist` holds movie ids without duplicates;
/// `recently_watched` is most-recent-first and capped at 20 entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub watchlist: Vec<Uuid>,
    pub recently_watched: Vec<WatchEntry>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role: Role::User,
            watchlist: Vec::new(),
            recently_watched: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Catalog entry. `slug` is unique across the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub genres: Vec<String>,
    #[serde(default, with = "iso_date::option")]
    pub release_date: Option<Date>,
    pub runtime_minutes: Option<i32>,
    #[sqlx(rename = "cast_members")]
    pub cast: Vec<String>,
    pub director: Option<String>,
    pub language: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub video_url: Option<String>,
    pub is_published: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}
