use serde::Deserialize;
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Body for admin movie creation. The slug is derived from the title when
/// absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, with = "iso_date::option")]
    pub release_date: Option<Date>,
    pub runtime_minutes: Option<i32>,
    #[serde(default)]
    pub cast: Vec<String>,
    pub director: Option<String>,
    pub language: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub video_url: Option<String>,
    pub is_published: Option<bool>,
}

/// Body for admin movie update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub genres: Option<Vec<String>>,
    #[serde(default, with = "iso_date::option")]
    pub release_date: Option<Date>,
    pub runtime_minutes: Option<i32>,
    pub cast: Option<Vec<String>>,
    pub director: Option<String>,
    pub language: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub video_url: Option<String>,
    pub is_published: Option<bool>,
}
