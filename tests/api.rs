use axum::extract::FromRef;
use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum_test::TestServer;
use serde_json::json;
use uuid::Uuid;

use streamflix::app::build_app;
use streamflix::auth::JwtKeys;
use streamflix::models::{Role, User};
use streamflix::state::AppState;

fn server_with_state() -> (TestServer, AppState) {
    let state = AppState::fake();
    let server = TestServer::new(build_app(state.clone())).unwrap();
    (server, state)
}

fn bearer(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap()
}

/// Inserts an admin user directly into the store and returns a bearer token.
async fn seed_admin(state: &AppState) -> String {
    let mut admin = User::new(
        "Admin".into(),
        "admin@streamflix.test".into(),
        "unused".into(),
    );
    admin.role = Role::Admin;
    state.users.insert(&admin).await.unwrap();
    let token = JwtKeys::from_ref(state).sign(admin.id, Role::Admin).unwrap();
    format!("Bearer {token}")
}

async fn register(server: &TestServer, email: &str) -> (String, String) {
    let res = server
        .post("/api/auth/register")
        .json(&json!({ "name": "Viewer", "email": email, "password": "hunter22" }))
        .await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    (
        format!("Bearer {}", body["token"].as_str().unwrap()),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

async fn create_movie(
    server: &TestServer,
    admin: &str,
    title: &str,
    genres: &[&str],
) -> String {
    let res = server
        .post("/api/admin/movies")
        .add_header(AUTHORIZATION, bearer(admin))
        .json(&json!({ "title": title, "genres": genres }))
        .await;
    res.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = res.json();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_and_root() {
    let (server, _) = server_with_state();
    server.get("/api/health").await.assert_status_ok();
    let res = server.get("/").await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["message"], "StreamFlix API is running");
}

#[tokio::test]
async fn register_login_me_flow() {
    let (server, _) = server_with_state();
    let (token, user_id) = register(&server, "flow@example.com").await;

    let res = server
        .post("/api/auth/login")
        .json(&json!({ "email": "Flow@Example.com ", "password": "hunter22" }))
        .await;
    res.assert_status_ok();

    let res = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["role"], "user");
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn register_duplicate_email_conflicts_and_leaves_original() {
    let (server, state) = server_with_state();
    let (_, user_id) = register(&server, "dup@example.com").await;

    let res = server
        .post("/api/auth/register")
        .json(&json!({ "name": "Other", "email": "dup@example.com", "password": "hunter22" }))
        .await;
    res.assert_status(axum::http::StatusCode::CONFLICT);
    let body: serde_json::Value = res.json();
    assert!(body["message"].as_str().unwrap().contains("registered"));

    // Original record untouched.
    let stored = state
        .users
        .find_by_email("dup@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id.to_string(), user_id);
    assert_eq!(stored.name, "Viewer");
}

#[tokio::test]
async fn register_validates_input() {
    let (server, _) = server_with_state();
    let res = server
        .post("/api/auth/register")
        .json(&json!({ "name": "X", "email": "not-an-email", "password": "hunter22" }))
        .await;
    res.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let res = server
        .post("/api/auth/register")
        .json(&json!({ "name": "X", "email": "short@example.com", "password": "abc" }))
        .await;
    res.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (server, _) = server_with_state();
    register(&server, "creds@example.com").await;

    let res = server
        .post("/api/auth/login")
        .json(&json!({ "email": "creds@example.com", "password": "wrong-password" }))
        .await;
    res.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let res = server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "whatever" }))
        .await;
    res.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (server, _) = server_with_state();
    let res = server.get("/api/users/watchlist").await;
    res.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let res = server
        .get("/api/users/watchlist")
        .add_header(AUTHORIZATION, bearer("Bearer garbage"))
        .await;
    res.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_plain_users() {
    let (server, _) = server_with_state();
    let (token, _) = register(&server, "plain@example.com").await;

    let res = server
        .post("/api/admin/movies")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "title": "Nope" }))
        .await;
    res.assert_status(axum::http::StatusCode::FORBIDDEN);

    let res = server.get("/api/admin/movies").await;
    res.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_movie_crud() {
    let (server, state) = server_with_state();
    let admin = seed_admin(&state).await;

    let id = create_movie(&server, &admin, "The Matrix", &["Action", "Sci-Fi"]).await;

    // Slug derived from the title, visible on the public route.
    let res = server.get("/api/movies/the-matrix").await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["title"], "The Matrix");
    assert_eq!(body["genres"], json!(["Action", "Sci-Fi"]));

    // Duplicate slug conflicts.
    let res = server
        .post("/api/admin/movies")
        .add_header(AUTHORIZATION, bearer(&admin))
        .json(&json!({ "title": "The Matrix" }))
        .await;
    res.assert_status(axum::http::StatusCode::CONFLICT);

    // Partial update touches only the provided fields.
    let res = server
        .put(&format!("/api/admin/movies/{id}"))
        .add_header(AUTHORIZATION, bearer(&admin))
        .json(&json!({ "director": "Lana Wachowski, Lilly Wachowski" }))
        .await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["title"], "The Matrix");
    assert_eq!(body["director"], "Lana Wachowski, Lilly Wachowski");
    assert!(body["updatedAt"].is_string());

    // Unpublished movies disappear from the public listing but not admin's.
    let res = server
        .put(&format!("/api/admin/movies/{id}"))
        .add_header(AUTHORIZATION, bearer(&admin))
        .json(&json!({ "isPublished": false }))
        .await;
    res.assert_status_ok();
    let public: Vec<serde_json::Value> = server.get("/api/movies").await.json();
    assert!(public.is_empty());
    let all: Vec<serde_json::Value> = server
        .get("/api/admin/movies")
        .add_header(AUTHORIZATION, bearer(&admin))
        .await
        .json();
    assert_eq!(all.len(), 1);

    // Delete, then 404.
    let res = server
        .delete(&format!("/api/admin/movies/{id}"))
        .add_header(AUTHORIZATION, bearer(&admin))
        .await;
    res.assert_status(axum::http::StatusCode::NO_CONTENT);
    let res = server
        .delete(&format!("/api/admin/movies/{id}"))
        .add_header(AUTHORIZATION, bearer(&admin))
        .await;
    res.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_slug_is_404() {
    let (server, _) = server_with_state();
    let res = server.get("/api/movies/no-such-movie").await;
    res.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn watchlist_add_remove_is_idempotent() {
    let (server, state) = server_with_state();
    let admin = seed_admin(&state).await;
    let (token, _) = register(&server, "lists@example.com").await;
    let movie_id = create_movie(&server, &admin, "Heat", &["Crime"]).await;

    // Double add keeps a single entry.
    for _ in 0..2 {
        let res = server
            .post("/api/users/watchlist")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&json!({ "movieId": movie_id }))
            .await;
        res.assert_status_ok();
        let list: Vec<serde_json::Value> = res.json();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], movie_id.as_str());
    }

    // Removing an absent movie is a no-op, not an error.
    let res = server
        .delete(&format!("/api/users/watchlist/{}", Uuid::new_v4()))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    res.assert_status_ok();
    let list: Vec<serde_json::Value> = res.json();
    assert_eq!(list.len(), 1);

    let res = server
        .delete(&format!("/api/users/watchlist/{movie_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    res.assert_status_ok();
    let list: Vec<serde_json::Value> = res.json();
    assert!(list.is_empty());
}

#[tokio::test]
async fn watchlist_requires_movie_id() {
    let (server, _) = server_with_state();
    let (token, _) = register(&server, "missing@example.com").await;

    let res = server
        .post("/api/users/watchlist")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({}))
        .await;
    res.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let res = server
        .post("/api/users/watchlist")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "movieId": "not-a-uuid" }))
        .await;
    res.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recently_watched_dedups_and_refreshes() {
    let (server, state) = server_with_state();
    let admin = seed_admin(&state).await;
    let (token, _) = register(&server, "watcher@example.com").await;
    let first = create_movie(&server, &admin, "Alien", &["Horror"]).await;
    let second = create_movie(&server, &admin, "Aliens", &["Horror"]).await;

    for (id, pos) in [(&first, 10.0), (&second, 20.0), (&first, 300.0)] {
        let res = server
            .post("/api/users/recently-watched")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&json!({ "movieId": id, "position": pos }))
            .await;
        res.assert_status_ok();
    }

    let res = server
        .get("/api/users/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    let history = body["recentlyWatched"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["movie"]["id"], first.as_str());
    assert_eq!(history[0]["position"], 300.0);
    assert_eq!(history[1]["movie"]["id"], second.as_str());
}

#[tokio::test]
async fn recommendations_follow_recent_genres_and_exclude_watched() {
    let (server, state) = server_with_state();
    let admin = seed_admin(&state).await;
    let (token, _) = register(&server, "recs@example.com").await;

    // Empty history: empty list, not an error.
    let res = server
        .get("/api/users/recommendations")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    res.assert_status_ok();
    let recs: Vec<serde_json::Value> = res.json();
    assert!(recs.is_empty());

    let a = create_movie(&server, &admin, "Movie A", &["Sci-Fi", "Action"]).await;
    let b = create_movie(&server, &admin, "Movie B", &["Sci-Fi"]).await;
    let c = create_movie(&server, &admin, "Movie C", &["Drama"]).await;
    let scifi = create_movie(&server, &admin, "Fresh Sci-Fi", &["Sci-Fi"]).await;
    let _romance = create_movie(&server, &admin, "Off Genre", &["Romance"]).await;

    // Watch C, B, A so the history reads A, B, C newest-first.
    for id in [&c, &b, &a] {
        server
            .post("/api/users/recently-watched")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&json!({ "movieId": id }))
            .await
            .assert_status_ok();
    }

    let res = server
        .get("/api/users/recommendations")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    res.assert_status_ok();
    let recs: Vec<serde_json::Value> = res.json();
    let ids: Vec<&str> = recs.iter().map(|m| m["id"].as_str().unwrap()).collect();

    // Top genres are Sci-Fi/Action/Drama, so the fresh Sci-Fi title comes
    // back while everything already watched and the off-genre title do not.
    assert!(ids.contains(&scifi.as_str()));
    assert!(!ids.contains(&a.as_str()));
    assert!(!ids.contains(&b.as_str()));
    assert!(!ids.contains(&c.as_str()));
    assert!(!ids.contains(&_romance.as_str()));
}

#[tokio::test]
async fn recommendations_respect_limit() {
    let (server, state) = server_with_state();
    let admin = seed_admin(&state).await;
    let (token, _) = register(&server, "limit@example.com").await;

    let seed = create_movie(&server, &admin, "Seed", &["Action"]).await;
    for i in 0..5 {
        create_movie(&server, &admin, &format!("Action {i}"), &["Action"]).await;
    }
    server
        .post("/api/users/recently-watched")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "movieId": seed }))
        .await
        .assert_status_ok();

    let res = server
        .get("/api/users/recommendations?limit=2")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    res.assert_status_ok();
    let recs: Vec<serde_json::Value> = res.json();
    assert_eq!(recs.len(), 2);

    // A negative limit clamps to nothing rather than erroring.
    let res = server
        .get("/api/users/recommendations?limit=-5")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    res.assert_status_ok();
    let recs: Vec<serde_json::Value> = res.json();
    assert!(recs.is_empty());
}
