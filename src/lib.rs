pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod movies;
pub mod state;
pub mod store;
pub mod users;
