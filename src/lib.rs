pub mod app_state;
pub mod articles;
pub mod auth;
pub mod config;
pub mod entities;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod middleware;
pub mod pagination;
pub mod repositories;
pub mod response;
pub mod router;
pub mod sanitizer;
pub mod telemetry;
pub mod users;
