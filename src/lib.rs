pub mod config;
pub mod db;
pub mod health;
pub mod repos;
pub mod reports;
pub mod routes;
pub mod services;

use sqlx::PgPool;

/// Shared application state injected into route handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: config::Config,
}
