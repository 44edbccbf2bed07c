pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod utils;

use sqlx::PgPool;

use crate::auth::AuthConfig;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let auth = AuthConfig::new(config.jwt_secret.clone(), config.secure_cookies);
        Self { pool, config, auth }
    }
}

impl axum::extract::FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for AuthConfig {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
