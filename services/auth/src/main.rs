use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

mod models;
mod password;
mod rate_limiter;
mod repositories;
mod routes;
mod validation;

use common::{
    config::ServiceConfig,
    database::{self, DatabaseConfig},
    jwt::TokenService,
};
use tokio::net::TcpListener;

use crate::{
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::{CredentialStore, InMemoryUserRepository, PgUserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn CredentialStore>,
    pub token_service: TokenService,
    pub rate_limiter: RateLimiter,
}

#[tokio::main]
async fn main() -> Result<()> {
    common::init_tracing();

    info!("Starting authentication service");

    let config = ServiceConfig::load(3000)?;

    let user_repository: Arc<dyn CredentialStore> = match DatabaseConfig::from_env() {
        Some(db_config) => {
            let pool = database::init_pool(&db_config).await?;
            database::health_check(&pool).await?;
            database::migrate(&pool).await?;
            info!("Using PostgreSQL credential store");
            Arc::new(PgUserRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory credential store");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    password::warm_up().await?;

    let app_state = AppState {
        user_repository,
        token_service: TokenService::new(config.token),
        rate_limiter: RateLimiter::new(RateLimiterConfig::default()),
    };

    info!(
        max_attempts = app_state.rate_limiter.config().max_attempts,
        "Authentication service initialized successfully"
    );

    let app = routes::create_router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Authentication service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down authentication service");
        })
        .await?;

    Ok(())
}
