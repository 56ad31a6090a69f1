use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;

use common::{
    config::ServiceConfig,
    database::{self, DatabaseConfig},
    jwt::TokenService,
};
use tokio::net::TcpListener;

use crate::{
    repositories::{InMemoryItemRepository, ItemStore, PgItemRepository},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    common::init_tracing();

    info!("Starting API service");

    let config = ServiceConfig::load(3001)?;

    let item_repository: Arc<dyn ItemStore> = match DatabaseConfig::from_env() {
        Some(db_config) => {
            let pool = database::init_pool(&db_config).await?;
            database::health_check(&pool).await?;
            database::migrate(&pool).await?;
            info!("Using PostgreSQL item store");
            Arc::new(PgItemRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory item store");
            Arc::new(InMemoryItemRepository::new())
        }
    };

    let app_state = AppState {
        item_repository,
        token_service: TokenService::new(config.token),
    };

    info!("API service initialized successfully");

    let app = routes::create_router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down API service");
        })
        .await?;

    Ok(())
}
