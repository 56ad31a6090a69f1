//! Application state shared across handlers

use common::jwt::TokenService;
use std::sync::Arc;

use crate::repositories::ItemStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub item_repository: Arc<dyn ItemStore>,
    pub token_service: TokenService,
}
