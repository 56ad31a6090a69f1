//! In-memory credential store, used when no database is configured

use async_trait::async_trait;
use chrono::Utc;
use common::error::{CoreError, CoreResult};
use std::collections::{HashMap, hash_map::Entry};
use tokio::sync::RwLock;
use tracing::info;

use super::CredentialStore;
use crate::models::User;

/// User repository backed by a map behind a single reader-writer lock
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryUserRepository {
    async fn get(&self, username: &str) -> CoreResult<User> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or(CoreError::NotFound)
    }

    async fn create(&self, username: &str, password_hash: &str) -> CoreResult<User> {
        // Check and insert under one write guard so duplicates cannot race
        let mut users = self.users.write().await;

        match users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(CoreError::Conflict),
            Entry::Vacant(slot) => {
                let user = User {
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                info!("Created user: {}", username);
                Ok(user)
            }
        }
    }
}
