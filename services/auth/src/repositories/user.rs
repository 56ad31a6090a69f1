//! PostgreSQL credential store

use async_trait::async_trait;
use common::error::{CoreError, CoreResult};
use sqlx::PgPool;
use tracing::info;

use super::CredentialStore;
use crate::models::User;

/// User repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgUserRepository {
    async fn get(&self, username: &str) -> CoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or(CoreError::NotFound)
    }

    /// Uniqueness rides on the primary key: a concurrent duplicate fails
    /// with a unique violation, which maps to `Conflict`.
    async fn create(&self, username: &str, password_hash: &str) -> CoreResult<User> {
        info!("Creating new user: {}", username);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
