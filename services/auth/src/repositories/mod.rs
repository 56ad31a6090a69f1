//! Credential store abstraction and its backends
//!
//! Handlers only ever see `dyn CredentialStore`; the backend is picked at
//! startup depending on whether a database is configured.

use async_trait::async_trait;
use common::error::CoreResult;

use crate::models::User;

pub mod memory;
pub mod user;

pub use memory::InMemoryUserRepository;
pub use user::PgUserRepository;

/// Username to password-hash mapping with unique usernames
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch a user, or `NotFound`
    async fn get(&self, username: &str) -> CoreResult<User>;

    /// Store a new user, or `Conflict` if the username is taken
    ///
    /// Concurrent calls with the same username yield exactly one success.
    async fn create(&self, username: &str, password_hash: &str) -> CoreResult<User>;
}
