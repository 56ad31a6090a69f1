//! Item store abstraction and its backends
//!
//! Route handlers depend only on `dyn ItemStore`. The in-memory backend is
//! a non-production fallback: its identity counter starts over on every
//! restart and is scoped to one store instance.

use async_trait::async_trait;
use common::error::CoreResult;

use crate::models::Item;

pub mod item;
pub mod memory;

pub use item::PgItemRepository;
pub use memory::InMemoryItemRepository;

/// Persistence for item records
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, most recently updated first
    async fn list(&self) -> CoreResult<Vec<Item>>;

    /// One item, or `NotFound`
    async fn get(&self, id: &str) -> CoreResult<Item>;

    /// Store a new item with a fresh id and both timestamps set to now
    async fn create(&self, name: &str, description: &str) -> CoreResult<Item>;

    /// Replace name and description and refresh `updated_at`, or `NotFound`
    async fn update(&self, id: &str, name: &str, description: &str) -> CoreResult<Item>;

    /// Remove an item, or `NotFound`
    async fn delete(&self, id: &str) -> CoreResult<()>;
}
