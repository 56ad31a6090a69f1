//! In-memory item store, used when no database is configured

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use common::error::{CoreError, CoreResult};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::ItemStore;
use crate::models::Item;

#[derive(Debug, Default)]
struct Inner {
    items: HashMap<String, Item>,
    counter: u64,
}

/// Item repository backed by a map behind a single reader-writer lock
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    inner: RwLock<Inner>,
}

impl InMemoryItemRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

/// A timestamp strictly after `previous`, normally just "now"
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[async_trait]
impl ItemStore for InMemoryItemRepository {
    async fn list(&self) -> CoreResult<Vec<Item>> {
        let inner = self.inner.read().await;
        let mut items: Vec<Item> = inner.items.values().cloned().collect();

        // Newest first; ids break ties so the order is stable
        items.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.len().cmp(&a.id.len()))
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(items)
    }

    async fn get(&self, id: &str) -> CoreResult<Item> {
        self.inner
            .read()
            .await
            .items
            .get(id)
            .cloned()
            .ok_or(CoreError::NotFound)
    }

    async fn create(&self, name: &str, description: &str) -> CoreResult<Item> {
        let mut inner = self.inner.write().await;

        inner.counter += 1;
        let id = inner.counter.to_string();
        let now = Utc::now();

        let item = Item {
            id: id.clone(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.items.insert(id, item.clone());

        Ok(item)
    }

    async fn update(&self, id: &str, name: &str, description: &str) -> CoreResult<Item> {
        let mut inner = self.inner.write().await;
        let item = inner.items.get_mut(id).ok_or(CoreError::NotFound)?;

        item.name = name.to_string();
        item.description = description.to_string();
        item.updated_at = next_timestamp(item.updated_at);

        Ok(item.clone())
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        self.inner
            .write()
            .await
            .items
            .remove(id)
            .map(|_| ())
            .ok_or(CoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_then_get() {
        let repo = InMemoryItemRepository::new();
        let created = repo.create("Widget", "A sample widget").await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.created_at, created.updated_at);

        let fetched = repo.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.description, "A sample widget");
    }

    #[tokio::test]
    async fn test_ids_increase_per_instance() {
        let repo = InMemoryItemRepository::new();
        let first = repo.create("a", "").await.unwrap();
        let second = repo.create("b", "").await.unwrap();
        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");

        let other = InMemoryItemRepository::new();
        assert_eq!(other.create("c", "").await.unwrap().id, "1");
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at_only() {
        let repo = InMemoryItemRepository::new();
        let created = repo.create("Widget", "old").await.unwrap();

        let updated = repo.update(&created.id, "Gadget", "new").await.unwrap();
        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.description, "new");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);

        assert_eq!(repo.get(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let repo = InMemoryItemRepository::new();

        assert!(matches!(repo.get("999").await, Err(CoreError::NotFound)));
        assert!(matches!(
            repo.update("999", "x", "").await,
            Err(CoreError::NotFound)
        ));
        assert!(matches!(repo.delete("999").await, Err(CoreError::NotFound)));
        assert!(matches!(repo.get("abc").await, Err(CoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_then_everything_is_not_found() {
        let repo = InMemoryItemRepository::new();
        let item = repo.create("Widget", "").await.unwrap();

        repo.delete(&item.id).await.unwrap();

        assert!(matches!(repo.get(&item.id).await, Err(CoreError::NotFound)));
        assert!(matches!(
            repo.update(&item.id, "x", "").await,
            Err(CoreError::NotFound)
        ));
        assert!(matches!(
            repo.delete(&item.id).await,
            Err(CoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_is_most_recently_updated_first() {
        let repo = InMemoryItemRepository::new();
        let a = repo.create("a", "").await.unwrap();
        let b = repo.create("b", "").await.unwrap();
        let c = repo.create("c", "").await.unwrap();
        repo.update(&a.id, "a2", "").await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![a.id, c.id, b.id]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_ids() {
        let repo = Arc::new(InMemoryItemRepository::new());

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.create(&format!("item {}", i), "").await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().unwrap().id);
        }

        assert_eq!(ids.len(), 50);
        assert_eq!(repo.list().await.unwrap().len(), 50);
    }
}
