//! PostgreSQL item store

use async_trait::async_trait;
use common::error::{CoreError, CoreResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use super::ItemStore;
use crate::models::Item;

/// Item repository for database operations
#[derive(Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    /// Create a new item repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Parse an opaque id into the table key
///
/// Anything that is not the canonical decimal form of a key can never
/// match a row, so it is reported as `NotFound`.
fn parse_id(id: &str) -> CoreResult<i64> {
    id.parse::<i64>()
        .ok()
        .filter(|key| key.to_string() == id)
        .ok_or(CoreError::NotFound)
}

fn item_from_row(row: &PgRow) -> Item {
    let id: i64 = row.get("id");
    Item {
        id: id.to_string(),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl ItemStore for PgItemRepository {
    /// Ordered through `idx_items_updated_at`
    async fn list(&self) -> CoreResult<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM items
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    async fn get(&self, id: &str) -> CoreResult<Item> {
        let key = parse_id(id)?;

        let row = sqlx::query(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(item_from_row).ok_or(CoreError::NotFound)
    }

    async fn create(&self, name: &str, description: &str) -> CoreResult<Item> {
        let row = sqlx::query(
            r#"
            INSERT INTO items (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        let item = item_from_row(&row);
        info!("Created item {}", item.id);
        Ok(item)
    }

    async fn update(&self, id: &str, name: &str, description: &str) -> CoreResult<Item> {
        let key = parse_id(id)?;

        // NOW() is the transaction start, so nudge forward if it has not moved
        let row = sqlx::query(
            r#"
            UPDATE items
            SET name = $2,
                description = $3,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(key)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(item_from_row).ok_or(CoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        let key = parse_id(id)?;

        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::database::{DatabaseConfig, init_pool, migrate};

    #[test]
    fn test_parse_id_accepts_only_canonical_keys() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(CoreError::NotFound)));
        assert!(matches!(parse_id("007"), Err(CoreError::NotFound)));
        assert!(matches!(parse_id("+7"), Err(CoreError::NotFound)));
        assert!(matches!(parse_id(""), Err(CoreError::NotFound)));
        assert!(matches!(
            parse_id("99999999999999999999"),
            Err(CoreError::NotFound)
        ));
    }

    async fn repository() -> PgItemRepository {
        let config = DatabaseConfig::from_env().expect("DATABASE_URL must be set");
        let pool = init_pool(&config).await.unwrap();
        migrate(&pool).await.unwrap();
        PgItemRepository::new(pool)
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_item_lifecycle() {
        let repo = repository().await;

        let created = repo.create("Widget", "A sample widget").await.unwrap();
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(repo.get(&created.id).await.unwrap(), created);

        let updated = repo.update(&created.id, "Gadget", "").await.unwrap();
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.first().map(|i| i.id.as_str()), Some(created.id.as_str()));

        repo.delete(&created.id).await.unwrap();
        assert!(matches!(
            repo.get(&created.id).await,
            Err(CoreError::NotFound)
        ));
        assert!(matches!(
            repo.delete(&created.id).await,
            Err(CoreError::NotFound)
        ));
        assert!(matches!(
            repo.update(&created.id, "x", "").await,
            Err(CoreError::NotFound)
        ));
    }
}
