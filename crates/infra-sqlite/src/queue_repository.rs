// SQLite QueueRepository Implementation

use crate::map_sqlx_error;
use crate::transaction::SqliteQueueTransaction;
use async_trait::async_trait;
use sqlx::SqlitePool;
use waitline_core::domain::{Page, Queue, QueueId, QueueStatus};
use waitline_core::error::Result;
use waitline_core::port::{QueueRepository, QueueTransaction, TransactionalQueueRepository};

pub struct SqliteQueueRepository {
    pool: SqlitePool,
}

impl SqliteQueueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueRepository for SqliteQueueRepository {
    async fn find_by_id(&self, id: &QueueId) -> Result<Option<Queue>> {
        let row = sqlx::query_as::<_, QueueRow>("SELECT * FROM queues WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_queue()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Queue>> {
        let row = sqlx::query_as::<_, QueueRow>("SELECT * FROM queues WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_queue()))
    }

    async fn list(&self, status: Option<QueueStatus>, page: Page) -> Result<Vec<Queue>> {
        // Stable creation order; id breaks created_at ties
        let rows: Vec<QueueRow> = match status {
            Some(status) => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM queues
                    WHERE status = ?
                    ORDER BY created_at ASC, id ASC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(status.to_string())
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM queues
                    ORDER BY created_at ASC, id ASC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_queue()).collect())
    }

    async fn update(&self, queue: &Queue) -> Result<()> {
        // last_position is owned by the join transaction and deliberately
        // excluded here
        sqlx::query(
            r#"
            UPDATE queues
            SET name = ?, business_name = ?, description = ?, address = ?,
                status = ?, estimated_service_minutes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&queue.name)
        .bind(&queue.business_name)
        .bind(&queue.description)
        .bind(&queue.address)
        .bind(queue.status.to_string())
        .bind(queue.estimated_service_minutes)
        .bind(queue.updated_at)
        .bind(&queue.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&self, id: &QueueId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM queues WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TransactionalQueueRepository for SqliteQueueRepository {
    async fn begin_create(&self) -> Result<Box<dyn QueueTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteQueueTransaction::new(tx)))
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct QueueRow {
    id: String,
    name: String,
    business_name: String,
    description: Option<String>,
    address: Option<String>,
    status: String,
    estimated_service_minutes: i64,
    last_position: i64,
    created_at: i64,
    updated_at: Option<i64>,
}

impl QueueRow {
    pub(crate) fn into_queue(self) -> Queue {
        let status = self.status.parse().unwrap_or(QueueStatus::Closed);

        Queue {
            id: self.id,
            name: self.name,
            business_name: self.business_name,
            description: self.description,
            address: self.address,
            status,
            estimated_service_minutes: self.estimated_service_minutes,
            last_position: self.last_position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use sqlx::SqlitePool;

    /// Seed an ACTIVE queue row directly, bypassing the registry
    pub(crate) async fn insert_test_queue(pool: &SqlitePool, id: &str, name: &str) {
        sqlx::query(
            "INSERT INTO queues (id, name, business_name, status, \
             estimated_service_minutes, last_position, created_at) \
             VALUES (?, ?, 'Test Business', 'ACTIVE', 5, 0, 1000)",
        )
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
    }
}
