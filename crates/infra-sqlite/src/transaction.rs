// SQLite Transaction Implementations

use crate::map_sqlx_error;
use crate::queue_repository::QueueRow;
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use waitline_core::domain::{Entry, Position, Queue, QueueId, UserId};
use waitline_core::error::Result;
use waitline_core::port::{JoinTransaction, QueueTransaction, Transaction};

/// Transaction backing a single join: counter bump + entry insert
pub struct SqliteJoinTransaction {
    tx: SqlxTransaction<'static, Sqlite>,
}

impl SqliteJoinTransaction {
    pub fn new(tx: SqlxTransaction<'static, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteJoinTransaction {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl JoinTransaction for SqliteJoinTransaction {
    async fn allocate_position(&mut self, queue_id: &QueueId) -> Result<Option<Position>> {
        // Single atomic statement; also takes the write lock first so the
        // transaction never upgrades from a read lock mid-flight
        let position: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE queues
            SET last_position = last_position + 1
            WHERE id = ?
            RETURNING last_position
            "#,
        )
        .bind(queue_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(position)
    }

    async fn queue_by_id(&mut self, queue_id: &QueueId) -> Result<Option<Queue>> {
        let row = sqlx::query_as::<_, QueueRow>("SELECT * FROM queues WHERE id = ?")
            .bind(queue_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_queue()))
    }

    async fn insert_entry(&mut self, entry: &Entry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO queue_entries (
                id, queue_id, customer_name, phone_number, party_size,
                position, status, joined_at, called_at, served_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.queue_id)
        .bind(&entry.customer_name)
        .bind(&entry.phone_number)
        .bind(entry.party_size)
        .bind(entry.position)
        .bind(entry.status.to_string())
        .bind(entry.joined_at)
        .bind(entry.called_at)
        .bind(entry.served_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

/// Transaction backing queue creation: queue row + first admin membership
pub struct SqliteQueueTransaction {
    tx: SqlxTransaction<'static, Sqlite>,
}

impl SqliteQueueTransaction {
    pub fn new(tx: SqlxTransaction<'static, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteQueueTransaction {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl QueueTransaction for SqliteQueueTransaction {
    async fn insert_queue(&mut self, queue: &Queue) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO queues (
                id, name, business_name, description, address,
                status, estimated_service_minutes, last_position,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&queue.id)
        .bind(&queue.name)
        .bind(&queue.business_name)
        .bind(&queue.description)
        .bind(&queue.address)
        .bind(queue.status.to_string())
        .bind(queue.estimated_service_minutes)
        .bind(queue.last_position)
        .bind(queue.created_at)
        .bind(queue.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert_admin(&mut self, queue_id: &QueueId, user_id: &UserId) -> Result<()> {
        sqlx::query("INSERT INTO queue_admins (user_id, queue_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(queue_id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
