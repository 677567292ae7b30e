// SQLite AdminRepository Implementation

use crate::map_sqlx_error;
use async_trait::async_trait;
use sqlx::SqlitePool;
use waitline_core::domain::{QueueId, UserId};
use waitline_core::error::Result;
use waitline_core::port::AdminRepository;

pub struct SqliteAdminRepository {
    pool: SqlitePool,
}

impl SqliteAdminRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for SqliteAdminRepository {
    async fn is_admin(&self, queue_id: &QueueId, user_id: &UserId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM queue_admins WHERE queue_id = ? AND user_id = ?",
        )
        .bind(queue_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count > 0)
    }

    async fn list_admins(&self, queue_id: &QueueId) -> Result<Vec<UserId>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT user_id FROM queue_admins WHERE queue_id = ? ORDER BY user_id ASC",
        )
        .bind(queue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(ids)
    }

    async fn insert(&self, queue_id: &QueueId, user_id: &UserId) -> Result<()> {
        // Duplicate memberships surface as Conflict via the primary key
        sqlx::query("INSERT INTO queue_admins (user_id, queue_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(queue_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
