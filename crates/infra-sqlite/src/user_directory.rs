// SQLite UserDirectory Implementation
//
// The `users` table mirrors the external identity provider. The core only
// asks whether a user exists; `upsert` is the sync hook that keeps the
// mirror current (and the seed path for tests).

use crate::map_sqlx_error;
use async_trait::async_trait;
use sqlx::SqlitePool;
use waitline_core::domain::UserId;
use waitline_core::error::Result;
use waitline_core::port::UserDirectory;

pub struct SqliteUserDirectory {
    pool: SqlitePool,
}

impl SqliteUserDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record (or refresh) a user known to the identity provider
    pub async fn upsert(&self, user_id: &UserId, display_name: Option<&str>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, display_name) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET display_name = excluded.display_name
            "#,
        )
        .bind(user_id)
        .bind(display_name)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn exists(&self, user_id: &UserId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    #[tokio::test]
    async fn test_exists_after_upsert() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let directory = SqliteUserDirectory::new(pool);

        let user = "user-1".to_string();
        assert!(!directory.exists(&user).await.unwrap());

        directory.upsert(&user, Some("Dana")).await.unwrap();
        assert!(directory.exists(&user).await.unwrap());

        // Upsert twice is fine
        directory.upsert(&user, Some("Dana R.")).await.unwrap();
        assert!(directory.exists(&user).await.unwrap());
    }
}
