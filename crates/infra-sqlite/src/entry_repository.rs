// SQLite EntryRepository Implementation

use crate::map_sqlx_error;
use crate::transaction::SqliteJoinTransaction;
use async_trait::async_trait;
use sqlx::SqlitePool;
use waitline_core::domain::{Entry, EntryId, EntryStatus, Page, Position, QueueId};
use waitline_core::error::{AppError, Result};
use waitline_core::port::{EntryRepository, JoinTransaction, TransactionalEntryRepository};

pub struct SqliteEntryRepository {
    pool: SqlitePool,
}

impl SqliteEntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Conditional transition: exactly one of two racing callers wins.
    /// rows_affected == 0 is disambiguated with a follow-up read into
    /// NotFound vs InvalidState.
    async fn transition(
        &self,
        id: &EntryId,
        from: &[EntryStatus],
        to: EntryStatus,
        timestamp_column: Option<(&str, i64)>,
    ) -> Result<Entry> {
        let from_list = from
            .iter()
            .map(|s| format!("'{}'", s))
            .collect::<Vec<_>>()
            .join(", ");

        let row: Option<EntryRow> = match timestamp_column {
            Some((column, now)) => {
                // `column` comes from a fixed call site, never user input
                let sql = format!(
                    "UPDATE queue_entries SET status = ?, {} = ? \
                     WHERE id = ? AND status IN ({}) RETURNING *",
                    column, from_list
                );
                sqlx::query_as(&sql)
                    .bind(to.to_string())
                    .bind(now)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    "UPDATE queue_entries SET status = ? \
                     WHERE id = ? AND status IN ({}) RETURNING *",
                    from_list
                );
                sqlx::query_as(&sql)
                    .bind(to.to_string())
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(row.into_entry()),
            None => {
                let current: Option<String> =
                    sqlx::query_scalar("SELECT status FROM queue_entries WHERE id = ?")
                        .bind(id)
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(map_sqlx_error)?;

                match current {
                    None => Err(AppError::NotFound(format!("Entry {} not found", id))),
                    Some(status) => Err(AppError::InvalidState(format!(
                        "Entry {} is already {}",
                        id,
                        status.to_lowercase()
                    ))),
                }
            }
        }
    }
}

#[async_trait]
impl EntryRepository for SqliteEntryRepository {
    async fn find_by_id(&self, id: &EntryId) -> Result<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>("SELECT * FROM queue_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_entry()))
    }

    async fn list(
        &self,
        queue_id: &QueueId,
        status: Option<EntryStatus>,
        page: Page,
    ) -> Result<Vec<Entry>> {
        let rows: Vec<EntryRow> = match status {
            Some(status) => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM queue_entries
                    WHERE queue_id = ? AND status = ?
                    ORDER BY position ASC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(queue_id)
                .bind(status.to_string())
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                // Active view: the customer-facing current line
                sqlx::query_as(
                    r#"
                    SELECT * FROM queue_entries
                    WHERE queue_id = ? AND status IN ('WAITING', 'CALLED')
                    ORDER BY position ASC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(queue_id)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_entry()).collect())
    }

    async fn count_active(&self, queue_id: &QueueId) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM queue_entries \
             WHERE queue_id = ? AND status IN ('WAITING', 'CALLED')",
        )
        .bind(queue_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count)
    }

    async fn count_active_ahead(&self, queue_id: &QueueId, position: Position) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM queue_entries \
             WHERE queue_id = ? AND position < ? AND status IN ('WAITING', 'CALLED')",
        )
        .bind(queue_id)
        .bind(position)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count)
    }

    async fn mark_called(&self, id: &EntryId, now_millis: i64) -> Result<Entry> {
        self.transition(
            id,
            &[EntryStatus::Waiting],
            EntryStatus::Called,
            Some(("called_at", now_millis)),
        )
        .await
    }

    async fn mark_served(&self, id: &EntryId, now_millis: i64) -> Result<Entry> {
        // WAITING -> SERVED is allowed: walk-up service
        self.transition(
            id,
            &[EntryStatus::Waiting, EntryStatus::Called],
            EntryStatus::Served,
            Some(("served_at", now_millis)),
        )
        .await
    }

    async fn mark_cancelled(&self, id: &EntryId) -> Result<Entry> {
        self.transition(
            id,
            &[EntryStatus::Waiting, EntryStatus::Called],
            EntryStatus::Cancelled,
            None,
        )
        .await
    }
}

#[async_trait]
impl TransactionalEntryRepository for SqliteEntryRepository {
    async fn begin_join(&self) -> Result<Box<dyn JoinTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteJoinTransaction::new(tx)))
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EntryRow {
    id: String,
    queue_id: String,
    customer_name: String,
    phone_number: String,
    party_size: i64,
    position: i64,
    status: String,
    joined_at: i64,
    called_at: Option<i64>,
    served_at: Option<i64>,
}

impl EntryRow {
    pub(crate) fn into_entry(self) -> Entry {
        let status = self.status.parse().unwrap_or(EntryStatus::Cancelled);

        Entry {
            id: self.id,
            queue_id: self.queue_id,
            customer_name: self.customer_name,
            phone_number: self.phone_number,
            party_size: self.party_size,
            position: self.position,
            status,
            joined_at: self.joined_at,
            called_at: self.called_at,
            served_at: self.served_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue_repository::tests_support::insert_test_queue;
    use crate::{create_pool, run_migrations};
    use waitline_core::port::Transaction;

    async fn setup() -> (SqlitePool, SqliteEntryRepository) {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = SqliteEntryRepository::new(pool.clone());
        (pool, repo)
    }

    async fn join(repo: &SqliteEntryRepository, queue_id: &str, name: &str) -> Entry {
        let mut tx = repo.begin_join().await.unwrap();
        let position = tx
            .allocate_position(&queue_id.to_string())
            .await
            .unwrap()
            .unwrap();
        let entry = Entry::new(
            format!("e-{}-{}", name, position),
            queue_id,
            name,
            "+12025550123",
            1,
            position,
            1000 + position,
        );
        tx.insert_entry(&entry).await.unwrap();
        tx.commit().await.unwrap();
        entry
    }

    #[tokio::test]
    async fn test_positions_are_monotonic_and_never_reused() {
        let (pool, repo) = setup().await;
        insert_test_queue(&pool, "q-1", "front-desk").await;

        let first = join(&repo, "q-1", "ann").await;
        let second = join(&repo, "q-1", "ben").await;
        assert_eq!(first.position, 1);
        assert_eq!(second.position, 2);

        // Cancellation must not free the position
        repo.mark_cancelled(&second.id).await.unwrap();
        let third = join(&repo, "q-1", "cam").await;
        assert_eq!(third.position, 3);
    }

    #[tokio::test]
    async fn test_allocate_position_on_missing_queue() {
        let (_pool, repo) = setup().await;
        let mut tx = repo.begin_join().await.unwrap();
        let position = tx.allocate_position(&"nope".to_string()).await.unwrap();
        assert!(position.is_none());
    }

    #[tokio::test]
    async fn test_mark_called_sets_timestamp_once() {
        let (pool, repo) = setup().await;
        insert_test_queue(&pool, "q-1", "front-desk").await;
        let entry = join(&repo, "q-1", "ann").await;

        let called = repo.mark_called(&entry.id, 5000).await.unwrap();
        assert_eq!(called.status, EntryStatus::Called);
        assert_eq!(called.called_at, Some(5000));

        // Second call loses the race deterministically
        let err = repo.mark_called(&entry.id, 6000).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_serve_from_waiting_and_terminal_guard() {
        let (pool, repo) = setup().await;
        insert_test_queue(&pool, "q-1", "front-desk").await;
        let entry = join(&repo, "q-1", "ann").await;

        let served = repo.mark_served(&entry.id, 5000).await.unwrap();
        assert_eq!(served.status, EntryStatus::Served);
        assert_eq!(served.served_at, Some(5000));

        assert!(matches!(
            repo.mark_served(&entry.id, 6000).await.unwrap_err(),
            AppError::InvalidState(_)
        ));
        assert!(matches!(
            repo.mark_cancelled(&entry.id).await.unwrap_err(),
            AppError::InvalidState(_)
        ));
    }

    #[tokio::test]
    async fn test_transition_on_unknown_entry_is_not_found() {
        let (_pool, repo) = setup().await;
        let err = repo.mark_called(&"missing".to_string(), 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_active_view_and_ahead_counts() {
        let (pool, repo) = setup().await;
        insert_test_queue(&pool, "q-1", "front-desk").await;

        let a = join(&repo, "q-1", "ann").await;
        let b = join(&repo, "q-1", "ben").await;
        let c = join(&repo, "q-1", "cam").await;

        repo.mark_cancelled(&a.id).await.unwrap();

        let active = repo
            .list(&"q-1".to_string(), None, Page::default())
            .await
            .unwrap();
        assert_eq!(active.len(), 2);
        // Positions unchanged after the cancellation ahead
        assert_eq!(active[0].position, b.position);
        assert_eq!(active[1].position, c.position);

        assert_eq!(repo.count_active(&"q-1".to_string()).await.unwrap(), 2);
        assert_eq!(
            repo.count_active_ahead(&"q-1".to_string(), c.position)
                .await
                .unwrap(),
            1
        );
    }
}
