// Entry Repository Port (Interface)

use crate::domain::{Entry, EntryId, EntryStatus, Page, Position, QueueId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for QueueEntry persistence
///
/// Inserts go through `JoinTransaction` (position assignment must be
/// atomic); the status transitions here are single-row compare-and-swap
/// updates so two racing callers resolve to exactly one winner.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Find entry by ID
    async fn find_by_id(&self, id: &EntryId) -> Result<Option<Entry>>;

    /// List entries of a queue ordered by ascending position.
    /// `status: None` means the active view (WAITING + CALLED).
    async fn list(
        &self,
        queue_id: &QueueId,
        status: Option<EntryStatus>,
        page: Page,
    ) -> Result<Vec<Entry>>;

    /// Count of entries in the active view
    async fn count_active(&self, queue_id: &QueueId) -> Result<i64>;

    /// Count of active entries strictly ahead of the given position
    async fn count_active_ahead(&self, queue_id: &QueueId, position: Position) -> Result<i64>;

    /// WAITING -> CALLED, setting `called_at`.
    /// Fails NotFound for unknown ids, InvalidState otherwise.
    async fn mark_called(&self, id: &EntryId, now_millis: i64) -> Result<Entry>;

    /// WAITING/CALLED -> SERVED, setting `served_at`
    async fn mark_served(&self, id: &EntryId, now_millis: i64) -> Result<Entry>;

    /// WAITING/CALLED -> CANCELLED
    async fn mark_cancelled(&self, id: &EntryId) -> Result<Entry>;
}
