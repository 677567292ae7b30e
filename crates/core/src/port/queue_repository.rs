// Queue Repository Port (Interface)

use crate::domain::{Page, Queue, QueueId, QueueStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Queue persistence
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Find queue by ID
    async fn find_by_id(&self, id: &QueueId) -> Result<Option<Queue>>;

    /// Find queue by its globally unique name
    async fn find_by_name(&self, name: &str) -> Result<Option<Queue>>;

    /// List queues filtered by status, in creation order
    async fn list(&self, status: Option<QueueStatus>, page: Page) -> Result<Vec<Queue>>;

    /// Persist updated queue fields (everything except `last_position`)
    async fn update(&self, queue: &Queue) -> Result<()>;

    /// Delete queue; cascades to entries and admin memberships.
    /// Returns false when the queue did not exist.
    async fn delete(&self, id: &QueueId) -> Result<bool>;
}
