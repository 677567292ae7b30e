// Admin Membership Port (Interface)

use crate::domain::{QueueId, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Unordered user <-> queue membership relation.
/// A member may operate call/serve/update/delete on the queue's ledger.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn is_admin(&self, queue_id: &QueueId, user_id: &UserId) -> Result<bool>;

    /// Sorted list of member ids (read-side projection, never cached)
    async fn list_admins(&self, queue_id: &QueueId) -> Result<Vec<UserId>>;

    /// Insert a membership. Fails Conflict when it already exists.
    async fn insert(&self, queue_id: &QueueId, user_id: &UserId) -> Result<()>;
}
