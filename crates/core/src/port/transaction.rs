// Transaction ports for atomic multi-step operations

use crate::domain::{Entry, Position, Queue, QueueId, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations.
/// Dropping an uncommitted transaction rolls it back.
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Entry repository operations that must share one transaction:
/// position allocation and entry insertion (serializable per queue)
#[async_trait]
pub trait TransactionalEntryRepository: Send + Sync {
    async fn begin_join(&self) -> Result<Box<dyn JoinTransaction>>;
}

/// The join transaction: allocate, validate, insert, commit
#[async_trait]
pub trait JoinTransaction: Transaction {
    /// Bump the queue's position counter and return the new value.
    /// Returns None when the queue does not exist. Acquires the write
    /// lock up front so the transaction never needs a lock upgrade.
    async fn allocate_position(&mut self, queue_id: &QueueId) -> Result<Option<Position>>;

    /// Read the queue inside the transaction (status check)
    async fn queue_by_id(&mut self, queue_id: &QueueId) -> Result<Option<Queue>>;

    /// Insert the WAITING entry (within transaction)
    async fn insert_entry(&mut self, entry: &Entry) -> Result<()>;
}

/// Queue creation must establish the creator membership atomically
#[async_trait]
pub trait TransactionalQueueRepository: Send + Sync {
    async fn begin_create(&self) -> Result<Box<dyn QueueTransaction>>;
}

#[async_trait]
pub trait QueueTransaction: Transaction {
    async fn insert_queue(&mut self, queue: &Queue) -> Result<()>;

    async fn insert_admin(&mut self, queue_id: &QueueId, user_id: &UserId) -> Result<()>;
}
