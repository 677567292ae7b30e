// Domain Layer - Entities and Invariants

pub mod entry;
pub mod error;
pub mod queue;

pub use entry::{Entry, EntryId, EntryStatus, Position};
pub use error::DomainError;
pub use queue::{Queue, QueueId, QueueStatus, UserId};

/// Offset/limit pagination window shared by list operations
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 100,
        }
    }
}
