// Entry Ledger - the position-sequence and status-transition engine
//
// Position assignment runs in a single store transaction per join: the
// queue's counter is bumped with one atomic statement and the entry is
// inserted with the returned value. Equivalent to serializable isolation
// per queue; queues never contend with each other.

use crate::application::{estimator, notify::Notifier};
use crate::domain::{Entry, EntryId, EntryStatus, Page, Position, Queue, QueueId, UserId};
use crate::error::{AppError, Result};
use crate::port::{
    AdminRepository, EntryRepository, IdProvider, QueueRepository, TimeProvider,
    TransactionalEntryRepository,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Transient store contention (SQLITE_BUSY and friends) gets this many
/// attempts before surfacing.
const JOIN_MAX_ATTEMPTS: u32 = 3;
const JOIN_RETRY_BACKOFF: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Deserialize)]
pub struct JoinRequest {
    pub queue_id: QueueId,
    pub customer_name: String,
    pub phone_number: String,
    #[serde(default = "default_party_size")]
    pub party_size: i64,
}

fn default_party_size() -> i64 {
    1
}

/// Entry plus its derived wait estimate
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub id: EntryId,
    pub queue_id: QueueId,
    pub customer_name: String,
    pub phone_number: String,
    pub party_size: i64,
    pub position: Position,
    pub status: EntryStatus,
    pub joined_at: i64,
    pub called_at: Option<i64>,
    pub served_at: Option<i64>,
    pub estimated_wait_minutes: i64,
}

impl EntryView {
    fn project(entry: Entry, estimated_wait_minutes: i64) -> Self {
        Self {
            id: entry.id,
            queue_id: entry.queue_id,
            customer_name: entry.customer_name,
            phone_number: entry.phone_number,
            party_size: entry.party_size,
            position: entry.position,
            status: entry.status,
            joined_at: entry.joined_at,
            called_at: entry.called_at,
            served_at: entry.served_at,
            estimated_wait_minutes,
        }
    }
}

pub struct LedgerService {
    tx_entries: Arc<dyn TransactionalEntryRepository>,
    entries: Arc<dyn EntryRepository>,
    queues: Arc<dyn QueueRepository>,
    admins: Arc<dyn AdminRepository>,
    notifier: Arc<Notifier>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl LedgerService {
    pub fn new(
        tx_entries: Arc<dyn TransactionalEntryRepository>,
        entries: Arc<dyn EntryRepository>,
        queues: Arc<dyn QueueRepository>,
        admins: Arc<dyn AdminRepository>,
        notifier: Arc<Notifier>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            tx_entries,
            entries,
            queues,
            admins,
            notifier,
            id_provider,
            time_provider,
        }
    }

    /// Join a queue as a customer. No authorization required.
    pub async fn join(&self, req: JoinRequest) -> Result<EntryView> {
        if req.customer_name.trim().is_empty() {
            return Err(AppError::Validation(
                "customer_name must not be empty".into(),
            ));
        }
        if req.party_size < 1 {
            return Err(AppError::Validation("party_size must be >= 1".into()));
        }

        let mut attempt = 0;
        let (entry, queue) = loop {
            attempt += 1;
            match self.try_join(&req).await {
                Ok(ok) => break ok,
                Err(AppError::Busy(msg)) if attempt < JOIN_MAX_ATTEMPTS => {
                    warn!(queue_id = %req.queue_id, attempt, error = %msg, "Join retrying after store contention");
                    tokio::time::sleep(JOIN_RETRY_BACKOFF * attempt).await;
                }
                Err(e) => return Err(e),
            }
        };

        // Derived estimate: active entries strictly ahead by position
        let ahead = self
            .entries
            .count_active_ahead(&queue.id, entry.position)
            .await?;
        let wait_minutes = estimator::wait_for_ahead(ahead, queue.estimated_service_minutes);

        info!(
            entry_id = %entry.id,
            queue_id = %queue.id,
            position = entry.position,
            wait_minutes,
            "Customer joined queue"
        );

        // Committed state first, notification second; sink failures are
        // recorded in the receipt and logged, never surfaced.
        self.notifier
            .entry_joined(
                &entry.phone_number,
                &queue.business_name,
                entry.position,
                wait_minutes,
            )
            .await;

        Ok(EntryView::project(entry, wait_minutes))
    }

    /// One transactional join attempt. Dropping the transaction on any
    /// error path rolls the counter bump back.
    async fn try_join(&self, req: &JoinRequest) -> Result<(Entry, Queue)> {
        let mut tx = self.tx_entries.begin_join().await?;

        let position = tx
            .allocate_position(&req.queue_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Queue {} not found", req.queue_id)))?;

        let queue = tx
            .queue_by_id(&req.queue_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Queue {} not found", req.queue_id)))?;

        if !queue.accepts_entries() {
            return Err(AppError::InvalidState(format!(
                "Queue {} is {} and not accepting new entries",
                queue.id, queue.status
            )));
        }

        let entry = Entry::new(
            self.id_provider.generate_id(),
            queue.id.clone(),
            req.customer_name.trim(),
            req.phone_number.clone(),
            req.party_size,
            position,
            self.time_provider.now_millis(),
        );

        tx.insert_entry(&entry).await?;
        tx.commit().await?;

        Ok((entry, queue))
    }

    /// Call a customer to the front. Admins only.
    pub async fn call(&self, entry_id: &EntryId, actor: &UserId) -> Result<EntryView> {
        let entry = self.require_entry(entry_id).await?;
        let queue = self.owning_queue(&entry).await?;
        self.require_admin(&queue.id, actor).await?;

        let now = self.time_provider.now_millis();
        let called = self.entries.mark_called(entry_id, now).await?;

        info!(entry_id = %entry_id, queue_id = %queue.id, actor = %actor, "Entry called");

        self.notifier
            .entry_called(&called.phone_number, &queue.business_name)
            .await;

        Ok(EntryView::project(called, 0))
    }

    /// Mark a customer as served. Admins only. Serving is permitted
    /// straight from WAITING (walk-up service).
    pub async fn serve(&self, entry_id: &EntryId, actor: &UserId) -> Result<EntryView> {
        let entry = self.require_entry(entry_id).await?;
        let queue = self.owning_queue(&entry).await?;
        self.require_admin(&queue.id, actor).await?;

        let now = self.time_provider.now_millis();
        let served = self.entries.mark_served(entry_id, now).await?;

        info!(entry_id = %entry_id, queue_id = %queue.id, actor = %actor, "Entry served");
        Ok(EntryView::project(served, 0))
    }

    /// Cancel an entry. No authorization: holding the entry id is the
    /// capability. Later entries keep their positions.
    pub async fn cancel(&self, entry_id: &EntryId) -> Result<EntryView> {
        self.require_entry(entry_id).await?;
        let cancelled = self.entries.mark_cancelled(entry_id).await?;

        info!(entry_id = %entry_id, queue_id = %cancelled.queue_id, "Entry cancelled");
        Ok(EntryView::project(cancelled, 0))
    }

    /// List a queue's entries ordered by position. Default filter is the
    /// active view; the i-th active entry waits i * service_minutes.
    pub async fn list(
        &self,
        queue_id: &QueueId,
        status: Option<EntryStatus>,
        page: Page,
    ) -> Result<Vec<EntryView>> {
        let queue = self
            .queues
            .find_by_id(queue_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Queue {} not found", queue_id)))?;

        let entries = self.entries.list(queue_id, status, page).await?;

        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(rank, entry)| {
                let wait = if entry.status.is_active() {
                    estimator::wait_for_rank(rank, queue.estimated_service_minutes)
                } else {
                    0
                };
                EntryView::project(entry, wait)
            })
            .collect())
    }

    /// Get a single entry. Only WAITING entries carry a non-zero
    /// estimate; a CALLED entry is already being summoned.
    pub async fn get(&self, entry_id: &EntryId) -> Result<EntryView> {
        let entry = self.require_entry(entry_id).await?;

        let wait = if entry.status == EntryStatus::Waiting {
            let queue = self.owning_queue(&entry).await?;
            let ahead = self
                .entries
                .count_active_ahead(&entry.queue_id, entry.position)
                .await?;
            estimator::wait_for_ahead(ahead, queue.estimated_service_minutes)
        } else {
            0
        };

        Ok(EntryView::project(entry, wait))
    }

    async fn require_entry(&self, id: &EntryId) -> Result<Entry> {
        self.entries
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Entry {} not found", id)))
    }

    async fn owning_queue(&self, entry: &Entry) -> Result<Queue> {
        self.queues
            .find_by_id(&entry.queue_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Queue {} missing for entry {}",
                    entry.queue_id, entry.id
                ))
            })
    }

    async fn require_admin(&self, queue_id: &QueueId, actor: &UserId) -> Result<()> {
        if self.admins.is_admin(queue_id, actor).await? {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "User {} is not an admin of queue {}",
                actor, queue_id
            )))
        }
    }
}
