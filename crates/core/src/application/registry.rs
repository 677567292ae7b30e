// Queue Registry - queue lifecycle and admin membership use cases

use crate::domain::{Page, Queue, QueueId, QueueStatus, UserId};
use crate::error::{AppError, Result};
use crate::port::{
    AdminRepository, EntryRepository, IdProvider, QueueRepository, TimeProvider,
    TransactionalQueueRepository, UserDirectory,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQueueRequest {
    pub name: String,
    pub business_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_service_minutes")]
    pub estimated_service_minutes: i64,
}

fn default_service_minutes() -> i64 {
    5
}

/// Partial update: absent fields are untouched, not reset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQueueRequest {
    pub name: Option<String>,
    pub business_name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub status: Option<QueueStatus>,
    pub estimated_service_minutes: Option<i64>,
}

/// Queue plus its read-side projections. `current_size` and `admin_ids`
/// are recomputed on every read, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct QueueView {
    pub id: QueueId,
    pub name: String,
    pub business_name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub status: QueueStatus,
    pub estimated_service_minutes: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub current_size: i64,
    pub admin_ids: Vec<UserId>,
}

impl QueueView {
    fn project(queue: Queue, current_size: i64, admin_ids: Vec<UserId>) -> Self {
        Self {
            id: queue.id,
            name: queue.name,
            business_name: queue.business_name,
            description: queue.description,
            address: queue.address,
            status: queue.status,
            estimated_service_minutes: queue.estimated_service_minutes,
            created_at: queue.created_at,
            updated_at: queue.updated_at,
            current_size,
            admin_ids,
        }
    }
}

pub struct RegistryService {
    tx_queues: Arc<dyn TransactionalQueueRepository>,
    queues: Arc<dyn QueueRepository>,
    entries: Arc<dyn EntryRepository>,
    admins: Arc<dyn AdminRepository>,
    users: Arc<dyn UserDirectory>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl RegistryService {
    pub fn new(
        tx_queues: Arc<dyn TransactionalQueueRepository>,
        queues: Arc<dyn QueueRepository>,
        entries: Arc<dyn EntryRepository>,
        admins: Arc<dyn AdminRepository>,
        users: Arc<dyn UserDirectory>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            tx_queues,
            queues,
            entries,
            admins,
            users,
            id_provider,
            time_provider,
        }
    }

    /// Create a queue; the creator becomes its first admin atomically.
    pub async fn create(&self, req: CreateQueueRequest, actor: &UserId) -> Result<QueueView> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Queue name must not be empty".into()));
        }
        if req.estimated_service_minutes < 0 {
            return Err(AppError::Validation(
                "estimated_service_minutes must be >= 0".into(),
            ));
        }

        // Pre-check for a friendly error; the unique constraint on `name`
        // still guards the race.
        if self.queues.find_by_name(name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Queue with name '{}' already exists",
                name
            )));
        }

        let mut queue = Queue::new(
            self.id_provider.generate_id(),
            self.time_provider.now_millis(),
            name,
            req.business_name,
            req.estimated_service_minutes,
        );
        queue.description = req.description;
        queue.address = req.address;

        let mut tx = self.tx_queues.begin_create().await?;
        tx.insert_queue(&queue).await?;
        tx.insert_admin(&queue.id, actor).await?;
        tx.commit().await?;

        info!(queue_id = %queue.id, name = %queue.name, admin = %actor, "Queue created");

        Ok(QueueView::project(queue, 0, vec![actor.clone()]))
    }

    pub async fn get(&self, id: &QueueId) -> Result<QueueView> {
        let queue = self.require_queue(id).await?;
        self.view(queue).await
    }

    /// List queues; defaults to ACTIVE when no filter is supplied.
    pub async fn list(&self, status: Option<QueueStatus>, page: Page) -> Result<Vec<QueueView>> {
        let filter = status.or(Some(QueueStatus::Active));
        let queues = self.queues.list(filter, page).await?;

        let mut views = Vec::with_capacity(queues.len());
        for queue in queues {
            views.push(self.view(queue).await?);
        }
        Ok(views)
    }

    pub async fn update(
        &self,
        id: &QueueId,
        req: UpdateQueueRequest,
        actor: &UserId,
    ) -> Result<QueueView> {
        let mut queue = self.require_queue(id).await?;
        self.require_admin(id, actor).await?;

        if let Some(name) = req.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation("Queue name must not be empty".into()));
            }
            if name != queue.name {
                if let Some(existing) = self.queues.find_by_name(&name).await? {
                    if existing.id != queue.id {
                        return Err(AppError::Conflict(format!(
                            "Queue with name '{}' already exists",
                            name
                        )));
                    }
                }
                queue.name = name;
            }
        }
        if let Some(business_name) = req.business_name {
            queue.business_name = business_name;
        }
        if let Some(description) = req.description {
            queue.description = Some(description);
        }
        if let Some(address) = req.address {
            queue.address = Some(address);
        }
        if let Some(status) = req.status {
            queue.status = status;
        }
        if let Some(minutes) = req.estimated_service_minutes {
            if minutes < 0 {
                return Err(AppError::Validation(
                    "estimated_service_minutes must be >= 0".into(),
                ));
            }
            queue.estimated_service_minutes = minutes;
        }
        queue.updated_at = Some(self.time_provider.now_millis());

        self.queues.update(&queue).await?;

        info!(queue_id = %queue.id, actor = %actor, "Queue updated");
        self.view(queue).await
    }

    /// Delete a queue; cascades to entries and admin memberships.
    pub async fn delete(&self, id: &QueueId, actor: &UserId) -> Result<()> {
        self.require_queue(id).await?;
        self.require_admin(id, actor).await?;

        if !self.queues.delete(id).await? {
            return Err(AppError::NotFound(format!("Queue {} not found", id)));
        }
        info!(queue_id = %id, actor = %actor, "Queue deleted");
        Ok(())
    }

    pub async fn add_admin(
        &self,
        queue_id: &QueueId,
        target_user_id: &UserId,
        actor: &UserId,
    ) -> Result<()> {
        self.require_queue(queue_id).await?;
        self.require_admin(queue_id, actor).await?;

        if !self.users.exists(target_user_id).await? {
            return Err(AppError::NotFound(format!(
                "User {} not found",
                target_user_id
            )));
        }
        if self.admins.is_admin(queue_id, target_user_id).await? {
            return Err(AppError::Conflict(format!(
                "User {} is already an admin of queue {}",
                target_user_id, queue_id
            )));
        }

        self.admins.insert(queue_id, target_user_id).await?;
        info!(queue_id = %queue_id, user = %target_user_id, actor = %actor, "Admin added");
        Ok(())
    }

    async fn require_queue(&self, id: &QueueId) -> Result<Queue> {
        self.queues
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Queue {} not found", id)))
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

    async fn view(&self, queue: Queue) -> Result<QueueView> {
        let current_size = self.entries.count_active(&queue.id).await?;
        let admin_ids = self.admins.list_admins(&queue.id).await?;
        Ok(QueueView::project(queue, current_size, admin_ids))
    }
}
