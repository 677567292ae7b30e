//! RPC Request/Response Types
//!
//! Responses embed the core application views (`QueueView`, `EntryView`),
//! which already carry the derived fields.

use serde::{Deserialize, Serialize};
use waitline_core::domain::{EntryStatus, QueueStatus};

fn default_limit() -> i64 {
    100
}

/// queue.create.v1
#[derive(Debug, Deserialize)]
pub struct CreateQueueParams {
    pub actor: String,
    pub name: String,
    pub business_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub estimated_service_minutes: Option<i64>,
}

/// queue.get.v1
#[derive(Debug, Deserialize)]
pub struct GetQueueParams {
    pub queue_id: String,
}

/// queue.list.v1
#[derive(Debug, Deserialize)]
pub struct ListQueuesParams {
    #[serde(default)]
    pub status: Option<QueueStatus>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// queue.update.v1
#[derive(Debug, Deserialize)]
pub struct UpdateQueueParams {
    pub actor: String,
    pub queue_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<QueueStatus>,
    #[serde(default)]
    pub estimated_service_minutes: Option<i64>,
}

/// queue.delete.v1
#[derive(Debug, Deserialize)]
pub struct DeleteQueueParams {
    pub actor: String,
    pub queue_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteQueueResponse {
    pub queue_id: String,
    pub deleted: bool,
}

/// queue.addAdmin.v1
#[derive(Debug, Deserialize)]
pub struct AddAdminParams {
    pub actor: String,
    pub queue_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddAdminResponse {
    pub queue_id: String,
    pub user_id: String,
    pub added: bool,
}

/// entry.join.v1
#[derive(Debug, Deserialize)]
pub struct JoinParams {
    pub queue_id: String,
    pub customer_name: String,
    pub phone_number: String,
    #[serde(default = "default_party_size")]
    pub party_size: i64,
}

fn default_party_size() -> i64 {
    1
}

/// entry.get.v1
#[derive(Debug, Deserialize)]
pub struct GetEntryParams {
    pub entry_id: String,
}

/// entry.list.v1
#[derive(Debug, Deserialize)]
pub struct ListEntriesParams {
    pub queue_id: String,
    #[serde(default)]
    pub status: Option<EntryStatus>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// entry.call.v1 / entry.serve.v1
#[derive(Debug, Deserialize)]
pub struct EntryActionParams {
    pub actor: String,
    pub entry_id: String,
}

/// entry.cancel.v1 - no actor: the entry id is the capability
#[derive(Debug, Deserialize)]
pub struct CancelEntryParams {
    pub entry_id: String,
}
