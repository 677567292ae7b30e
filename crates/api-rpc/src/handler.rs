//! RPC Method Handlers
//!
//! Thin adapters from RPC params to the registry and ledger services.

use crate::error::{throttled, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::*;
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use waitline_core::application::{
    CreateQueueRequest, EntryView, JoinRequest, LedgerService, QueueView, RegistryService,
    UpdateQueueRequest,
};
use waitline_core::domain::Page;

/// RPC Handler with injected services
pub struct RpcHandler {
    registry: Arc<RegistryService>,
    ledger: Arc<LedgerService>,
    rate_limiter: Arc<RateLimiter>,
}

impl RpcHandler {
    pub fn new(
        registry: Arc<RegistryService>,
        ledger: Arc<LedgerService>,
        rate_limit_burst: u32,
        rate_limit_per_sec: u32,
    ) -> Self {
        Self {
            registry,
            ledger,
            rate_limiter: Arc::new(RateLimiter::new(rate_limit_burst, rate_limit_per_sec)),
        }
    }

    async fn throttle(&self) -> Result<(), ErrorObjectOwned> {
        if self.rate_limiter.check().await {
            Ok(())
        } else {
            Err(throttled())
        }
    }

    /// queue.create.v1
    pub async fn create_queue(
        &self,
        params: CreateQueueParams,
    ) -> Result<QueueView, ErrorObjectOwned> {
        self.throttle().await?;

        let req = CreateQueueRequest {
            name: params.name,
            business_name: params.business_name,
            description: params.description,
            address: params.address,
            estimated_service_minutes: params.estimated_service_minutes.unwrap_or(5),
        };

        self.registry
            .create(req, &params.actor)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.get.v1
    pub async fn get_queue(&self, params: GetQueueParams) -> Result<QueueView, ErrorObjectOwned> {
        self.registry
            .get(&params.queue_id)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.list.v1
    pub async fn list_queues(
        &self,
        params: ListQueuesParams,
    ) -> Result<Vec<QueueView>, ErrorObjectOwned> {
        let page = Page {
            offset: params.offset,
            limit: params.limit,
        };
        self.registry
            .list(params.status, page)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.update.v1
    pub async fn update_queue(
        &self,
        params: UpdateQueueParams,
    ) -> Result<QueueView, ErrorObjectOwned> {
        self.throttle().await?;

        let req = UpdateQueueRequest {
            name: params.name,
            business_name: params.business_name,
            description: params.description,
            address: params.address,
            status: params.status,
            estimated_service_minutes: params.estimated_service_minutes,
        };

        self.registry
            .update(&params.queue_id, req, &params.actor)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.delete.v1
    pub async fn delete_queue(
        &self,
        params: DeleteQueueParams,
    ) -> Result<DeleteQueueResponse, ErrorObjectOwned> {
        self.throttle().await?;

        self.registry
            .delete(&params.queue_id, &params.actor)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeleteQueueResponse {
            queue_id: params.queue_id,
            deleted: true,
        })
    }

    /// queue.addAdmin.v1
    pub async fn add_admin(
        &self,
        params: AddAdminParams,
    ) -> Result<AddAdminResponse, ErrorObjectOwned> {
        self.throttle().await?;

        self.registry
            .add_admin(&params.queue_id, &params.user_id, &params.actor)
            .await
            .map_err(to_rpc_error)?;

        Ok(AddAdminResponse {
            queue_id: params.queue_id,
            user_id: params.user_id,
            added: true,
        })
    }

    /// entry.join.v1
    pub async fn join(&self, params: JoinParams) -> Result<EntryView, ErrorObjectOwned> {
        self.throttle().await?;

        let req = JoinRequest {
            queue_id: params.queue_id,
            customer_name: params.customer_name,
            phone_number: params.phone_number,
            party_size: params.party_size,
        };

        self.ledger.join(req).await.map_err(to_rpc_error)
    }

    /// entry.get.v1
    pub async fn get_entry(&self, params: GetEntryParams) -> Result<EntryView, ErrorObjectOwned> {
        self.ledger
            .get(&params.entry_id)
            .await
            .map_err(to_rpc_error)
    }

    /// entry.list.v1
    pub async fn list_entries(
        &self,
        params: ListEntriesParams,
    ) -> Result<Vec<EntryView>, ErrorObjectOwned> {
        let page = Page {
            offset: params.offset,
            limit: params.limit,
        };
        self.ledger
            .list(&params.queue_id, params.status, page)
            .await
            .map_err(to_rpc_error)
    }

    /// entry.call.v1
    pub async fn call_entry(
        &self,
        params: EntryActionParams,
    ) -> Result<EntryView, ErrorObjectOwned> {
        self.throttle().await?;

        self.ledger
            .call(&params.entry_id, &params.actor)
            .await
            .map_err(to_rpc_error)
    }

    /// entry.serve.v1
    pub async fn serve_entry(
        &self,
        params: EntryActionParams,
    ) -> Result<EntryView, ErrorObjectOwned> {
        self.throttle().await?;

        self.ledger
            .serve(&params.entry_id, &params.actor)
            .await
            .map_err(to_rpc_error)
    }

    /// entry.cancel.v1
    pub async fn cancel_entry(
        &self,
        params: CancelEntryParams,
    ) -> Result<EntryView, ErrorObjectOwned> {
        self.throttle().await?;

        self.ledger
            .cancel(&params.entry_id)
            .await
            .map_err(to_rpc_error)
    }
}
