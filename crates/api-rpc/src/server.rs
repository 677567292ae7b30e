//! JSON-RPC Server
//!
//! TCP on localhost only; the public HTTP surface (if any) lives behind
//! a separate gateway and is out of scope here.

use crate::handler::RpcHandler;
use crate::types::{
    AddAdminParams, CancelEntryParams, CreateQueueParams, DeleteQueueParams, EntryActionParams,
    GetEntryParams, GetQueueParams, JoinParams, ListEntriesParams, ListQueuesParams,
    UpdateQueueParams,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use tracing::info;
use waitline_core::application::{LedgerService, RegistryService};

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9640;
const DEFAULT_RATE_LIMIT_BURST: u32 = 200;
const DEFAULT_RATE_LIMIT_PER_SEC: u32 = 100;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit_burst: u32,
    pub rate_limit_per_sec: u32,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            rate_limit_per_sec: DEFAULT_RATE_LIMIT_PER_SEC,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

macro_rules! register {
    ($module:expr, $handler:expr, $method:literal, $params:ty, $call:ident) => {{
        let handler = $handler.clone();
        $module
            .register_async_method($method, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: $params = params.parse()?;
                    handler.$call(req).await
                }
            })
            .map_err(|e| e.to_string())?;
    }};
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        registry: Arc<RegistryService>,
        ledger: Arc<LedgerService>,
    ) -> Self {
        let handler = Arc::new(RpcHandler::new(
            registry,
            ledger,
            config.rate_limit_burst,
            config.rate_limit_per_sec,
        ));
        Self { config, handler }
    }

    /// Start the JSON-RPC server.
    /// Security: only binds to localhost (no external access).
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server on TCP (localhost only)"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        register!(module, self.handler, "queue.create.v1", CreateQueueParams, create_queue);
        register!(module, self.handler, "queue.get.v1", GetQueueParams, get_queue);
        register!(module, self.handler, "queue.list.v1", ListQueuesParams, list_queues);
        register!(module, self.handler, "queue.update.v1", UpdateQueueParams, update_queue);
        register!(module, self.handler, "queue.delete.v1", DeleteQueueParams, delete_queue);
        register!(module, self.handler, "queue.addAdmin.v1", AddAdminParams, add_admin);

        register!(module, self.handler, "entry.join.v1", JoinParams, join);
        register!(module, self.handler, "entry.get.v1", GetEntryParams, get_entry);
        register!(module, self.handler, "entry.list.v1", ListEntriesParams, list_entries);
        register!(module, self.handler, "entry.call.v1", EntryActionParams, call_entry);
        register!(module, self.handler, "entry.serve.v1", EntryActionParams, serve_entry);
        register!(module, self.handler, "entry.cancel.v1", CancelEntryParams, cancel_entry);

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
