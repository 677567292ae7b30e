//! Waitline - Main Entry Point
//!
//! Composition root: config, logging, database, DI wiring, RPC server.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use waitline_api_rpc::{RpcServer, RpcServerConfig};
use waitline_core::application::{LedgerService, Notifier, RegistryService};
use waitline_core::port::id_provider::UuidProvider;
use waitline_core::port::time_provider::SystemTimeProvider;
use waitline_core::port::NotificationGateway;
use waitline_infra_sms::{GatewayKind, LogSmsGateway, MemorySmsGateway};
use waitline_infra_sqlite::{
    create_pool, run_migrations, SqliteAdminRepository, SqliteEntryRepository,
    SqliteQueueRepository, SqliteUserDirectory,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.waitline/waitline.db";

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Tilde-expand the configured DB path (env override or default)
fn resolve_db_path(configured: Option<String>) -> String {
    let raw = configured.unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
    shellexpand::tilde(&raw).into_owned()
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("WAITLINE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("waitline=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Waitline v{} starting...", VERSION);

    // 2. Load configuration
    let db_path = resolve_db_path(std::env::var("WAITLINE_DB_PATH").ok());
    let rpc_port: u16 = env_parse("WAITLINE_RPC_PORT", 9640);
    let sms_provider: GatewayKind = std::env::var("WAITLINE_SMS_PROVIDER")
        .unwrap_or_else(|_| "log".to_string())
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    info!(db_path = %db_path, "Initializing database...");

    // 3. Initialize database (create_if_missing covers the file, not the dir)
    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);

    let queue_repo = Arc::new(SqliteQueueRepository::new(pool.clone()));
    let entry_repo = Arc::new(SqliteEntryRepository::new(pool.clone()));
    let admin_repo = Arc::new(SqliteAdminRepository::new(pool.clone()));
    let user_directory = Arc::new(SqliteUserDirectory::new(pool.clone()));

    let gateway: Arc<dyn NotificationGateway> = match sms_provider {
        GatewayKind::Memory => Arc::new(MemorySmsGateway::new()),
        GatewayKind::Log => Arc::new(LogSmsGateway),
    };
    info!(provider = ?sms_provider, "Notification gateway selected");
    let notifier = Arc::new(Notifier::new(gateway));

    let registry = Arc::new(RegistryService::new(
        queue_repo.clone(),
        queue_repo.clone(),
        entry_repo.clone(),
        admin_repo.clone(),
        user_directory,
        id_provider.clone(),
        time_provider.clone(),
    ));

    let ledger = Arc::new(LedgerService::new(
        entry_repo.clone(),
        entry_repo.clone(),
        queue_repo.clone(),
        admin_repo.clone(),
        notifier,
        id_provider,
        time_provider,
    ));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_config = RpcServerConfig {
        port: rpc_port,
        rate_limit_burst: env_parse("WAITLINE_RATE_LIMIT_BURST", 200),
        rate_limit_per_sec: env_parse("WAITLINE_RATE_LIMIT_RATE", 100),
        ..Default::default()
    };
    let rpc_server = RpcServer::new(rpc_config, registry, ledger);
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!("System ready. Waiting for requests...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::resolve_db_path;

    #[test]
    fn configured_db_path_is_tilde_expanded() {
        let expanded = resolve_db_path(Some("~/custom/waitline.db".to_string()));
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/custom/waitline.db"));
    }

    #[test]
    fn default_db_path_is_tilde_expanded() {
        let expanded = resolve_db_path(None);
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/.waitline/waitline.db"));
    }

    #[test]
    fn absolute_paths_pass_through() {
        let expanded = resolve_db_path(Some("/var/lib/waitline.db".to_string()));
        assert_eq!(expanded, "/var/lib/waitline.db");
    }
}
