// Shared test fixture: fully wired services over in-memory SQLite

use std::sync::Arc;
use waitline_core::application::{LedgerService, Notifier, RegistryService};
use waitline_core::port::id_provider::UuidProvider;
use waitline_core::port::time_provider::SystemTimeProvider;
use waitline_infra_sms::MemorySmsGateway;
use waitline_infra_sqlite::{
    create_pool, run_migrations, SqliteAdminRepository, SqliteEntryRepository,
    SqliteQueueRepository, SqliteUserDirectory,
};

pub struct TestApp {
    pub registry: Arc<RegistryService>,
    pub ledger: Arc<LedgerService>,
    pub gateway: Arc<MemorySmsGateway>,
    pub users: Arc<SqliteUserDirectory>,
}

pub async fn spawn_app() -> TestApp {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);

    let queue_repo = Arc::new(SqliteQueueRepository::new(pool.clone()));
    let entry_repo = Arc::new(SqliteEntryRepository::new(pool.clone()));
    let admin_repo = Arc::new(SqliteAdminRepository::new(pool.clone()));
    let users = Arc::new(SqliteUserDirectory::new(pool.clone()));

    let gateway = Arc::new(MemorySmsGateway::new());
    let notifier = Arc::new(Notifier::new(gateway.clone()));

    let registry = Arc::new(RegistryService::new(
        queue_repo.clone(),
        queue_repo.clone(),
        entry_repo.clone(),
        admin_repo.clone(),
        users.clone(),
        id_provider.clone(),
        time_provider.clone(),
    ));

    let ledger = Arc::new(LedgerService::new(
        entry_repo.clone(),
        entry_repo,
        queue_repo,
        admin_repo,
        notifier,
        id_provider,
        time_provider,
    ));

    TestApp {
        registry,
        ledger,
        gateway,
        users,
    }
}

/// Create a queue owned by `owner` and return its id
pub async fn create_queue(app: &TestApp, name: &str, owner: &str, service_minutes: i64) -> String {
    let view = app
        .registry
        .create(
            waitline_core::application::CreateQueueRequest {
                name: name.to_string(),
                business_name: "Acme Barbers".to_string(),
                description: None,
                address: None,
                estimated_service_minutes: service_minutes,
            },
            &owner.to_string(),
        )
        .await
        .unwrap();
    view.id
}

/// Join with a valid phone number and return the entry id
#[allow(dead_code)]
pub async fn join(app: &TestApp, queue_id: &str, customer: &str) -> String {
    let view = app
        .ledger
        .join(waitline_core::application::JoinRequest {
            queue_id: queue_id.to_string(),
            customer_name: customer.to_string(),
            phone_number: "+12025550123".to_string(),
            party_size: 1,
        })
        .await
        .unwrap();
    view.id
}
