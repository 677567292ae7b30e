// Port Layer - Interfaces for external dependencies

pub mod admin_repository;
pub mod entry_repository;
pub mod id_provider;
pub mod notification;
pub mod queue_repository;
pub mod time_provider;
pub mod transaction;
pub mod user_directory;

// Re-exports
pub use admin_repository::AdminRepository;
pub use entry_repository::EntryRepository;
pub use id_provider::IdProvider;
pub use notification::{DeliveryReceipt, NotificationGateway};
pub use queue_repository::QueueRepository;
pub use time_provider::TimeProvider;
pub use transaction::{
    JoinTransaction, QueueTransaction, Transaction, TransactionalEntryRepository,
    TransactionalQueueRepository,
};
pub use user_directory::UserDirectory;
