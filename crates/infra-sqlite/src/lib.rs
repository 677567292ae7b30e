// Waitline Infrastructure - SQLite Adapter
// Implements: QueueRepository, EntryRepository, AdminRepository,
// UserDirectory and the transactional ports

mod admin_repository;
mod connection;
mod entry_repository;
mod error;
mod migration;
mod queue_repository;
mod transaction;
mod user_directory;

pub use admin_repository::SqliteAdminRepository;
pub use connection::create_pool;
pub use entry_repository::SqliteEntryRepository;
pub use migration::run_migrations;
pub use queue_repository::SqliteQueueRepository;
pub use user_directory::SqliteUserDirectory;

pub(crate) use error::map_sqlx_error;

// Note: sqlx::Error conversion lives in error.rs because of Rust's orphan
// rules (cannot implement From<sqlx::Error> for AppError here)
