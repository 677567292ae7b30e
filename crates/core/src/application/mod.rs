// Application Layer - Use Cases and Business Logic

pub mod estimator;
pub mod ledger;
pub mod notify;
pub mod registry;

// Re-exports
pub use ledger::{EntryView, JoinRequest, LedgerService};
pub use notify::Notifier;
pub use registry::{CreateQueueRequest, QueueView, RegistryService, UpdateQueueRequest};
