// Waitline Infrastructure - Notification Gateways
//
// Two NotificationGateway implementations, selected once at startup:
// a recording in-memory gateway for tests and development, and a log-only
// gateway standing in for a real carrier integration. A carrier adapter
// would be a third implementation of the same port.

mod log_gateway;
mod memory;

pub use log_gateway::LogSmsGateway;
pub use memory::{MemorySmsGateway, SentMessage};

/// Gateway kind chosen by configuration (never runtime type inspection)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
    Memory,
    Log,
}

impl std::str::FromStr for GatewayKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" | "mock" => Ok(GatewayKind::Memory),
            "log" => Ok(GatewayKind::Log),
            other => Err(format!("Unknown SMS provider: {}", other)),
        }
    }
}
