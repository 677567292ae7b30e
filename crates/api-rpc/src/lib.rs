//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 server for Waitline. Authorized methods
//! carry an `actor` field supplied by the external identity layer; the
//! server trusts it without re-validating credentials.

pub mod error;
pub mod handler;
pub mod rate_limiter;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
