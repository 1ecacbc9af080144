//! chess-server
//!
//! Multi-client async TCP server for live chess matches.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod registry;
pub mod server;
pub mod store;
pub mod types;

// these are internal modules, not re-exported
mod client;
mod match_task;

pub use coordinator::Coordinator;
pub use error::SessionError;
pub use match_task::{run_dispatcher, run_dispatcher_with_idle_timeout, WORKER_IDLE_TIMEOUT};
pub use registry::ConnectionRegistry;
