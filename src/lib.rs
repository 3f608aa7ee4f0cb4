//! Boardsync: a real-time collaborative kanban board server.
//!
//! The write path is optimistic concurrency control at whole-record
//! granularity: every task carries a version, every update names the version
//! it expects, and the store only commits when they match. Rejections hand
//! both snapshots back for human resolution; commits fan out to every
//! connected session over WebSocket and land in an append-only activity
//! ledger.

// Module declarations
pub mod arbiter;
pub mod error;
pub mod events;
pub mod ledger;
mod models;
pub mod planner;
pub mod server;
pub mod shutdown;
pub mod store;
pub mod users;

// Re-export models for use throughout the crate and by integration tests
pub use models::*;
