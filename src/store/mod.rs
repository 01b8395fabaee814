//! Persistence layer — libSQL-backed storage for businesses, onboarding
//! progress, the response cache, and the outbound message log.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{Database, OutboundMessage, QueueStatus};
