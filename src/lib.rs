//! Temporal analytics and adaptive selection for Tandem check-ins.
//!
//! Everything is synchronous and explicit: callers pass the current
//! instant and their own randomness, and all persistence goes through
//! the traits in `store`. `db::EngineDb` is the shipped SQLite backend.

pub mod config;
pub mod db;
pub mod error;
mod migrations;
pub mod period;
pub mod ratings;
pub mod selection;
pub mod store;
pub mod trends;
pub mod types;

pub use config::EngineConfig;
pub use error::EngineError;
