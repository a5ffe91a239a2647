//! Database Module
//!
//! Connection pooling and query helpers.

pub mod connection;

pub use connection::{DatabaseConfig, DatabasePool, Pagination};
