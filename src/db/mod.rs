// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Schema bootstrap

pub mod connection;
pub mod migrations;

pub use connection::{create_connection_pool, get_connection, ConnectionPool, PooledConn};

pub use migrations::{get_schema_version, initialize_database};
