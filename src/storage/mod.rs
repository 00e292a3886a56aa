//! Database and contact storage

pub mod contacts;
pub mod db;
pub mod migrations;

// Re-exports for convenience
pub use contacts::{ContactRecord, ContactStore, SqliteContactStore};
pub use db::{create_pool, get_connection, DbConnection, DbPool};
