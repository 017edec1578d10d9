//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for creating and dropping the tables (SQLite)
//! - `sqlite.rs`: pooled storage issuing the queries

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbPasswordEntry, DbUser, SiteCredential};
pub use schema::{SQLITE_DROP, SQLITE_INIT};
pub use sqlite::{SqlitePool, VaultStorage, open};
