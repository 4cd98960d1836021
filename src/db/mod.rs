//! Database module
//!
//! SQLite cache of person info and its migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
