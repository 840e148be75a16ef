//! Persistence layer for the patrol server.
//!
//! Provides SQLite-backed storage for estates and trees.

pub mod db;
pub mod estates;
pub mod trees;

pub use db::{init_database, Database};
