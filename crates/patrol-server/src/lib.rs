//! Shared library surface for patrol server utilities and tests.

pub mod api;
pub mod config;
pub mod persistence;
pub mod state;
