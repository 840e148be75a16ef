//! Patrol CLI - command line tools for the estate patrol system.
//!
//! Binaries:
//! - plan_offline: run the patrol planner over a layout file
//! - seed_estate: populate a running server with a random estate

pub mod client;
pub mod layout;

pub use client::{DronePlan, PatrolClient};
pub use layout::{check_layout, random_trees, read_layout, DEFAULT_MAX_CELLS};
