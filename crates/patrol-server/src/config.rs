//! Server configuration from environment.

use patrol_core::DEFAULT_SCALE_FACTOR;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
    /// Distance units per horizontal cell move. Always positive.
    pub scale_factor: u32,
    /// Largest `length * width` the planner will allocate a grid for.
    pub max_plan_cells: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 1323,
            database_path: "data/patrol.db".to_string(),
            database_max_connections: 5,
            scale_factor: DEFAULT_SCALE_FACTOR,
            max_plan_cells: 25_000_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            server_port: lookup("PATROL_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            database_path: lookup("PATROL_DATABASE_PATH")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.database_path),
            database_max_connections: lookup("PATROL_DATABASE_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.database_max_connections),
            scale_factor: lookup("SCALE_FACTOR")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.scale_factor),
            max_plan_cells: lookup("PATROL_MAX_PLAN_CELLS")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_plan_cells),
        }
    }
}
