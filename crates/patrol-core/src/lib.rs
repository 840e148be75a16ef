pub mod error;
pub mod grid;
pub mod models;
pub mod planner;
pub mod repository;
pub mod stats;

pub use error::PatrolError;
pub use grid::{GridBuilder, HeightMap, GROUND_CLEARANCE};
pub use models::{
    CreateEstateRequest, CreateTreeRequest, Estate, EstateLayout, EstateRecord, Tree, TreeRecord,
    MAX_ESTATE_SIDE, MAX_TREE_HEIGHT,
};
pub use planner::{
    calculate_patrol_distance, DistanceAccumulator, PlanOutcome, PlanningResult,
    SerpentinePlanner, SerpentineWalk, DEFAULT_SCALE_FACTOR,
};
pub use repository::{load_estate, load_layout, plan_estate, EstateRepository};
pub use stats::EstateStats;
