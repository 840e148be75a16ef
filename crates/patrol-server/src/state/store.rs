//! Application state backed by SQLite with a DashMap estate cache.

use anyhow::Result;
use chrono::Utc;
use dashmap::DashMap;
use patrol_core::{
    CreateTreeRequest, Estate, EstateLayout, EstateRepository, PatrolError, TreeRecord,
};
use uuid::Uuid;

use crate::config::Config;
use crate::persistence::{estates, trees, Database};

/// Result of planting a tree.
#[derive(Debug)]
pub enum PlantTreeOutcome {
    Planted(TreeRecord),
    EstateNotFound,
    OutOfBounds,
    Occupied,
}

/// Application state shared across handlers.
///
/// Estates are immutable once created, so their dimensions are cached
/// write-through. Trees are always read from the database.
pub struct AppState {
    db: Database,
    config: Config,
    estates: DashMap<String, Estate>,
}

impl AppState {
    pub fn with_database(db: Database, config: Config) -> Self {
        Self {
            db,
            config,
            estates: DashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cached_estate_count(&self) -> usize {
        self.estates.len()
    }

    /// Create an estate and return its id.
    pub async fn create_estate(&self, length: u32, width: u32) -> Result<String> {
        let candidate = Uuid::new_v4().to_string();
        let id = estates::upsert_estate(self.db.pool(), &candidate, length, width).await?;
        self.estates.insert(id.clone(), Estate::new(length, width));
        Ok(id)
    }

    /// Look up estate dimensions, filling the cache on a miss.
    pub async fn estate(&self, estate_id: &str) -> Result<Option<Estate>> {
        if let Some(estate) = self.estates.get(estate_id) {
            return Ok(Some(*estate));
        }

        let Some(record) = estates::get_estate(self.db.pool(), estate_id).await? else {
            return Ok(None);
        };
        let estate = record.dimensions();
        self.estates.insert(record.id, estate);
        Ok(Some(estate))
    }

    /// Load an estate together with all of its trees.
    pub async fn estate_layout(&self, estate_id: &str) -> Result<Option<EstateLayout>> {
        let Some(estate) = self.estate(estate_id).await? else {
            return Ok(None);
        };
        let trees = trees::load_trees(self.db.pool(), estate_id)
            .await?
            .iter()
            .map(TreeRecord::placement)
            .collect();
        Ok(Some(EstateLayout::new(estate, trees)))
    }

    /// Plant a tree, enforcing estate bounds and one tree per cell.
    pub async fn plant_tree(
        &self,
        estate_id: &str,
        req: &CreateTreeRequest,
    ) -> Result<PlantTreeOutcome> {
        let Some(estate) = self.estate(estate_id).await? else {
            return Ok(PlantTreeOutcome::EstateNotFound);
        };
        if !estate.contains(req.x, req.y) {
            return Ok(PlantTreeOutcome::OutOfBounds);
        }
        if trees::tree_exists(self.db.pool(), estate_id, req.x, req.y).await? {
            return Ok(PlantTreeOutcome::Occupied);
        }

        let tree = TreeRecord {
            id: Uuid::new_v4().to_string(),
            estate_id: estate_id.to_string(),
            x: req.x,
            y: req.y,
            height: req.height,
            created_at: Utc::now(),
        };
        if !trees::insert_tree(self.db.pool(), &tree).await? {
            return Ok(PlantTreeOutcome::Occupied);
        }
        Ok(PlantTreeOutcome::Planted(tree))
    }
}

impl EstateRepository for AppState {
    async fn get_by_id(&self, estate_id: &str) -> Result<Option<Estate>, PatrolError> {
        self.estate(estate_id)
            .await
            .map_err(|e| PatrolError::Storage(e.into()))
    }

    async fn get_trees_by_id(&self, estate_id: &str) -> Result<Option<EstateLayout>, PatrolError> {
        self.estate_layout(estate_id)
            .await
            .map_err(|e| PatrolError::Storage(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::init_database;
    use patrol_core::{load_layout, Tree};

    async fn state() -> AppState {
        let db = init_database(":memory:", 1).await.unwrap();
        AppState::with_database(db, Config::default())
    }

    fn tree_req(x: u32, y: u32, height: u32) -> CreateTreeRequest {
        CreateTreeRequest { x, y, height }
    }

    #[tokio::test]
    async fn create_estate_populates_cache() {
        let state = state().await;
        let id = state.create_estate(5, 2).await.unwrap();
        assert_eq!(state.cached_estate_count(), 1);
        assert_eq!(state.estate(&id).await.unwrap(), Some(Estate::new(5, 2)));
    }

    #[tokio::test]
    async fn plant_tree_checks_bounds_and_occupancy() {
        let state = state().await;
        let id = state.create_estate(5, 2).await.unwrap();

        let outcome = state.plant_tree(&id, &tree_req(5, 1, 5)).await.unwrap();
        assert!(matches!(outcome, PlantTreeOutcome::Planted(_)));

        let outcome = state.plant_tree(&id, &tree_req(5, 1, 7)).await.unwrap();
        assert!(matches!(outcome, PlantTreeOutcome::Occupied));

        let outcome = state.plant_tree(&id, &tree_req(6, 1, 7)).await.unwrap();
        assert!(matches!(outcome, PlantTreeOutcome::OutOfBounds));

        let outcome = state.plant_tree("missing", &tree_req(1, 1, 7)).await.unwrap();
        assert!(matches!(outcome, PlantTreeOutcome::EstateNotFound));
    }

    #[tokio::test]
    async fn serves_layouts_through_repository_seam() {
        let state = state().await;
        let id = state.create_estate(5, 2).await.unwrap();
        state.plant_tree(&id, &tree_req(5, 2, 10)).await.unwrap();

        let layout = load_layout(&state, &id).await.unwrap();
        assert_eq!(layout.estate, Estate::new(5, 2));
        assert_eq!(layout.trees, vec![Tree::new(5, 2, 10)]);

        let err = load_layout(&state, "missing").await.unwrap_err();
        assert!(matches!(err, PatrolError::NotFound { .. }));
    }
}
