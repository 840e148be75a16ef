//! Storage seam for estate lookups.
//!
//! The planner never touches storage directly; callers hand it the layout
//! loaded through an [`EstateRepository`].

use std::future::Future;

use crate::error::PatrolError;
use crate::models::{Estate, EstateLayout};
use crate::planner::{calculate_patrol_distance, PlanningResult};

/// Read access to estates and their trees.
///
/// Both lookups return `Ok(None)` when the estate does not exist.
pub trait EstateRepository {
    fn get_by_id(
        &self,
        estate_id: &str,
    ) -> impl Future<Output = Result<Option<Estate>, PatrolError>> + Send;

    fn get_trees_by_id(
        &self,
        estate_id: &str,
    ) -> impl Future<Output = Result<Option<EstateLayout>, PatrolError>> + Send;
}

/// Load an estate's dimensions, mapping a missing estate to `NotFound`.
pub async fn load_estate<R>(repo: &R, estate_id: &str) -> Result<Estate, PatrolError>
where
    R: EstateRepository + ?Sized,
{
    repo.get_by_id(estate_id)
        .await?
        .ok_or_else(|| PatrolError::not_found(estate_id))
}

/// Load an estate with its trees, mapping a missing estate to `NotFound`.
pub async fn load_layout<R>(repo: &R, estate_id: &str) -> Result<EstateLayout, PatrolError>
where
    R: EstateRepository + ?Sized,
{
    repo.get_trees_by_id(estate_id)
        .await?
        .ok_or_else(|| PatrolError::not_found(estate_id))
}

/// Load an estate and plan its patrol in one step.
///
/// Plans inline on the calling task. Callers that must keep their executor
/// responsive (the HTTP server) load the layout with [`load_layout`] and run
/// [`calculate_patrol_distance`] on a blocking thread instead.
pub async fn plan_estate<R>(
    repo: &R,
    estate_id: &str,
    scale_factor: u32,
    max_distance: Option<u64>,
) -> Result<PlanningResult, PatrolError>
where
    R: EstateRepository + ?Sized,
{
    let layout = load_layout(repo, estate_id).await?;
    calculate_patrol_distance(Some(&layout), scale_factor, max_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tree;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryRepo {
        estates: HashMap<String, EstateLayout>,
        fail: bool,
    }

    impl EstateRepository for MemoryRepo {
        async fn get_by_id(&self, estate_id: &str) -> Result<Option<Estate>, PatrolError> {
            Ok(self.get_trees_by_id(estate_id).await?.map(|l| l.estate))
        }

        async fn get_trees_by_id(
            &self,
            estate_id: &str,
        ) -> Result<Option<EstateLayout>, PatrolError> {
            if self.fail {
                return Err(PatrolError::Storage("database is locked".into()));
            }
            Ok(self.estates.get(estate_id).cloned())
        }
    }

    fn repo_with_estate() -> MemoryRepo {
        let mut repo = MemoryRepo::default();
        repo.estates.insert(
            "estate-1".to_string(),
            EstateLayout::new(Estate::new(5, 5), vec![Tree::new(3, 3, 5)]),
        );
        repo
    }

    #[tokio::test]
    async fn plans_stored_estate() {
        let repo = repo_with_estate();
        let result = plan_estate(&repo, "estate-1", 10, None).await.unwrap();
        assert_eq!(result.total_distance, 252);
    }

    #[tokio::test]
    async fn missing_estate_is_not_found() {
        let repo = repo_with_estate();
        let err = plan_estate(&repo, "nope", 10, None).await.unwrap_err();
        assert!(matches!(err, PatrolError::NotFound { ref estate_id } if estate_id == "nope"));

        let err = load_estate(&repo, "nope").await.unwrap_err();
        assert!(matches!(err, PatrolError::NotFound { .. }));
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let mut repo = repo_with_estate();
        repo.fail = true;
        let err = load_layout(&repo, "estate-1").await.unwrap_err();
        assert!(matches!(err, PatrolError::Storage(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn load_estate_returns_dimensions() {
        let repo = repo_with_estate();
        assert_eq!(load_estate(&repo, "estate-1").await.unwrap(), Estate::new(5, 5));
    }
}
