use std::sync::Arc;

use anyhow::Result;

use todo_api_core::storage::{ActivityRepository, DeleteMatch, RepositoryError};
use todo_api_core::todo::{
    validate_activity, Activity, CreateActivityRequest, UpdateActivityRequest,
};

/// Activity group use cases.
#[derive(Clone)]
pub struct ActivityService {
    repository: Arc<dyn ActivityRepository>,
    delete_match: DeleteMatch,
}

impl ActivityService {
    pub fn new(repository: Arc<dyn ActivityRepository>, delete_match: DeleteMatch) -> Self {
        Self {
            repository,
            delete_match,
        }
    }

    pub async fn create_activity(&self, request: CreateActivityRequest) -> Result<Activity> {
        let activity = request.into_activity();
        validate_activity(&activity)?;

        let stored = self.repository.insert_activity(activity).await?;
        tracing::info!(id = stored.id, title = %stored.title, "Created activity");
        Ok(stored)
    }

    pub async fn get_activity(&self, id: i64) -> Result<Activity> {
        let activity = self
            .repository
            .get_activity(id)
            .await?
            .ok_or(RepositoryError::NotFound {
                entity_type: "Activity",
                id,
            })?;
        Ok(activity)
    }

    pub async fn list_activities(&self) -> Result<Vec<Activity>> {
        let activities = self.repository.list_activities().await?;
        tracing::debug!(count = activities.len(), "Listed activities");
        Ok(activities)
    }

    /// Applies the non-empty fields of `request` and bumps `updated_at`.
    pub async fn update_activity(
        &self,
        id: i64,
        request: UpdateActivityRequest,
    ) -> Result<Activity> {
        let mut activity = self.get_activity(id).await?;
        request.apply_to(&mut activity);

        self.repository.update_activity(&activity).await?;
        tracing::info!(id, "Updated activity");
        Ok(activity)
    }

    pub async fn delete_activity(&self, id: i64) -> Result<()> {
        match self.delete_match {
            DeleteMatch::Id => self.repository.delete_activity(id, None).await?,
            DeleteMatch::IdAndTitle => {
                let current = self.get_activity(id).await?;
                let guard = self.delete_match.title_guard(&current.title);
                self.repository.delete_activity(id, guard).await?;
            }
        }
        tracing::info!(id, "Deleted activity");
        Ok(())
    }
}
