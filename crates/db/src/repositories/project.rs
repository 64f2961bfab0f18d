//! Project repository.

use std::sync::Arc;

use crate::entities::project::ProjectStatus;
use crate::entities::{Project, ProjectMember, project, project_member};
use opsboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

/// Narrowing filters for project lists.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Restrict to one outlet.
    pub outlet_id: Option<String>,
    /// Restrict to a status.
    pub status: Option<ProjectStatus>,
    /// Case-insensitive name substring.
    pub search: Option<String>,
}

/// Project repository for database operations.
#[derive(Clone)]
pub struct ProjectRepository {
    db: Arc<DatabaseConnection>,
}

impl ProjectRepository {
    /// Create a new project repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a project by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<project::Model>> {
        Project::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a project by ID scoped to an organization.
    pub async fn find_in_org(&self, id: &str, org_id: &str) -> AppResult<Option<project::Model>> {
        Project::find_by_id(id)
            .filter(project::Column::OrganizationId.eq(org_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List non-trashed projects of an organization, newest first.
    pub async fn list(
        &self,
        org_id: &str,
        filter: &ProjectFilter,
    ) -> AppResult<Vec<project::Model>> {
        let mut query = Project::find()
            .filter(project::Column::OrganizationId.eq(org_id))
            .filter(project::Column::IsTrashed.eq(false))
            .order_by_desc(project::Column::CreatedAt);

        if let Some(outlet_id) = &filter.outlet_id {
            query = query.filter(project::Column::OutletId.eq(outlet_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(project::Column::Status.eq(status));
        }
        if let Some(search) = &filter.search {
            query = query.filter(project::Column::Name.contains(search));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new project.
    pub async fn create(&self, model: project::ActiveModel) -> AppResult<project::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a project.
    pub async fn update(&self, model: project::ActiveModel) -> AppResult<project::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete a project.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let project = self.find_by_id(id).await?;
        if let Some(p) = project {
            p.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Profile ids currently on a project.
    pub async fn member_ids(&self, project_id: &str) -> AppResult<Vec<String>> {
        let rows = ProjectMember::find()
            .filter(project_member::Column::ProjectId.eq(project_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|r| r.profile_id).collect())
    }

    /// Replace the member set of a project.
    pub async fn set_members(&self, project_id: &str, profile_ids: &[String]) -> AppResult<()> {
        ProjectMember::delete_many()
            .filter(project_member::Column::ProjectId.eq(project_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for pid in profile_ids {
            let link = project_member::ActiveModel {
                project_id: Set(project_id.to_string()),
                profile_id: Set(pid.clone()),
            };
            link.insert(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
