//! Issue repository.

use std::sync::Arc;

use crate::entities::issue::IssueStatus;
use crate::entities::task::Priority;
use crate::entities::{Issue, IssueAssignee, issue, issue_assignee};
use opsboard_common::{AppError, AppResult};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

/// Narrowing filters for issue lists.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    /// Restrict to one outlet.
    pub outlet_id: Option<String>,
    /// Restrict to a status.
    pub status: Option<IssueStatus>,
    /// Restrict to a priority.
    pub priority: Option<Priority>,
    /// Restrict to issues assigned to this profile.
    pub assignee_id: Option<String>,
    /// Case-insensitive title/description substring.
    pub search: Option<String>,
}

/// Issue repository for database operations.
#[derive(Clone)]
pub struct IssueRepository {
    db: Arc<DatabaseConnection>,
}

impl IssueRepository {
    /// Create a new issue repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an issue by ID. Trashed issues are still found here.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<issue::Model>> {
        Issue::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an issue by ID scoped to an organization.
    pub async fn find_in_org(&self, id: &str, org_id: &str) -> AppResult<Option<issue::Model>> {
        Issue::find_by_id(id)
            .filter(issue::Column::OrganizationId.eq(org_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List non-trashed issues of an organization, newest first.
    pub async fn list(&self, org_id: &str, filter: &IssueFilter) -> AppResult<Vec<issue::Model>> {
        let mut query = Issue::find()
            .filter(issue::Column::OrganizationId.eq(org_id))
            .filter(issue::Column::IsTrashed.eq(false))
            .order_by_desc(issue::Column::CreatedAt);

        if let Some(outlet_id) = &filter.outlet_id {
            query = query.filter(issue::Column::OutletId.eq(outlet_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(issue::Column::Status.eq(status));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(issue::Column::Priority.eq(priority));
        }
        if let Some(assignee_id) = &filter.assignee_id {
            query = query.filter(
                issue::Column::Id.in_subquery(
                    Query::select()
                        .column(issue_assignee::Column::IssueId)
                        .from(issue_assignee::Entity)
                        .and_where(
                            Expr::col(issue_assignee::Column::ProfileId).eq(assignee_id.as_str()),
                        )
                        .to_owned(),
                ),
            );
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(Expr::col(issue::Column::Title).ilike(pattern.clone()))
                    .add(Expr::col(issue::Column::Description).ilike(pattern)),
            );
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every non-trashed issue of an organization, for reporting.
    pub async fn list_all_in_org(&self, org_id: &str) -> AppResult<Vec<issue::Model>> {
        Issue::find()
            .filter(issue::Column::OrganizationId.eq(org_id))
            .filter(issue::Column::IsTrashed.eq(false))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new issue.
    pub async fn create(&self, model: issue::ActiveModel) -> AppResult<issue::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an issue.
    pub async fn update(&self, model: issue::ActiveModel) -> AppResult<issue::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete an issue.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let issue = self.find_by_id(id).await?;
        if let Some(i) = issue {
            i.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Profile ids currently assigned to an issue.
    pub async fn assignee_ids(&self, issue_id: &str) -> AppResult<Vec<String>> {
        let rows = IssueAssignee::find()
            .filter(issue_assignee::Column::IssueId.eq(issue_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|r| r.profile_id).collect())
    }

    /// Replace the assignee set of an issue.
    pub async fn set_assignees(&self, issue_id: &str, profile_ids: &[String]) -> AppResult<()> {
        IssueAssignee::delete_many()
            .filter(issue_assignee::Column::IssueId.eq(issue_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for pid in profile_ids {
            let link = issue_assignee::ActiveModel {
                issue_id: Set(issue_id.to_string()),
                profile_id: Set(pid.clone()),
            };
            link.insert(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
