//! Form repository.

use std::sync::Arc;

use crate::entities::form::FormStatus;
use crate::entities::{Form, FormAssignee, FormResponse, form, form_assignee, form_response};
use opsboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

/// Narrowing filters for form lists.
#[derive(Debug, Clone, Default)]
pub struct FormFilter {
    /// Restrict to one outlet.
    pub outlet_id: Option<String>,
    /// Restrict to a status.
    pub status: Option<FormStatus>,
    /// Case-insensitive name substring.
    pub search: Option<String>,
}

/// Form repository for database operations.
#[derive(Clone)]
pub struct FormRepository {
    db: Arc<DatabaseConnection>,
}

impl FormRepository {
    /// Create a new form repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a form by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<form::Model>> {
        Form::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a form by ID scoped to an organization.
    pub async fn find_in_org(&self, id: &str, org_id: &str) -> AppResult<Option<form::Model>> {
        Form::find_by_id(id)
            .filter(form::Column::OrganizationId.eq(org_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List non-trashed forms of an organization, newest first.
    pub async fn list(&self, org_id: &str, filter: &FormFilter) -> AppResult<Vec<form::Model>> {
        let mut query = Form::find()
            .filter(form::Column::OrganizationId.eq(org_id))
            .filter(form::Column::Status.ne(FormStatus::Trashed))
            .order_by_desc(form::Column::CreatedAt);

        if let Some(outlet_id) = &filter.outlet_id {
            query = query.filter(form::Column::OutletId.eq(outlet_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(form::Column::Status.eq(status));
        }
        if let Some(search) = &filter.search {
            query = query.filter(form::Column::Name.contains(search));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new form.
    pub async fn create(&self, model: form::ActiveModel) -> AppResult<form::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a form.
    pub async fn update(&self, model: form::ActiveModel) -> AppResult<form::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete a form and its responses.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let form = self.find_by_id(id).await?;
        if let Some(f) = form {
            f.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Profile ids a form is assigned to.
    pub async fn assignee_ids(&self, form_id: &str) -> AppResult<Vec<String>> {
        let rows = FormAssignee::find()
            .filter(form_assignee::Column::FormId.eq(form_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|r| r.profile_id).collect())
    }

    /// Replace the assignee set of a form.
    pub async fn set_assignees(&self, form_id: &str, profile_ids: &[String]) -> AppResult<()> {
        FormAssignee::delete_many()
            .filter(form_assignee::Column::FormId.eq(form_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for pid in profile_ids {
            let link = form_assignee::ActiveModel {
                form_id: Set(form_id.to_string()),
                profile_id: Set(pid.clone()),
            };
            link.insert(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// List responses of a form, newest first.
    pub async fn list_responses(&self, form_id: &str) -> AppResult<Vec<form_response::Model>> {
        FormResponse::find()
            .filter(form_response::Column::FormId.eq(form_id))
            .order_by_desc(form_response::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a single response.
    pub async fn find_response(&self, id: &str) -> AppResult<Option<form_response::Model>> {
        FormResponse::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a response.
    pub async fn add_response(
        &self,
        model: form_response::ActiveModel,
    ) -> AppResult<form_response::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a response.
    pub async fn update_response(
        &self,
        model: form_response::ActiveModel,
    ) -> AppResult<form_response::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
