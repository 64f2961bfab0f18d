//! Task template repository.

use std::sync::Arc;

use crate::entities::{TaskTemplate, TemplateSubtask, task_template, template_subtask};
use opsboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Task template repository for database operations.
#[derive(Clone)]
pub struct TemplateRepository {
    db: Arc<DatabaseConnection>,
}

impl TemplateRepository {
    /// Create a new template repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a template by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<task_template::Model>> {
        TaskTemplate::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a template by ID scoped to an organization.
    pub async fn find_in_org(
        &self,
        id: &str,
        org_id: &str,
    ) -> AppResult<Option<task_template::Model>> {
        TaskTemplate::find_by_id(id)
            .filter(task_template::Column::OrganizationId.eq(org_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List non-trashed templates of an organization, newest first.
    pub async fn list(&self, org_id: &str) -> AppResult<Vec<task_template::Model>> {
        TaskTemplate::find()
            .filter(task_template::Column::OrganizationId.eq(org_id))
            .filter(task_template::Column::IsTrashed.eq(false))
            .order_by_desc(task_template::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new template.
    pub async fn create(
        &self,
        model: task_template::ActiveModel,
    ) -> AppResult<task_template::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a template.
    pub async fn update(
        &self,
        model: task_template::ActiveModel,
    ) -> AppResult<task_template::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete a template and its subtask rows.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let template = self.find_by_id(id).await?;
        if let Some(t) = template {
            t.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// List subtask rows of a template, in position order.
    pub async fn list_subtasks(&self, template_id: &str) -> AppResult<Vec<template_subtask::Model>> {
        TemplateSubtask::find()
            .filter(template_subtask::Column::TemplateId.eq(template_id))
            .order_by_asc(template_subtask::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace the subtask rows of a template.
    pub async fn set_subtasks(
        &self,
        template_id: &str,
        rows: Vec<template_subtask::ActiveModel>,
    ) -> AppResult<()> {
        TemplateSubtask::delete_many()
            .filter(template_subtask::Column::TemplateId.eq(template_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for row in rows {
            row.insert(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
