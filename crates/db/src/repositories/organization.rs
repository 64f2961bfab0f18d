//! Organization repository.

use std::sync::Arc;

use crate::entities::{Organization, organization};
use opsboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Organization repository for database operations.
#[derive(Clone)]
pub struct OrganizationRepository {
    db: Arc<DatabaseConnection>,
}

impl OrganizationRepository {
    /// Create a new organization repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an organization by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<organization::Model>> {
        Organization::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an organization by its short code.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<organization::Model>> {
        Organization::find()
            .filter(organization::Column::Code.eq(code))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all active organizations, by name.
    pub async fn list_active(&self) -> AppResult<Vec<organization::Model>> {
        Organization::find()
            .filter(organization::Column::IsActive.eq(true))
            .order_by_asc(organization::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new organization.
    pub async fn create(&self, model: organization::ActiveModel) -> AppResult<organization::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an organization.
    pub async fn update(&self, model: organization::ActiveModel) -> AppResult<organization::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete an organization. Cascades through every owned table.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let org = self.find_by_id(id).await?;
        if let Some(o) = org {
            o.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_org(id: &str, name: &str) -> organization::Model {
        organization::Model {
            id: id.to_string(),
            name: name.to_string(),
            code: name.to_lowercase(),
            address: None,
            phone: None,
            email: None,
            website: None,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let org = test_org("org1", "Acme");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[org.clone()]])
                .into_connection(),
        );

        let repo = OrganizationRepository::new(db);
        let result = repo.find_by_id("org1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "Acme");
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<organization::Model>::new()])
                .into_connection(),
        );

        let repo = OrganizationRepository::new(db);
        let result = repo.find_by_id("missing").await.unwrap();

        assert!(result.is_none());
    }
}
