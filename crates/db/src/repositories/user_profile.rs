//! User profile repository.

use std::sync::Arc;

use crate::entities::{UserProfile, user_profile};
use opsboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder,
};

/// User profile repository for database operations.
#[derive(Clone)]
pub struct UserProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl UserProfileRepository {
    /// Create a new user profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a profile by ID scoped to an organization.
    pub async fn find_in_org(
        &self,
        id: &str,
        org_id: &str,
    ) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find_by_id(id)
            .filter(user_profile::Column::OrganizationId.eq(org_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a profile by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find()
            .filter(user_profile::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a profile by login identifier: username, email or employee id.
    pub async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find()
            .filter(
                Condition::any()
                    .add(user_profile::Column::Username.eq(identifier))
                    .add(user_profile::Column::Email.eq(identifier))
                    .add(user_profile::Column::EmployeeId.eq(identifier)),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a profile by employee id (identity-API upsert path).
    pub async fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find()
            .filter(user_profile::Column::EmployeeId.eq(employee_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List profiles of an organization, by full name.
    pub async fn list_by_org(&self, org_id: &str) -> AppResult<Vec<user_profile::Model>> {
        UserProfile::find()
            .filter(user_profile::Column::OrganizationId.eq(org_id))
            .order_by_asc(user_profile::Column::FullName)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List profiles of an organization holding any of the given ids.
    pub async fn find_many_in_org(
        &self,
        ids: &[String],
        org_id: &str,
    ) -> AppResult<Vec<user_profile::Model>> {
        UserProfile::find()
            .filter(user_profile::Column::Id.is_in(ids.iter().map(String::as_str)))
            .filter(user_profile::Column::OrganizationId.eq(org_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new profile.
    pub async fn create(&self, model: user_profile::ActiveModel) -> AppResult<user_profile::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a profile.
    pub async fn update(&self, model: user_profile::ActiveModel) -> AppResult<user_profile::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a profile.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let profile = self.find_by_id(id).await?;
        if let Some(p) = profile {
            p.delete(self.db.as_ref())
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

    fn test_profile(id: &str, username: &str) -> user_profile::Model {
        user_profile::Model {
            id: id.to_string(),
            username: username.to_string(),
            email: Some(format!("{username}@example.com")),
            full_name: "Test User".to_string(),
            password_hash: None,
            employee_id: Some("E100".to_string()),
            phone: None,
            department: None,
            designation: None,
            points: 0,
            hr_data: None,
            organization_id: "org1".to_string(),
            outlet_id: None,
            team_id: None,
            role_id: None,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_identifier_matches_username() {
        let profile = test_profile("u1", "alex");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile.clone()]])
                .into_connection(),
        );

        let repo = UserProfileRepository::new(db);
        let result = repo.find_by_identifier("alex").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "u1");
    }

    #[tokio::test]
    async fn test_find_in_org_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user_profile::Model>::new()])
                .into_connection(),
        );

        let repo = UserProfileRepository::new(db);
        let result = repo.find_in_org("u1", "other-org").await.unwrap();

        assert!(result.is_none());
    }
}
