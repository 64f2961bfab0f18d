//! Permission checks.
//!
//! The single chokepoint for authorization. Checks are fail-closed: a
//! profile without a role holds no permissions, and unknown codenames are
//! simply absent from every role's set.

use opsboard_db::entities::user_profile;
use opsboard_db::repositories::RoleRepository;
use opsboard_common::{AppError, AppResult};

/// Permission codenames, matching the seeded catalog.
pub mod perms {
    pub const VIEW_DASHBOARD: &str = "view_dashboard";
    pub const VIEW_PROJECTS: &str = "view_projects";
    pub const CREATE_PROJECT: &str = "create_project";
    pub const EDIT_PROJECT: &str = "edit_project";
    pub const DELETE_PROJECT: &str = "delete_project";
    pub const VIEW_TASKS: &str = "view_tasks";
    pub const CREATE_TASK: &str = "create_task";
    pub const EDIT_TASK: &str = "edit_task";
    pub const CHANGE_TASK_STATUS: &str = "change_task_status";
    pub const DELETE_TASK: &str = "delete_task";
    pub const VIEW_ISSUES: &str = "view_issues";
    pub const CREATE_ISSUE: &str = "create_issue";
    pub const EDIT_ISSUE: &str = "edit_issue";
    pub const DELETE_ISSUE: &str = "delete_issue";
    pub const VIEW_TEMPLATES: &str = "view_templates";
    pub const CREATE_TEMPLATE: &str = "create_template";
    pub const EDIT_TEMPLATE: &str = "edit_template";
    pub const DELETE_TEMPLATE: &str = "delete_template";
    pub const VIEW_REPORTS: &str = "view_reports";
    pub const VIEW_FORMS: &str = "view_forms";
    pub const CREATE_FORM: &str = "create_form";
    pub const EDIT_FORM: &str = "edit_form";
    pub const DELETE_FORM: &str = "delete_form";
    pub const VIEW_USERS: &str = "view_users";
    pub const CREATE_USER: &str = "create_user";
    pub const EDIT_USER: &str = "edit_user";
    pub const VIEW_ROLES: &str = "view_roles";
    pub const CREATE_ROLE: &str = "create_role";
    pub const MANAGE_OUTLETS: &str = "manage_outlets";
    pub const USE_ASSIST: &str = "use_assist";
    pub const MANAGE_SETTINGS: &str = "manage_settings";
}

/// Access service for permission checks.
#[derive(Clone)]
pub struct AccessService {
    role_repo: RoleRepository,
}

impl AccessService {
    /// Create a new access service.
    #[must_use]
    pub const fn new(role_repo: RoleRepository) -> Self {
        Self { role_repo }
    }

    /// Whether the profile's role grants the codename.
    ///
    /// Returns `false` (not an error) when the profile has no role or the
    /// role lacks the codename.
    pub async fn has_permission(
        &self,
        profile: &user_profile::Model,
        codename: &str,
    ) -> AppResult<bool> {
        let Some(role_id) = &profile.role_id else {
            return Ok(false);
        };

        let codenames = self.role_repo.permission_codenames(role_id).await?;
        Ok(codenames.contains(codename))
    }

    /// Refuse with `PermissionDenied` unless the profile holds the
    /// codename. Every mutating operation calls this before any write.
    pub async fn require(&self, profile: &user_profile::Model, codename: &str) -> AppResult<()> {
        if self.has_permission(profile, codename).await? {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(format!(
                "missing permission: {codename}"
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use opsboard_db::entities::user_profile;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn profile_with_role(role_id: Option<&str>) -> user_profile::Model {
        user_profile::Model {
            id: "u1".to_string(),
            username: "alex".to_string(),
            email: None,
            full_name: "Alex".to_string(),
            password_hash: None,
            employee_id: None,
            phone: None,
            department: None,
            designation: None,
            points: 0,
            hr_data: None,
            organization_id: "org1".to_string(),
            outlet_id: None,
            team_id: None,
            role_id: role_id.map(ToString::to_string),
            is_active: true,
            last_login_at: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_no_role_means_no_permission() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );
        let access = AccessService::new(RoleRepository::new(db));

        let held = access
            .has_permission(&profile_with_role(None), perms::VIEW_TASKS)
            .await
            .unwrap();

        assert!(!held);
    }

    #[tokio::test]
    async fn test_require_refuses_without_role() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );
        let access = AccessService::new(RoleRepository::new(db));

        let result = access
            .require(&profile_with_role(None), perms::CREATE_TASK)
            .await;

        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    }
}
