//! Role administration and the permission catalog.

use chrono::Utc;
use sea_orm::Set;
use validator::Validate;

use opsboard_common::{AppError, AppResult, IdGenerator};
use opsboard_db::entities::{permission, role};
use opsboard_db::repositories::RoleRepository;

use crate::services::access::{perms, AccessService};
use crate::services::context::RequestContext;

/// Input for creating or updating a role.
#[derive(Debug, Clone, Validate, serde::Deserialize)]
pub struct RoleInput {
    /// Name, unique within the organization.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Permission codenames the role grants. Unknown codenames are
    /// silently dropped against the seeded catalog.
    pub permissions: Vec<String>,
}

/// A role with its granted permission codenames, for admin screens.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RoleWithPermissions {
    /// The role row.
    pub role: role::Model,
    /// Granted codenames.
    pub permissions: Vec<String>,
}

/// Role service.
#[derive(Clone)]
pub struct RoleService {
    role_repo: RoleRepository,
    access: AccessService,
    id_gen: IdGenerator,
}

impl RoleService {
    /// Create a new role service.
    #[must_use]
    pub const fn new(role_repo: RoleRepository, access: AccessService) -> Self {
        Self {
            role_repo,
            access,
            id_gen: IdGenerator::new(),
        }
    }

    /// The seeded permission catalog, for role editors.
    pub async fn permission_catalog(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<Vec<permission::Model>> {
        self.access.require(&ctx.profile, perms::VIEW_ROLES).await?;
        self.role_repo.permission_catalog().await
    }

    /// Roles of the context's organization with their codenames.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<RoleWithPermissions>> {
        self.access.require(&ctx.profile, perms::VIEW_ROLES).await?;

        let roles = self.role_repo.list_by_org(&ctx.organization.id).await?;
        let mut out = Vec::with_capacity(roles.len());
        for role in roles {
            let mut permissions: Vec<String> = self
                .role_repo
                .permission_codenames(&role.id)
                .await?
                .into_iter()
                .collect();
            permissions.sort();
            out.push(RoleWithPermissions { role, permissions });
        }
        Ok(out)
    }

    /// Fetch one role within the context's organization.
    pub async fn get(&self, ctx: &RequestContext, id: &str) -> AppResult<RoleWithPermissions> {
        self.access.require(&ctx.profile, perms::VIEW_ROLES).await?;

        let role = self
            .role_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("role not found".to_string()))?;
        let mut permissions: Vec<String> = self
            .role_repo
            .permission_codenames(&role.id)
            .await?
            .into_iter()
            .collect();
        permissions.sort();
        Ok(RoleWithPermissions { role, permissions })
    }

    /// Create a role and grant its permissions.
    pub async fn create(&self, ctx: &RequestContext, input: RoleInput) -> AppResult<role::Model> {
        self.access
            .require(&ctx.profile, perms::CREATE_ROLE)
            .await?;
        input.validate()?;

        let now = Utc::now();
        let model = role::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(ctx.organization.id.clone()),
            name: Set(input.name),
            description: Set(input.description),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = self.role_repo.create(model).await?;

        let permission_ids = self.role_repo.permission_ids_for(&input.permissions).await?;
        self.role_repo
            .set_permissions(&created.id, &permission_ids)
            .await?;

        Ok(created)
    }

    /// Update a role and replace its permission grants.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: RoleInput,
    ) -> AppResult<role::Model> {
        self.access
            .require(&ctx.profile, perms::CREATE_ROLE)
            .await?;
        input.validate()?;

        let existing = self
            .role_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("role not found".to_string()))?;

        let mut active: role::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.updated_at = Set(Utc::now().into());
        let updated = self.role_repo.update(active).await?;

        let permission_ids = self.role_repo.permission_ids_for(&input.permissions).await?;
        self.role_repo
            .set_permissions(&updated.id, &permission_ids)
            .await?;

        Ok(updated)
    }

    /// Delete a role. Profiles holding it fall back to no role, which
    /// fails closed on every permission check.
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::CREATE_ROLE)
            .await?;

        let existing = self
            .role_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("role not found".to_string()))?;
        self.role_repo.delete(&existing.id).await
    }
}
