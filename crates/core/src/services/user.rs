//! User profile administration.

use chrono::Utc;
use sea_orm::Set;
use validator::Validate;

use opsboard_common::{AppError, AppResult, IdGenerator};
use opsboard_db::entities::user_profile;
use opsboard_db::repositories::{
    OutletRepository, RoleRepository, SessionRepository, TeamRepository, UserProfileRepository,
};

use crate::services::access::{perms, AccessService};
use crate::services::auth::hash_password;
use crate::services::context::RequestContext;

/// Input for creating a profile.
#[derive(Debug, Clone, Validate, serde::Deserialize)]
pub struct CreateUserInput {
    /// Login name, unique across the system.
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    /// Display name.
    #[validate(length(min = 1, message = "full name is required"))]
    pub full_name: String,
    /// Email address.
    #[validate(email)]
    pub email: Option<String>,
    /// Initial password. Accounts provisioned from the identity API
    /// leave this unset.
    pub password: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Department name.
    pub department: Option<String>,
    /// Job title.
    pub designation: Option<String>,
    /// Outlet assignment.
    pub outlet_id: Option<String>,
    /// Team assignment.
    pub team_id: Option<String>,
    /// Role assignment.
    pub role_id: Option<String>,
}

/// Input for updating a profile. `None` fields keep the current value.
#[derive(Debug, Clone, Default, Validate, serde::Deserialize)]
pub struct UpdateUserInput {
    /// Display name.
    pub full_name: Option<String>,
    /// Email address.
    #[validate(email)]
    pub email: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Department name.
    pub department: Option<String>,
    /// Job title.
    pub designation: Option<String>,
    /// Outlet assignment. `Some(None)` clears it.
    pub outlet_id: Option<Option<String>>,
    /// Team assignment.
    pub team_id: Option<Option<String>>,
    /// Role assignment.
    pub role_id: Option<Option<String>>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// User profile service.
#[derive(Clone)]
pub struct UserService {
    profile_repo: UserProfileRepository,
    session_repo: SessionRepository,
    outlet_repo: OutletRepository,
    team_repo: TeamRepository,
    role_repo: RoleRepository,
    access: AccessService,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        profile_repo: UserProfileRepository,
        session_repo: SessionRepository,
        outlet_repo: OutletRepository,
        team_repo: TeamRepository,
        role_repo: RoleRepository,
        access: AccessService,
    ) -> Self {
        Self {
            profile_repo,
            session_repo,
            outlet_repo,
            team_repo,
            role_repo,
            access,
            id_gen: IdGenerator::new(),
        }
    }

    /// Members of the context's organization.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<user_profile::Model>> {
        self.access.require(&ctx.profile, perms::VIEW_USERS).await?;
        self.profile_repo.list_by_org(&ctx.organization.id).await
    }

    /// Fetch one member of the context's organization.
    pub async fn get(&self, ctx: &RequestContext, id: &str) -> AppResult<user_profile::Model> {
        self.access.require(&ctx.profile, perms::VIEW_USERS).await?;
        self.profile_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }

    /// Create a profile in the context's organization.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateUserInput,
    ) -> AppResult<user_profile::Model> {
        self.access
            .require(&ctx.profile, perms::CREATE_USER)
            .await?;
        input.validate()?;

        if self
            .profile_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "username '{}' is taken",
                input.username
            )));
        }

        self.check_org_refs(ctx, input.outlet_id.as_deref(), input.team_id.as_deref(), input.role_id.as_deref())
            .await?;

        let password_hash = match &input.password {
            Some(p) => Some(hash_password(p)?),
            None => None,
        };

        let now = Utc::now();
        let model = user_profile::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username),
            email: Set(input.email),
            full_name: Set(input.full_name),
            password_hash: Set(password_hash),
            employee_id: Set(None),
            phone: Set(input.phone),
            department: Set(input.department),
            designation: Set(input.designation),
            points: Set(0),
            hr_data: Set(None),
            organization_id: Set(ctx.organization.id.clone()),
            outlet_id: Set(input.outlet_id),
            team_id: Set(input.team_id),
            role_id: Set(input.role_id),
            is_active: Set(true),
            last_login_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        self.profile_repo.create(model).await
    }

    /// Update a profile. Deactivating also revokes the user's sessions.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: UpdateUserInput,
    ) -> AppResult<user_profile::Model> {
        self.access.require(&ctx.profile, perms::EDIT_USER).await?;
        input.validate()?;

        let existing = self
            .profile_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        let outlet_ref = input.outlet_id.as_ref().and_then(|o| o.as_deref());
        let team_ref = input.team_id.as_ref().and_then(|t| t.as_deref());
        let role_ref = input.role_id.as_ref().and_then(|r| r.as_deref());
        self.check_org_refs(ctx, outlet_ref, team_ref, role_ref)
            .await?;

        let deactivating = input.is_active == Some(false) && existing.is_active;

        let mut active: user_profile::ActiveModel = existing.into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        if let Some(password) = input.password {
            active.password_hash = Set(Some(hash_password(&password)?));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(department) = input.department {
            active.department = Set(Some(department));
        }
        if let Some(designation) = input.designation {
            active.designation = Set(Some(designation));
        }
        if let Some(outlet_id) = input.outlet_id {
            active.outlet_id = Set(outlet_id);
        }
        if let Some(team_id) = input.team_id {
            active.team_id = Set(team_id);
        }
        if let Some(role_id) = input.role_id {
            active.role_id = Set(role_id);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = self.profile_repo.update(active).await?;

        if deactivating {
            self.session_repo.delete_for_profile(&updated.id).await?;
        }

        Ok(updated)
    }

    /// Outlet/team/role references must live in the context's org.
    async fn check_org_refs(
        &self,
        ctx: &RequestContext,
        outlet_id: Option<&str>,
        team_id: Option<&str>,
        role_id: Option<&str>,
    ) -> AppResult<()> {
        if let Some(id) = outlet_id {
            self.outlet_repo
                .find_in_org(id, &ctx.organization.id)
                .await?
                .ok_or_else(|| AppError::NotFound("outlet not found".to_string()))?;
        }
        if let Some(id) = team_id {
            self.team_repo
                .find_in_org(id, &ctx.organization.id)
                .await?
                .ok_or_else(|| AppError::NotFound("team not found".to_string()))?;
        }
        if let Some(id) = role_id {
            self.role_repo
                .find_in_org(id, &ctx.organization.id)
                .await?
                .ok_or_else(|| AppError::NotFound("role not found".to_string()))?;
        }
        Ok(())
    }
}
