//! Organization administration.

use chrono::Utc;
use sea_orm::Set;
use validator::Validate;

use opsboard_common::{AppError, AppResult, IdGenerator};
use opsboard_db::entities::organization;
use opsboard_db::repositories::OrganizationRepository;

use crate::services::access::{perms, AccessService};
use crate::services::context::RequestContext;

/// Input for creating or updating an organization.
#[derive(Debug, Clone, Validate, serde::Deserialize)]
pub struct OrganizationInput {
    /// Display name, unique across the system.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Short code, unique across the system.
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    #[validate(email)]
    pub email: Option<String>,
    /// Public website.
    #[validate(url)]
    pub website: Option<String>,
}

/// Organization service.
#[derive(Clone)]
pub struct OrganizationService {
    org_repo: OrganizationRepository,
    access: AccessService,
    id_gen: IdGenerator,
}

impl OrganizationService {
    /// Create a new organization service.
    #[must_use]
    pub const fn new(org_repo: OrganizationRepository, access: AccessService) -> Self {
        Self {
            org_repo,
            access,
            id_gen: IdGenerator::new(),
        }
    }

    /// Active organizations, for the organization switcher.
    pub async fn list_active(&self) -> AppResult<Vec<organization::Model>> {
        self.org_repo.list_active().await
    }

    /// Fetch one organization.
    pub async fn get(&self, id: &str) -> AppResult<organization::Model> {
        self.org_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("organization not found".to_string()))
    }

    /// Create an organization.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: OrganizationInput,
    ) -> AppResult<organization::Model> {
        self.access
            .require(&ctx.profile, perms::MANAGE_SETTINGS)
            .await?;
        input.validate()?;

        if self.org_repo.find_by_code(&input.code).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "organization code '{}' is taken",
                input.code
            )));
        }

        let now = Utc::now();
        let model = organization::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            code: Set(input.code),
            address: Set(input.address),
            phone: Set(input.phone),
            email: Set(input.email),
            website: Set(input.website),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        self.org_repo.create(model).await
    }

    /// Update an organization's profile fields.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: OrganizationInput,
    ) -> AppResult<organization::Model> {
        self.access
            .require(&ctx.profile, perms::MANAGE_SETTINGS)
            .await?;
        input.validate()?;

        let existing = self.get(id).await?;
        let mut active: organization::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.code = Set(input.code);
        active.address = Set(input.address);
        active.phone = Set(input.phone);
        active.email = Set(input.email);
        active.website = Set(input.website);
        active.updated_at = Set(Utc::now().into());
        self.org_repo.update(active).await
    }

    /// Deactivate an organization. Data is retained; the org simply stops
    /// resolving for logins and switching.
    pub async fn deactivate(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::MANAGE_SETTINGS)
            .await?;

        let existing = self.get(id).await?;
        let mut active: organization::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        self.org_repo.update(active).await?;
        Ok(())
    }
}
