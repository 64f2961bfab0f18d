//! Outlet administration.

use chrono::Utc;
use sea_orm::Set;
use validator::Validate;

use opsboard_common::{AppError, AppResult, IdGenerator};
use opsboard_db::entities::activity_log::ActivityAction;
use opsboard_db::entities::outlet;
use opsboard_db::repositories::OutletRepository;

use crate::services::access::{perms, AccessService};
use crate::services::activity::ActivityLogService;
use crate::services::context::RequestContext;

/// Input for creating or updating an outlet.
#[derive(Debug, Clone, Validate, serde::Deserialize)]
pub struct OutletInput {
    /// Name, unique within the organization.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Optional short code.
    pub code: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    #[validate(email)]
    pub email: Option<String>,
}

/// Outlet service.
#[derive(Clone)]
pub struct OutletService {
    outlet_repo: OutletRepository,
    access: AccessService,
    activity: ActivityLogService,
    id_gen: IdGenerator,
}

impl OutletService {
    /// Create a new outlet service.
    #[must_use]
    pub const fn new(
        outlet_repo: OutletRepository,
        access: AccessService,
        activity: ActivityLogService,
    ) -> Self {
        Self {
            outlet_repo,
            access,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Outlets of the context's organization.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<outlet::Model>> {
        self.outlet_repo.list_by_org(&ctx.organization.id).await
    }

    /// Fetch one outlet within the context's organization.
    pub async fn get(&self, ctx: &RequestContext, id: &str) -> AppResult<outlet::Model> {
        self.outlet_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("outlet not found".to_string()))
    }

    /// Create an outlet in the context's organization.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: OutletInput,
    ) -> AppResult<outlet::Model> {
        self.access
            .require(&ctx.profile, perms::MANAGE_OUTLETS)
            .await?;
        input.validate()?;

        let now = Utc::now();
        let model = outlet::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(ctx.organization.id.clone()),
            name: Set(input.name),
            code: Set(input.code),
            address: Set(input.address),
            phone: Set(input.phone),
            email: Set(input.email),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = self.outlet_repo.create(model).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Created,
                "outlet",
                Some(&created.id),
                Some(&created.name),
                None,
            )
            .await;

        Ok(created)
    }

    /// Update an outlet.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: OutletInput,
    ) -> AppResult<outlet::Model> {
        self.access
            .require(&ctx.profile, perms::MANAGE_OUTLETS)
            .await?;
        input.validate()?;

        let existing = self.get(ctx, id).await?;
        let mut active: outlet::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.code = Set(input.code);
        active.address = Set(input.address);
        active.phone = Set(input.phone);
        active.email = Set(input.email);
        active.updated_at = Set(Utc::now().into());
        let updated = self.outlet_repo.update(active).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Updated,
                "outlet",
                Some(&updated.id),
                Some(&updated.name),
                None,
            )
            .await;

        Ok(updated)
    }

    /// Delete an outlet. Tasks and profiles pointing at it fall back to
    /// null via the foreign key.
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::MANAGE_OUTLETS)
            .await?;

        let existing = self.get(ctx, id).await?;
        self.outlet_repo.delete(&existing.id).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Deleted,
                "outlet",
                Some(&existing.id),
                Some(&existing.name),
                None,
            )
            .await;

        Ok(())
    }
}
