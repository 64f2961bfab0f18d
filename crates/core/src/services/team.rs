//! Team administration.

use chrono::Utc;
use sea_orm::Set;
use validator::Validate;

use opsboard_common::{AppError, AppResult, IdGenerator};
use opsboard_db::entities::team;
use opsboard_db::repositories::TeamRepository;

use crate::services::access::{perms, AccessService};
use crate::services::context::RequestContext;

/// Input for creating or updating a team.
#[derive(Debug, Clone, Validate, serde::Deserialize)]
pub struct TeamInput {
    /// Name, unique within the organization.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
}

/// Team service.
#[derive(Clone)]
pub struct TeamService {
    team_repo: TeamRepository,
    access: AccessService,
    id_gen: IdGenerator,
}

impl TeamService {
    /// Create a new team service.
    #[must_use]
    pub const fn new(team_repo: TeamRepository, access: AccessService) -> Self {
        Self {
            team_repo,
            access,
            id_gen: IdGenerator::new(),
        }
    }

    /// Teams of the context's organization.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<team::Model>> {
        self.team_repo.list_by_org(&ctx.organization.id).await
    }

    /// Fetch one team within the context's organization.
    pub async fn get(&self, ctx: &RequestContext, id: &str) -> AppResult<team::Model> {
        self.team_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("team not found".to_string()))
    }

    /// Create a team in the context's organization.
    pub async fn create(&self, ctx: &RequestContext, input: TeamInput) -> AppResult<team::Model> {
        self.access
            .require(&ctx.profile, perms::MANAGE_SETTINGS)
            .await?;
        input.validate()?;

        let now = Utc::now();
        let model = team::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(ctx.organization.id.clone()),
            name: Set(input.name),
            description: Set(input.description),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        self.team_repo.create(model).await
    }

    /// Update a team.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: TeamInput,
    ) -> AppResult<team::Model> {
        self.access
            .require(&ctx.profile, perms::MANAGE_SETTINGS)
            .await?;
        input.validate()?;

        let existing = self.get(ctx, id).await?;
        let mut active: team::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.updated_at = Set(Utc::now().into());
        self.team_repo.update(active).await
    }

    /// Delete a team. Members fall back to no team via the foreign key.
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::MANAGE_SETTINGS)
            .await?;

        let existing = self.get(ctx, id).await?;
        self.team_repo.delete(&existing.id).await
    }
}
