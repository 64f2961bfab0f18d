//! Activity log side effects.

use chrono::Utc;
use opsboard_common::IdGenerator;
use opsboard_db::entities::activity_log::{self, ActivityAction};
use opsboard_db::repositories::ActivityLogRepository;
use sea_orm::Set;

use crate::services::context::RequestContext;

/// Activity log service.
///
/// `record` never fails from the caller's perspective: a mutation must
/// not be rolled back because its audit write failed, so database errors
/// are logged and swallowed.
#[derive(Clone)]
pub struct ActivityLogService {
    activity_repo: ActivityLogRepository,
    id_gen: IdGenerator,
}

impl ActivityLogService {
    /// Create a new activity log service.
    #[must_use]
    pub const fn new(activity_repo: ActivityLogRepository) -> Self {
        Self {
            activity_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append one audit row describing what the context's profile did.
    pub async fn record(
        &self,
        ctx: &RequestContext,
        action: ActivityAction,
        entity_type: &str,
        entity_id: Option<&str>,
        entity_name: Option<&str>,
        details: Option<String>,
    ) {
        let row = activity_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(ctx.organization.id.clone()),
            actor_id: Set(Some(ctx.profile.id.clone())),
            action: Set(action),
            entity_type: Set(entity_type.to_string()),
            entity_id: Set(entity_id.map(ToString::to_string)),
            entity_name: Set(entity_name.map(ToString::to_string)),
            details: Set(details),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = self.activity_repo.append(row).await {
            tracing::warn!(error = %e, entity_type, "failed to record activity");
        }
    }

    /// Most recent activity of the context's organization.
    pub async fn recent(
        &self,
        ctx: &RequestContext,
        limit: u64,
    ) -> opsboard_common::AppResult<Vec<activity_log::Model>> {
        self.activity_repo.recent(&ctx.organization.id, limit).await
    }
}
