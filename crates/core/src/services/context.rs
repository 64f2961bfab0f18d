//! Session-token resolution into a request context.

use opsboard_common::{AppError, AppResult};
use opsboard_db::entities::{organization, outlet, user_profile};
use opsboard_db::repositories::{
    OrganizationRepository, OutletRepository, SessionRepository, UserProfileRepository,
};

/// Everything downstream code needs to know about the caller: who they
/// are, which organization they are working in, and which outlet (if any)
/// narrows their view.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Session token the context was resolved from.
    pub token: String,
    /// The authenticated profile.
    pub profile: user_profile::Model,
    /// The working organization.
    pub organization: organization::Model,
    /// The selected outlet. `None` means "all outlets": list queries
    /// apply no outlet filter, never "match null outlet".
    pub outlet: Option<outlet::Model>,
}

impl RequestContext {
    /// Outlet id to filter lists by, when one is selected.
    #[must_use]
    pub fn outlet_filter(&self) -> Option<String> {
        self.outlet.as_ref().map(|o| o.id.clone())
    }
}

/// Context service: resolves tokens and manages the working org/outlet.
#[derive(Clone)]
pub struct ContextService {
    session_repo: SessionRepository,
    profile_repo: UserProfileRepository,
    org_repo: OrganizationRepository,
    outlet_repo: OutletRepository,
}

impl ContextService {
    /// Create a new context service.
    #[must_use]
    pub const fn new(
        session_repo: SessionRepository,
        profile_repo: UserProfileRepository,
        org_repo: OrganizationRepository,
        outlet_repo: OutletRepository,
    ) -> Self {
        Self {
            session_repo,
            profile_repo,
            org_repo,
            outlet_repo,
        }
    }

    /// Resolve a bearer token into a [`RequestContext`].
    ///
    /// Sessions created before the profile was assigned a home org have no
    /// organization on record; the profile's home org is persisted back in
    /// that case.
    pub async fn resolve(&self, token: &str) -> AppResult<RequestContext> {
        let session = self
            .session_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        let profile = self
            .profile_repo
            .find_by_id(&session.profile_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(AppError::Unauthenticated)?;

        let org_id = match &session.organization_id {
            Some(id) => id.clone(),
            None => {
                let home = profile.organization_id.clone();
                self.session_repo.set_organization(token, &home).await?;
                home
            }
        };

        let organization = self
            .org_repo
            .find_by_id(&org_id)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        let outlet = match &session.outlet_id {
            Some(outlet_id) => self.outlet_repo.find_in_org(outlet_id, &org_id).await?,
            None => None,
        };

        Ok(RequestContext {
            token: token.to_string(),
            profile,
            organization,
            outlet,
        })
    }

    /// Switch the session to another organization, clearing the selected
    /// outlet.
    pub async fn switch_organization(&self, token: &str, org_id: &str) -> AppResult<()> {
        let org = self
            .org_repo
            .find_by_id(org_id)
            .await?
            .filter(|o| o.is_active)
            .ok_or_else(|| AppError::NotFound("organization not found".to_string()))?;

        self.session_repo.set_organization(token, &org.id).await
    }

    /// Select an outlet within the session's current organization.
    pub async fn switch_outlet(&self, ctx: &RequestContext, outlet_id: &str) -> AppResult<()> {
        let outlet = self
            .outlet_repo
            .find_in_org(outlet_id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("outlet not found".to_string()))?;

        self.session_repo
            .set_outlet(&ctx.token, Some(&outlet.id))
            .await
    }

    /// Return the session to the "all outlets" view.
    pub async fn clear_outlet(&self, ctx: &RequestContext) -> AppResult<()> {
        self.session_repo.set_outlet(&ctx.token, None).await
    }
}
