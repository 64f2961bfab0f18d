//! Login, logout and credential handling.
//!
//! Login first consults the HR identity API when configured; any failure
//! there falls back to the local argon2 credential check. The two paths
//! share one generic failure so callers cannot distinguish "unknown user"
//! from "identity API down".

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use opsboard_common::config::IdentityConfig;
use opsboard_common::{AppError, AppResult, IdGenerator};
use opsboard_db::entities::activity_log::{self, ActivityAction};
use opsboard_db::entities::{session, user_profile};
use opsboard_db::repositories::{
    ActivityLogRepository, OrganizationRepository, SessionRepository, UserProfileRepository,
};
use sea_orm::Set;

use crate::services::context::RequestContext;

/// Employee record returned by the HR identity API.
#[derive(Debug, Clone, Deserialize)]
pub struct HrEmployee {
    /// Employee id, the upsert key.
    pub employee_id: String,
    /// Full name.
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Department name.
    #[serde(default)]
    pub department: Option<String>,
    /// Job title.
    #[serde(default)]
    pub designation: Option<String>,
    /// Organization short code, used to place new accounts.
    #[serde(default)]
    pub organization_code: Option<String>,
}

/// Client for the HR identity API.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    config: IdentityConfig,
}

impl IdentityClient {
    /// Build a client from configuration.
    pub fn new(config: IdentityConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Submit credentials. Any transport, HTTP or decode failure maps to
    /// `ExternalService`; the caller treats all of them as "try local".
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<HrEmployee> {
        let url = self
            .config
            .login_url
            .as_deref()
            .ok_or_else(|| AppError::Config("identity login_url not set".to_string()))?;

        let response = self
            .http
            .post(url)
            .json(&json!({ "identifier": identifier, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "identity API returned {}",
                response.status()
            )));
        }

        response
            .json::<HrEmployee>()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))
    }

    /// Whether the client should be consulted at all.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.config.enabled
    }
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated profile.
    pub profile: user_profile::Model,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    profile_repo: UserProfileRepository,
    session_repo: SessionRepository,
    org_repo: OrganizationRepository,
    activity_repo: ActivityLogRepository,
    identity: Option<IdentityClient>,
    id_gen: IdGenerator,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(
        profile_repo: UserProfileRepository,
        session_repo: SessionRepository,
        org_repo: OrganizationRepository,
        activity_repo: ActivityLogRepository,
        identity: Option<IdentityClient>,
    ) -> Self {
        Self {
            profile_repo,
            session_repo,
            org_repo,
            activity_repo,
            identity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Authenticate and open a session.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<LoginOutcome> {
        let profile = match self.try_identity_login(identifier, password).await {
            Some(profile) => profile,
            None => self.local_login(identifier, password).await?,
        };

        let token = self.id_gen.generate_token();
        let session = new_session(&token, &profile);
        self.session_repo.create(session).await?;

        let mut active: user_profile::ActiveModel = profile.clone().into();
        active.last_login_at = Set(Some(Utc::now().into()));
        let profile = self.profile_repo.update(active).await?;

        self.record_auth_activity(&profile, ActivityAction::Login).await;

        Ok(LoginOutcome { token, profile })
    }

    /// Close a session.
    pub async fn logout(&self, ctx: &RequestContext) -> AppResult<()> {
        self.session_repo.delete(&ctx.token).await?;
        self.record_auth_activity(&ctx.profile, ActivityAction::Logout)
            .await;
        Ok(())
    }

    /// Try the identity API. Returns `None` on any failure, leaving the
    /// local credential check as the fallback.
    async fn try_identity_login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Option<user_profile::Model> {
        let client = self.identity.as_ref().filter(|c| c.enabled())?;

        match client.login(identifier, password).await {
            Ok(employee) => match self.upsert_from_employee(employee).await {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!(error = %e, "identity upsert failed, trying local credentials");
                    None
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "identity API login failed, trying local credentials");
                None
            }
        }
    }

    /// Verify the locally stored argon2 hash.
    async fn local_login(&self, identifier: &str, password: &str) -> AppResult<user_profile::Model> {
        let profile = self
            .profile_repo
            .find_by_identifier(identifier)
            .await?
            .filter(|p| p.is_active)
            .ok_or(AppError::Unauthenticated)?;

        let hash = profile
            .password_hash
            .as_deref()
            .ok_or(AppError::Unauthenticated)?;

        if verify_password(password, hash) {
            Ok(profile)
        } else {
            Err(AppError::Unauthenticated)
        }
    }

    /// Create or refresh the profile for an identity-API employee.
    async fn upsert_from_employee(&self, employee: HrEmployee) -> AppResult<user_profile::Model> {
        if let Some(existing) = self
            .profile_repo
            .find_by_employee_id(&employee.employee_id)
            .await?
        {
            let mut active: user_profile::ActiveModel = existing.into();
            active.full_name = Set(employee.name.clone());
            active.email = Set(employee.email.clone());
            active.phone = Set(employee.phone.clone());
            active.department = Set(employee.department.clone());
            active.designation = Set(employee.designation.clone());
            active.hr_data = Set(serde_json::to_value(&HrSnapshot::from(&employee)).ok());
            active.updated_at = Set(Utc::now().into());
            return self.profile_repo.update(active).await;
        }

        let code = employee
            .organization_code
            .as_deref()
            .ok_or_else(|| AppError::Validation("employee has no organization code".to_string()))?;
        let org = self
            .org_repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("organization not found".to_string()))?;

        let now = Utc::now();
        let model = user_profile::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(employee.employee_id.clone()),
            email: Set(employee.email.clone()),
            full_name: Set(employee.name.clone()),
            password_hash: Set(None),
            employee_id: Set(Some(employee.employee_id.clone())),
            phone: Set(employee.phone.clone()),
            department: Set(employee.department.clone()),
            designation: Set(employee.designation.clone()),
            points: Set(0),
            hr_data: Set(serde_json::to_value(&HrSnapshot::from(&employee)).ok()),
            organization_id: Set(org.id),
            outlet_id: Set(None),
            team_id: Set(None),
            role_id: Set(None),
            is_active: Set(true),
            last_login_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        self.profile_repo.create(model).await
    }

    async fn record_auth_activity(&self, profile: &user_profile::Model, action: ActivityAction) {
        let row = activity_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(profile.organization_id.clone()),
            actor_id: Set(Some(profile.id.clone())),
            action: Set(action),
            entity_type: Set("session".to_string()),
            entity_id: Set(None),
            entity_name: Set(Some(profile.username.clone())),
            details: Set(None),
            created_at: Set(Utc::now().into()),
        };
        if let Err(e) = self.activity_repo.append(row).await {
            tracing::warn!(error = %e, "failed to record auth activity");
        }
    }
}

#[derive(serde::Serialize)]
struct HrSnapshot {
    employee_id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    department: Option<String>,
    designation: Option<String>,
}

impl From<&HrEmployee> for HrSnapshot {
    fn from(e: &HrEmployee) -> Self {
        Self {
            employee_id: e.employee_id.clone(),
            name: e.name.clone(),
            email: e.email.clone(),
            phone: e.phone.clone(),
            department: e.department.clone(),
            designation: e.designation.clone(),
        }
    }
}

/// Hash a password with argon2 and a fresh salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Build the session row a fresh login opens: the profile's home
/// organization and, when the profile has one, its home outlet.
fn new_session(token: &str, profile: &user_profile::Model) -> session::ActiveModel {
    session::ActiveModel {
        token: Set(token.to_string()),
        profile_id: Set(profile.id.clone()),
        organization_id: Set(Some(profile.organization_id.clone())),
        outlet_id: Set(profile.outlet_id.clone()),
        created_at: Set(Utc::now().into()),
    }
}

/// Verify a password against a stored argon2 hash.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("hunter2", "not-a-hash"));
    }

    fn test_profile(outlet_id: Option<&str>) -> user_profile::Model {
        user_profile::Model {
            id: "u1".to_string(),
            username: "alex".to_string(),
            email: None,
            full_name: "Test User".to_string(),
            password_hash: None,
            employee_id: None,
            phone: None,
            department: None,
            designation: None,
            points: 0,
            hr_data: None,
            organization_id: "org1".to_string(),
            outlet_id: outlet_id.map(str::to_string),
            team_id: None,
            role_id: None,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_new_session_seeds_home_org_and_outlet() {
        let session = new_session("tok", &test_profile(Some("out1")));

        assert_eq!(
            session.organization_id,
            Set(Some("org1".to_string()))
        );
        assert_eq!(session.outlet_id, Set(Some("out1".to_string())));
    }

    #[test]
    fn test_new_session_without_home_outlet() {
        let session = new_session("tok", &test_profile(None));

        assert_eq!(session.outlet_id, Set(None));
    }
}
