//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use opsboard_core::RequestContext;

/// Authenticated request context extractor.
///
/// The context is resolved from the bearer token by the auth middleware
/// and stashed in request extensions; handlers that take this extractor
/// reject unauthenticated requests.
#[derive(Debug, Clone)]
pub struct Ctx(pub RequestContext);

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(Ctx)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}
