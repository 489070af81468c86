use std::marker::PhantomData;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::access::models::Identity;
use crate::domain::permission::models::RequiredPermission;
use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Identity attached by the authentication middleware.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(|| {
                ApiError::InternalServerError(
                    "identity missing from request context, authenticate middleware not installed"
                        .to_string(),
                )
            })
    }
}

/// Guard that admits only activated users holding `P::CODE`.
///
/// Runs before the handler body, so a rejected request never touches
/// protected data.
#[derive(Debug, Clone)]
pub struct RequirePermission<P: RequiredPermission> {
    pub user: User,
    _permission: PhantomData<P>,
}

#[async_trait]
impl<P> FromRequestParts<AppState> for RequirePermission<P>
where
    P: RequiredPermission,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentIdentity(identity) = CurrentIdentity::from_request_parts(parts, state).await?;

        let user = state
            .authorizer
            .require_permission(P::CODE, &identity)
            .await?;

        Ok(Self {
            user,
            _permission: PhantomData,
        })
    }
}
