use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{claims::Claims, jwt::JwtKeys};
use crate::{error::AppError, users::Role};

/// Verified bearer token. Any authenticated principal passes.
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.0.role)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        Ok(AuthUser(claims))
    }
}

/// Role set a route demands.
pub trait RoleRequirement {
    const ALLOWED: &'static [Role];
}

pub struct AdminOnly;

impl RoleRequirement for AdminOnly {
    const ALLOWED: &'static [Role] = &[Role::Admin];
}

/// [`AuthUser`] whose `role` claim is in `R::ALLOWED`; otherwise 403.
pub struct RequireRole<R: RoleRequirement>(pub Claims, PhantomData<R>);

#[async_trait]
impl<S, R> FromRequestParts<S> for RequireRole<R>
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
    R: RoleRequirement + Send + Sync + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.has_any_role(R::ALLOWED) {
            warn!(user_id = %user.0.sub, role = ?user.0.role, "insufficient role");
            return Err(AppError::Forbidden(
                "You do not have permission to access this resource".into(),
            ));
        }
        Ok(RequireRole(user.0, PhantomData))
    }
}
