use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateUserRequest, PublicUser, UpdateUserRequest},
    repo_types::Role,
    services::UserService,
};
use crate::{
    auth::{
        claims::Claims,
        extractors::{AdminOnly, AuthUser, RequireRole},
    },
    error::{AppError, AppResult},
    state::AppState,
    validation::{PathId, ValidatedJson},
};

/// JWT required on every route; create and delete additionally require admin.
/// Update is limited to the account itself unless the caller is an admin.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

#[instrument(skip_all)]
pub async fn get_users(
    State(users): State<UserService>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<PublicUser>>> {
    Ok(Json(users.get_all_users().await?))
}

#[instrument(skip_all)]
pub async fn get_user(
    State(users): State<UserService>,
    _auth: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<PublicUser>> {
    Ok(Json(users.get_user_by_id(id).await?))
}

#[instrument(skip_all)]
pub async fn create_user(
    State(users): State<UserService>,
    admin: RequireRole<AdminOnly>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    let user = users.create_user(payload).await?;
    info!(admin_id = %admin.0.sub, user_id = %user.id, "user created by admin");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip_all)]
pub async fn update_user(
    State(users): State<UserService>,
    AuthUser(caller): AuthUser,
    PathId(id): PathId,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<PublicUser>> {
    authorize_update(&caller, id, &payload)?;
    Ok(Json(users.update_user(id, payload).await?))
}

#[instrument(skip_all)]
pub async fn delete_user(
    State(users): State<UserService>,
    admin: RequireRole<AdminOnly>,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    users.delete_user(id).await?;
    info!(admin_id = %admin.0.sub, user_id = %id, "user deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}

/// Non-admins may only edit their own account and never their role.
fn authorize_update(caller: &Claims, target: Uuid, payload: &UpdateUserRequest) -> AppResult<()> {
    if caller.role == Role::Admin {
        return Ok(());
    }
    if caller.sub != target {
        warn!(caller = %caller.sub, %target, "update of another user refused");
        return Err(AppError::Forbidden(
            "You can only update your own account".into(),
        ));
    }
    if payload.role.is_some() {
        warn!(caller = %caller.sub, "role change by non-admin refused");
        return Err(AppError::Forbidden("Only admins can change roles".into()));
    }
    Ok(())
}
