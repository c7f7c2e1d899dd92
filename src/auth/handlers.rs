use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use super::{
    dto::{LoginRequest, LoginResponse, RegisterRequest},
    services::AuthService,
};
use crate::{
    error::AppResult, state::AppState, users::dto::PublicUser, validation::ValidatedJson,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip_all)]
pub async fn register(
    State(auth): State<AuthService>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    let user = auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip_all)]
pub async fn login(
    State(auth): State<AuthService>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    Ok(Json(auth.login(payload).await?))
}
