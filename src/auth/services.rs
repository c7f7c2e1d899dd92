use axum::extract::FromRef;
use tracing::{info, instrument, warn};

use super::{
    dto::{LoginRequest, LoginResponse, RegisterRequest},
    jwt::JwtKeys,
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::{dto::PublicUser, services::UserService},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Registration and login on top of [`UserService`] and [`JwtKeys`].
#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    keys: JwtKeys,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(UserService::from_ref(state), JwtKeys::from_ref(state))
    }
}

impl AuthService {
    pub fn new(users: UserService, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    /// The email pre-check gives a clean conflict; the store's unique
    /// constraint still catches a concurrent registration.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterRequest) -> AppResult<PublicUser> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            warn!("email already registered");
            return Err(AppError::Conflict(format!(
                "The email {} already exists.",
                input.email.trim()
            )));
        }
        let user = self.users.create_user(input.into()).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Unknown email and wrong password fail identically.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginRequest) -> AppResult<LoginResponse> {
        let Some(user) = self.users.find_by_email(&input.email).await? else {
            warn!("login unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        let ok = self
            .users
            .hasher()
            .verify(&input.password, &user.password)
            .await
            .map_err(|e| AppError::internal("Failed to verify credentials", e))?;
        if !ok {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let access_token = self
            .keys
            .sign(&user)
            .map_err(|e| AppError::internal("Failed to issue token", e))?;

        info!(user_id = %user.id, "user logged in");
        Ok(LoginResponse { access_token })
    }
}
