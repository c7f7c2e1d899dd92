use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateUserRequest, PublicUser, UpdateUserRequest},
    repo::{StoreError, UserStore},
    repo_types::{NewUser, User, UserChanges},
};
use crate::{
    auth::password::CredentialHasher,
    error::{AppError, AppResult},
    state::AppState,
    validation::normalize_email,
};

/// User CRUD on top of a [`UserStore`]. Every returned user is a [`PublicUser`].
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: CredentialHasher,
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.hasher)
    }
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    pub fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    #[instrument(skip(self))]
    pub async fn get_all_users(&self) -> AppResult<Vec<PublicUser>> {
        let users = self
            .store
            .find_all()
            .await
            .map_err(|e| AppError::internal("Something went wrong while listing users!", e))?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, id: Uuid) -> AppResult<PublicUser> {
        match self.store.find_by_id(id).await {
            Ok(Some(user)) => Ok(user.into()),
            Ok(None) => Err(AppError::user_not_found(id)),
            Err(e) => Err(AppError::internal(
                "Something went wrong while fetching the user!",
                e,
            )),
        }
    }

    /// Stored record including the hash. Never hand this to a client.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.store
            .find_by_email(&normalize_email(email))
            .await
            .map_err(|e| AppError::internal("Something went wrong while fetching the user!", e))
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUserRequest) -> AppResult<PublicUser> {
        let new = self.new_user(input).await?;
        match self.store.create(new).await {
            Ok(user) => {
                info!(user_id = %user.id, role = ?user.role, "user created");
                Ok(user.into())
            }
            Err(StoreError::UniqueViolation(constraint)) => {
                warn!(%constraint, "duplicate user");
                Err(AppError::Conflict("Email already exists!".into()))
            }
            Err(e) => Err(AppError::internal(
                "Something went wrong while creating the user!",
                e,
            )),
        }
    }

    /// Creates the user unless the email is already registered.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_if_absent(&self, input: CreateUserRequest) -> AppResult<Option<PublicUser>> {
        let new = self.new_user(input).await?;
        self.store
            .insert_if_absent(new)
            .await
            .map(|created| created.map(PublicUser::from))
            .map_err(|e| AppError::internal("Something went wrong while creating the user!", e))
    }

    #[instrument(skip(self, partial))]
    pub async fn update_user(&self, id: Uuid, partial: UpdateUserRequest) -> AppResult<PublicUser> {
        let password_hash = match partial.password {
            Some(plain) => Some(self.hash(&plain).await?),
            None => None,
        };
        let changes = UserChanges {
            username: partial.username,
            email: partial.email.as_deref().map(normalize_email),
            password_hash,
            role: partial.role,
        };
        match self.store.update(id, changes).await {
            Ok(user) => {
                info!(user_id = %user.id, "user updated");
                Ok(user.into())
            }
            Err(StoreError::NotFound) => Err(AppError::user_not_found(id)),
            Err(StoreError::UniqueViolation(_)) => {
                Err(AppError::Conflict("Email already exists!".into()))
            }
            Err(e) => Err(AppError::internal(
                "Something went wrong while updating the user!",
                e,
            )),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        match self.store.delete(id).await {
            Ok(()) => {
                info!(user_id = %id, "user deleted");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(AppError::user_not_found(id)),
            Err(e) => Err(AppError::internal("Error deleting user", e)),
        }
    }

    async fn new_user(&self, input: CreateUserRequest) -> AppResult<NewUser> {
        Ok(NewUser {
            username: input.username,
            email: normalize_email(&input.email),
            password_hash: self.hash(&input.password).await?,
            role: input.role.unwrap_or_default(),
        })
    }

    async fn hash(&self, plain: &str) -> AppResult<String> {
        self.hasher
            .hash(plain)
            .await
            .map_err(|e| AppError::internal("Failed to hash password", e))
    }
}
