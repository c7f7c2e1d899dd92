use axum::extract::FromRef;
use tracing::info;

use crate::{
    state::AppState,
    users::{dto::CreateUserRequest, services::UserService, Role},
};

/// Creates the configured admin account if its email is not registered yet.
/// An existing account is left as is.
pub async fn seed_admin(state: &AppState) -> anyhow::Result<()> {
    let Some(seed) = state.config.admin_seed.clone() else {
        return Ok(());
    };

    let users = UserService::from_ref(state);
    let created = users
        .create_if_absent(CreateUserRequest {
            username: seed.username,
            email: seed.email.clone(),
            password: seed.password,
            role: Some(Role::Admin),
        })
        .await?;

    match created {
        Some(admin) => info!(user_id = %admin.id, email = %admin.email, "admin user seeded"),
        None => info!(email = %seed.email, "admin user already present"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdminSeed, AppConfig};
    use crate::users::repo::UserStore;
    use std::sync::Arc;

    fn state_with_seed() -> AppState {
        let base = AppState::fake();
        let config = AppConfig {
            admin_seed: Some(AdminSeed {
                username: "admin".into(),
                email: "admin@admin.com".into(),
                password: "admin123".into(),
            }),
            ..(*base.config).clone()
        };
        AppState::from_parts(Arc::new(config), base.store.clone())
    }

    #[tokio::test]
    async fn seeds_admin_once() {
        let state = state_with_seed();
        seed_admin(&state).await.unwrap();
        seed_admin(&state).await.unwrap();

        let all = state.store.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].role, Role::Admin);
        assert!(all[0].password.starts_with("$2"));
    }

    #[tokio::test]
    async fn no_seed_configured_is_noop() {
        let state = AppState::fake();
        seed_admin(&state).await.unwrap();
        assert!(state.store.find_all().await.unwrap().is_empty());
    }
}
