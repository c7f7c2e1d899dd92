use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    repo::{StoreError, UserStore},
    repo_types::{NewUser, User, UserChanges},
};

/// In-process [`UserStore`] with the same uniqueness and not-found signals
/// as the Postgres store.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
        users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn insert(users: &mut HashMap<Uuid, User>, new: NewUser) -> User {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password: new.password_hash,
            role: new.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        user
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if Self::email_taken(&users, &new.email, None) {
            return Err(StoreError::UniqueViolation("users_email_key".into()));
        }
        Ok(Self::insert(&mut users, new))
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if let Some(email) = &changes.email {
            if Self::email_taken(&users, email, Some(id)) {
                return Err(StoreError::UniqueViolation("users_email_key".into()));
            }
        }
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password = hash;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.users
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn insert_if_absent(&self, new: NewUser) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().unwrap();
        if Self::email_taken(&users, &new.email, None) {
            return Ok(None);
        }
        Ok(Some(Self::insert(&mut users, new)))
    }
}
