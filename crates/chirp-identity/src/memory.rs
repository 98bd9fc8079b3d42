//! In-memory user store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use chirp_types::{User, UserId};

use crate::error::IdentityError;
use crate::store::{AccountCredentials, NewUser, UserStore};

/// Account map, email index, hashes, and the id counter; one lock.
#[derive(Debug)]
struct UserState {
    users: HashMap<UserId, User>,
    hashes: HashMap<UserId, String>,
    by_email: HashMap<String, UserId>,
    next_id: i64,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
            hashes: HashMap::new(),
            by_email: HashMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory realization of [`UserStore`].
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    state: RwLock<UserState>,
}

impl InMemoryUserStore {
    /// Create an empty user store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User, IdentityError> {
        let mut state = self.state.write().await;

        if state.by_email.contains_key(&new_user.email) {
            return Err(IdentityError::EmailTaken);
        }

        let id = UserId::new(state.next_id);
        state.next_id = state
            .next_id
            .checked_add(1)
            .ok_or_else(|| IdentityError::Internal(String::from("user id space exhausted")))?;

        let user = User {
            id,
            name: new_user.name,
            email: new_user.email.clone(),
            profile: new_user.profile,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(id, user.clone());
        state.hashes.insert(id, new_user.password_hash);
        state.by_email.insert(new_user.email, id);
        Ok(user)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, IdentityError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn get_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountCredentials>, IdentityError> {
        let state = self.state.read().await;

        let Some(id) = state.by_email.get(email) else {
            return Ok(None);
        };
        let user = state.users.get(id).cloned();
        let hash = state.hashes.get(id).cloned();
        match (user, hash) {
            (Some(user), Some(password_hash)) => Ok(Some(AccountCredentials {
                user,
                password_hash,
            })),
            _ => Err(IdentityError::Internal(String::from(
                "email index desynchronized from user map",
            ))),
        }
    }
}
