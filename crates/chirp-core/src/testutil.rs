//! Test doubles shared by the core unit tests.

use std::collections::HashSet;

use async_trait::async_trait;

use chirp_types::{UserId, UserRecord};

use crate::error::CoreError;
use crate::store::UserDirectory;

/// A user directory backed by a fixed set of ids.
pub(crate) struct StaticDirectory {
    users: HashSet<UserId>,
}

impl StaticDirectory {
    /// Build a directory where exactly the given ids exist.
    pub(crate) fn with_users(ids: &[i64]) -> Self {
        Self {
            users: ids.iter().copied().map(UserId::new).collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn exists(&self, id: UserId) -> Result<bool, CoreError> {
        Ok(self.users.contains(&id))
    }

    async fn get(&self, id: UserId) -> Result<Option<UserRecord>, CoreError> {
        Ok(self.users.get(&id).map(|found| UserRecord {
            id: *found,
            name: format!("user{found}"),
            email: format!("user{found}@example.com"),
            profile: String::new(),
        }))
    }
}
