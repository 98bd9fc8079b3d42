//! Adapter exposing a [`UserStore`] as the core's read-only directory.
//!
//! The social-graph core consumes accounts through
//! [`chirp_core::store::UserDirectory`] only -- existence and display
//! fields, never credentials. This adapter is the seam between the two
//! crates.

use std::sync::Arc;

use async_trait::async_trait;

use chirp_core::CoreError;
use chirp_core::store::UserDirectory;
use chirp_types::{UserId, UserRecord};

use crate::error::IdentityError;
use crate::store::UserStore;

/// [`UserDirectory`] over any [`UserStore`].
#[derive(Clone)]
pub struct StoreDirectory {
    store: Arc<dyn UserStore>,
}

impl StoreDirectory {
    /// Wrap a user store.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

/// Identity-store failures reaching the core are backend failures.
fn into_core(err: IdentityError) -> CoreError {
    CoreError::Internal(err.to_string())
}

#[async_trait]
impl UserDirectory for StoreDirectory {
    async fn exists(&self, id: UserId) -> Result<bool, CoreError> {
        self.store
            .get(id)
            .await
            .map(|user| user.is_some())
            .map_err(into_core)
    }

    async fn get(&self, id: UserId) -> Result<Option<UserRecord>, CoreError> {
        self.store
            .get(id)
            .await
            .map(|user| user.map(|found| found.record()))
            .map_err(into_core)
    }
}
