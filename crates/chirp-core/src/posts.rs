//! Post creation, ownership-gated mutation, and author queries.
//!
//! [`Posts`] implements the post contract once, against the
//! [`PostStore`] trait. Content rules come from [`crate::policy`]; the
//! ownership guard runs before any mutation so a non-owner can never
//! alter stored state.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use chirp_types::{Post, PostId, UserId};

use crate::error::CoreError;
use crate::policy;
use crate::store::{PostStore, UserDirectory};

/// The post service.
#[derive(Clone)]
pub struct Posts {
    store: Arc<dyn PostStore>,
    directory: Arc<dyn UserDirectory>,
}

impl Posts {
    /// Create a post service over the given store and directory.
    pub fn new(store: Arc<dyn PostStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { store, directory }
    }

    /// Create a post. Checks run as: author id present, content valid,
    /// author resolves; then the store assigns a fresh id.
    ///
    /// # Errors
    ///
    /// [`CoreError::Validation`] or [`CoreError::NotFound`], per the
    /// order above.
    pub async fn create(&self, author: UserId, content: &str) -> Result<Post, CoreError> {
        if !author.is_assigned() {
            return Err(CoreError::Validation(String::from("user_id is required")));
        }
        policy::validate_content(content)?;
        if !self.directory.exists(author).await? {
            return Err(CoreError::NotFound(String::from("user")));
        }

        let post = self
            .store
            .insert(author, content.to_owned(), Utc::now())
            .await?;

        info!(post_id = %post.id, %author, "post created");
        Ok(post)
    }

    /// Edit a post's content. Only the author may edit; `author` and
    /// `created_at` never change.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] for an unknown post,
    /// [`CoreError::Unauthorized`] when `acting` is not the author, then
    /// [`CoreError::Validation`] for bad content -- in that order.
    pub async fn update(
        &self,
        post_id: PostId,
        acting: UserId,
        content: &str,
    ) -> Result<Post, CoreError> {
        let post = self
            .store
            .get(post_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(String::from("post")))?;
        policy::authorize_mutation(acting, post.author)?;
        policy::validate_content(content)?;

        let updated = self
            .store
            .update(post_id, content.to_owned(), Utc::now())
            .await?;

        info!(%post_id, %acting, "post updated");
        Ok(updated)
    }

    /// Delete a post. Same ownership gate as [`Posts::update`]; removes
    /// the post from the primary index and the author's list.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] or [`CoreError::Unauthorized`].
    pub async fn delete(&self, post_id: PostId, acting: UserId) -> Result<(), CoreError> {
        let post = self
            .store
            .get(post_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(String::from("post")))?;
        policy::authorize_mutation(acting, post.author)?;

        self.store.remove(post_id).await?;

        info!(%post_id, %acting, "post deleted");
        Ok(())
    }

    /// All posts by one author, newest first.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if the author does not resolve.
    pub async fn by_author(&self, author: UserId) -> Result<Vec<Post>, CoreError> {
        if !self.directory.exists(author).await? {
            return Err(CoreError::NotFound(String::from("user")));
        }
        self.store.by_author(author).await
    }
}
