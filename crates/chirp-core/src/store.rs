//! The abstract store contract the core services are written against.
//!
//! Each trait covers one consistency domain (plus the read-only user
//! directory). Two realizations exist: the in-memory stores in
//! [`crate::memory`] and the `PostgreSQL` stores in `chirp-db`. Which one
//! a service uses is chosen at construction time; the service logic never
//! knows the difference.
//!
//! Mutating methods are the atomicity boundary: `insert`/`remove` on the
//! follow store must update the edge set and both indices as one step,
//! and signal duplicates/absences themselves, because a check performed
//! by the caller before the call cannot be atomic with it.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use chirp_types::{FollowEdge, Post, PostId, UserId, UserRecord};

use crate::error::CoreError;

/// Read-only account lookup, owned by the identity collaborator.
///
/// The core consumes existence and display fields only; credentials and
/// account mutation stay on the identity side.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Whether an account with this id exists.
    async fn exists(&self, id: UserId) -> Result<bool, CoreError>;

    /// Fetch the display record for an account, if it exists.
    async fn get(&self, id: UserId) -> Result<Option<UserRecord>, CoreError>;
}

/// Storage for the directed follow-edge set and its two indices.
#[async_trait]
pub trait FollowStore: Send + Sync {
    /// Atomically record an edge and update both indices.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Conflict`] if the edge already exists. The
    /// duplicate check and the insert are a single atomic step.
    async fn insert(&self, edge: FollowEdge) -> Result<(), CoreError>;

    /// Atomically remove an edge and both index entries.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if the edge does not exist; no
    /// index is altered in that case.
    async fn remove(&self, follower: UserId, following: UserId) -> Result<(), CoreError>;

    /// Whether the edge `follower -> following` exists. No side effects.
    async fn exists(&self, follower: UserId, following: UserId) -> Result<bool, CoreError>;

    /// Snapshot of who follows `user`. No defined ordering.
    async fn followers(&self, user: UserId) -> Result<HashSet<UserId>, CoreError>;

    /// Snapshot of who `user` follows. No defined ordering.
    async fn following(&self, user: UserId) -> Result<HashSet<UserId>, CoreError>;
}

/// Storage for posts, keyed by post id and indexed by author.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Store a new post, assigning a fresh id.
    ///
    /// Ids are monotonically increasing and never reused. Both timestamps
    /// are set to `now`.
    async fn insert(
        &self,
        author: UserId,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Post, CoreError>;

    /// Fetch a post by id.
    async fn get(&self, id: PostId) -> Result<Option<Post>, CoreError>;

    /// Replace a post's content and set `updated_at` to `now`.
    ///
    /// `author` and `created_at` are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if the post no longer exists.
    async fn update(
        &self,
        id: PostId,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Post, CoreError>;

    /// Remove a post from the primary index and the author index.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if the post does not exist.
    async fn remove(&self, id: PostId) -> Result<(), CoreError>;

    /// All posts by one author, newest first.
    async fn by_author(&self, author: UserId) -> Result<Vec<Post>, CoreError>;

    /// The union of several authors' posts, merged newest first.
    ///
    /// Posts sharing a creation timestamp are ordered by ascending post
    /// id, so both realizations produce the same sequence.
    async fn by_authors(&self, authors: &HashSet<UserId>) -> Result<Vec<Post>, CoreError>;
}
