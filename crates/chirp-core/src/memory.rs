//! In-memory store realizations.
//!
//! Each store guards its consistency domain with a single
//! [`tokio::sync::RwLock`]: the follow store's edge map plus both indices,
//! and the post store's primary map plus the per-author index. Writers
//! hold the lock exclusively for the whole index update, readers share
//! it, and the lock is never held across an await on external I/O, so
//! callers observe only fully-committed states.
//!
//! These stores are used directly in tests and when the server is started
//! with `STORAGE=memory`; the `chirp-db` crate provides the `PostgreSQL`
//! realization of the same traits.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use chirp_types::{FollowEdge, Post, PostId, UserId};

use crate::error::CoreError;
use crate::store::{FollowStore, PostStore};

// ---------------------------------------------------------------------------
// Follow store
// ---------------------------------------------------------------------------

/// Edge set and both indices; one consistency domain, one lock.
#[derive(Debug, Default)]
struct FollowState {
    /// Edges keyed by `(follower, following)`.
    edges: HashMap<(UserId, UserId), FollowEdge>,
    /// Reverse index: who follows the key.
    followers: HashMap<UserId, HashSet<UserId>>,
    /// Forward index: who the key follows.
    following: HashMap<UserId, HashSet<UserId>>,
}

/// In-memory realization of [`FollowStore`].
#[derive(Debug, Default)]
pub struct InMemoryFollowStore {
    state: RwLock<FollowState>,
}

impl InMemoryFollowStore {
    /// Create an empty follow store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FollowStore for InMemoryFollowStore {
    async fn insert(&self, edge: FollowEdge) -> Result<(), CoreError> {
        let mut state = self.state.write().await;

        let key = (edge.follower, edge.following);
        if state.edges.contains_key(&key) {
            return Err(CoreError::Conflict(String::from(
                "already following this user",
            )));
        }

        state.edges.insert(key, edge);
        state
            .followers
            .entry(edge.following)
            .or_default()
            .insert(edge.follower);
        state
            .following
            .entry(edge.follower)
            .or_default()
            .insert(edge.following);
        Ok(())
    }

    async fn remove(&self, follower: UserId, following: UserId) -> Result<(), CoreError> {
        let mut state = self.state.write().await;

        if state.edges.remove(&(follower, following)).is_none() {
            return Err(CoreError::NotFound(String::from("follow relationship")));
        }

        let reverse_removed = state
            .followers
            .get_mut(&following)
            .is_some_and(|set| set.remove(&follower));
        let forward_removed = state
            .following
            .get_mut(&follower)
            .is_some_and(|set| set.remove(&following));

        // The edge existed, so both index entries must have existed too.
        // A miss here is a core bug, not a caller error.
        assert!(
            reverse_removed && forward_removed,
            "follow indices desynchronized from edge set"
        );
        Ok(())
    }

    async fn exists(&self, follower: UserId, following: UserId) -> Result<bool, CoreError> {
        let state = self.state.read().await;
        Ok(state.edges.contains_key(&(follower, following)))
    }

    async fn followers(&self, user: UserId) -> Result<HashSet<UserId>, CoreError> {
        let state = self.state.read().await;
        Ok(state.followers.get(&user).cloned().unwrap_or_default())
    }

    async fn following(&self, user: UserId) -> Result<HashSet<UserId>, CoreError> {
        let state = self.state.read().await;
        Ok(state.following.get(&user).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Post store
// ---------------------------------------------------------------------------

/// Primary post map, author index, and the id counter; one lock.
#[derive(Debug)]
struct PostState {
    posts: HashMap<PostId, Post>,
    /// Per-author post ids in insertion order.
    by_author: HashMap<UserId, Vec<PostId>>,
    /// Next id to assign. Never decremented, so ids are never reused.
    next_id: i64,
}

impl Default for PostState {
    fn default() -> Self {
        Self {
            posts: HashMap::new(),
            by_author: HashMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory realization of [`PostStore`].
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    state: RwLock<PostState>,
}

impl InMemoryPostStore {
    /// Create an empty post store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sort newest first; equal timestamps order by ascending post id so the
/// sequence matches the `PostgreSQL` realization.
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(
        &self,
        author: UserId,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Post, CoreError> {
        let mut state = self.state.write().await;

        let id = PostId::new(state.next_id);
        state.next_id = state
            .next_id
            .checked_add(1)
            .ok_or_else(|| CoreError::Internal(String::from("post id space exhausted")))?;

        let post = Post {
            id,
            author,
            content,
            created_at: now,
            updated_at: now,
        };
        state.posts.insert(id, post.clone());
        state.by_author.entry(author).or_default().push(id);
        Ok(post)
    }

    async fn get(&self, id: PostId) -> Result<Option<Post>, CoreError> {
        let state = self.state.read().await;
        Ok(state.posts.get(&id).cloned())
    }

    async fn update(
        &self,
        id: PostId,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Post, CoreError> {
        let mut state = self.state.write().await;

        let post = state
            .posts
            .get_mut(&id)
            .ok_or_else(|| CoreError::NotFound(String::from("post")))?;
        post.content = content;
        post.updated_at = now;
        Ok(post.clone())
    }

    async fn remove(&self, id: PostId) -> Result<(), CoreError> {
        let mut state = self.state.write().await;

        let post = state
            .posts
            .remove(&id)
            .ok_or_else(|| CoreError::NotFound(String::from("post")))?;

        let index_removed = state.by_author.get_mut(&post.author).is_some_and(|ids| {
            let before = ids.len();
            ids.retain(|candidate| *candidate != id);
            ids.len() < before
        });
        // The post existed, so the author index must have referenced it.
        assert!(index_removed, "author index desynchronized from post map");
        Ok(())
    }

    async fn by_author(&self, author: UserId) -> Result<Vec<Post>, CoreError> {
        let state = self.state.read().await;

        let mut posts: Vec<Post> = state
            .by_author
            .get(&author)
            .into_iter()
            .flatten()
            .filter_map(|id| state.posts.get(id).cloned())
            .collect();
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn by_authors(&self, authors: &HashSet<UserId>) -> Result<Vec<Post>, CoreError> {
        let state = self.state.read().await;

        let mut posts: Vec<Post> = authors
            .iter()
            .filter_map(|author| state.by_author.get(author))
            .flatten()
            .filter_map(|id| state.posts.get(id).cloned())
            .collect();
        sort_newest_first(&mut posts);
        Ok(posts)
    }
}
