//! Follow/unfollow operations and graph queries.
//!
//! [`FollowGraph`] implements the relationship contract once, against the
//! [`FollowStore`] trait, so the same check order and error kinds apply
//! whether the edges live in memory or in `PostgreSQL`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use chirp_types::{FollowEdge, UserId};

use crate::error::CoreError;
use crate::store::{FollowStore, UserDirectory};

/// The follow-relationship service.
///
/// Holds a handle to the edge store and a read-only handle to the user
/// directory; both are chosen at construction time.
#[derive(Clone)]
pub struct FollowGraph {
    store: Arc<dyn FollowStore>,
    directory: Arc<dyn UserDirectory>,
}

impl FollowGraph {
    /// Create a follow graph over the given store and directory.
    pub fn new(store: Arc<dyn FollowStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { store, directory }
    }

    /// Create the edge `follower -> following`.
    ///
    /// The check order is contractual, because it decides which error a
    /// malformed request surfaces: missing ids, then self-follow, then
    /// follower existence, then following existence, then duplicate. The
    /// duplicate check is the store insert itself, so two racing creates
    /// cannot both succeed.
    ///
    /// # Errors
    ///
    /// [`CoreError::Validation`], [`CoreError::SelfFollow`],
    /// [`CoreError::NotFound`], or [`CoreError::Conflict`], per the order
    /// above.
    pub async fn follow(
        &self,
        follower: UserId,
        following: UserId,
    ) -> Result<FollowEdge, CoreError> {
        if !follower.is_assigned() || !following.is_assigned() {
            return Err(CoreError::Validation(String::from(
                "follower and following ids are required",
            )));
        }
        if follower == following {
            return Err(CoreError::SelfFollow);
        }
        if !self.directory.exists(follower).await? {
            return Err(CoreError::NotFound(String::from("follower user")));
        }
        if !self.directory.exists(following).await? {
            return Err(CoreError::NotFound(String::from("following user")));
        }

        let edge = FollowEdge {
            follower,
            following,
            created_at: Utc::now(),
        };
        self.store.insert(edge).await?;

        info!(%follower, %following, "follow created");
        Ok(edge)
    }

    /// Remove the edge `follower -> following`.
    ///
    /// # Errors
    ///
    /// [`CoreError::Validation`] for missing ids, [`CoreError::NotFound`]
    /// if the edge does not exist (no index is altered in that case).
    pub async fn unfollow(&self, follower: UserId, following: UserId) -> Result<(), CoreError> {
        if !follower.is_assigned() || !following.is_assigned() {
            return Err(CoreError::Validation(String::from(
                "follower and following ids are required",
            )));
        }

        self.store.remove(follower, following).await?;

        info!(%follower, %following, "follow removed");
        Ok(())
    }

    /// Whether `follower` currently follows `following`. No side effects.
    pub async fn is_following(
        &self,
        follower: UserId,
        following: UserId,
    ) -> Result<bool, CoreError> {
        self.store.exists(follower, following).await
    }

    /// Snapshot of who follows `user`. Callers must not assume any
    /// ordering.
    pub async fn followers(&self, user: UserId) -> Result<HashSet<UserId>, CoreError> {
        self.store.followers(user).await
    }

    /// Snapshot of who `user` follows. Callers must not assume any
    /// ordering.
    pub async fn following(&self, user: UserId) -> Result<HashSet<UserId>, CoreError> {
        self.store.following(user).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::memory::InMemoryFollowStore;
    use crate::testutil::StaticDirectory;

    fn graph_with_users(ids: &[i64]) -> FollowGraph {
        FollowGraph::new(
            Arc::new(InMemoryFollowStore::new()),
            Arc::new(StaticDirectory::with_users(ids)),
        )
    }

    #[tokio::test]
    async fn follow_updates_both_directions() {
        let graph = graph_with_users(&[1, 2]);
        let one = UserId::new(1);
        let two = UserId::new(2);

        graph.follow(one, two).await.unwrap();

        assert!(graph.is_following(one, two).await.unwrap());
        assert!(graph.following(one).await.unwrap().contains(&two));
        assert!(graph.followers(two).await.unwrap().contains(&one));
        // The reverse direction was not created.
        assert!(!graph.is_following(two, one).await.unwrap());
    }

    #[tokio::test]
    async fn self_follow_always_fails() {
        let graph = graph_with_users(&[1]);
        let err = graph
            .follow(UserId::new(1), UserId::new(1))
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::SelfFollow);
    }

    #[tokio::test]
    async fn missing_ids_fail_before_the_self_follow_check() {
        let graph = graph_with_users(&[1]);
        // Both ids zero: equal, but the id check comes first.
        let err = graph
            .follow(UserId::new(0), UserId::new(0))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn self_follow_is_checked_before_existence() {
        // User 9 does not exist, but following yourself fails first.
        let graph = graph_with_users(&[1]);
        let err = graph
            .follow(UserId::new(9), UserId::new(9))
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::SelfFollow);
    }

    #[tokio::test]
    async fn unknown_users_fail_follower_side_first() {
        let graph = graph_with_users(&[1]);

        let err = graph
            .follow(UserId::new(7), UserId::new(1))
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::NotFound(String::from("follower user")));

        let err = graph
            .follow(UserId::new(1), UserId::new(7))
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::NotFound(String::from("following user")));
    }

    #[tokio::test]
    async fn second_follow_conflicts_and_the_edge_stays_single() {
        let graph = graph_with_users(&[1, 2]);
        let one = UserId::new(1);
        let two = UserId::new(2);

        graph.follow(one, two).await.unwrap();
        let err = graph.follow(one, two).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        assert_eq!(graph.followers(two).await.unwrap().len(), 1);
        assert_eq!(graph.following(one).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn racing_creates_yield_exactly_one_edge() {
        let graph = graph_with_users(&[1, 2]);
        let one = UserId::new(1);
        let two = UserId::new(2);

        // The duplicate gate lives in the store insert, so no interleaving
        // lets both writers through.
        let first = tokio::spawn({
            let graph = graph.clone();
            async move { graph.follow(one, two).await }
        });
        let second = tokio::spawn({
            let graph = graph.clone();
            async move { graph.follow(one, two).await }
        });

        let outcomes = [first.await.unwrap(), second.await.unwrap()];
        let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        assert_eq!(successes, 1);
        assert_eq!(graph.followers(two).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unfollow_without_an_edge_is_not_found() {
        let graph = graph_with_users(&[1, 2]);
        let err = graph
            .unfollow(UserId::new(1), UserId::new(2))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn follow_then_unfollow_restores_the_prior_sets() {
        let graph = graph_with_users(&[1, 2, 3]);
        let one = UserId::new(1);
        let two = UserId::new(2);
        let three = UserId::new(3);

        // Pre-existing edge that must survive untouched.
        graph.follow(one, three).await.unwrap();
        let following_before = graph.following(one).await.unwrap();
        let followers_before = graph.followers(two).await.unwrap();

        graph.follow(one, two).await.unwrap();
        graph.unfollow(one, two).await.unwrap();

        assert_eq!(graph.following(one).await.unwrap(), following_before);
        assert_eq!(graph.followers(two).await.unwrap(), followers_before);
    }
}
