//! Fan-out-on-read feed assembly.
//!
//! The timeline is computed at read time by merging the viewer's
//! followed authors' posts. Nothing is precomputed or stored per viewer;
//! the assembler reads the follow graph, then the post store, and never
//! mutates either.

use std::sync::Arc;

use chirp_types::{Post, UserId};

use crate::error::CoreError;
use crate::graph::FollowGraph;
use crate::store::{PostStore, UserDirectory};

/// Assembles reverse-chronological feeds for viewers.
#[derive(Clone)]
pub struct TimelineAssembler {
    graph: FollowGraph,
    posts: Arc<dyn PostStore>,
    directory: Arc<dyn UserDirectory>,
}

impl TimelineAssembler {
    /// Create an assembler over the given graph, post store, and
    /// directory.
    pub fn new(
        graph: FollowGraph,
        posts: Arc<dyn PostStore>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            graph,
            posts,
            directory,
        }
    }

    /// Assemble the viewer's timeline, newest post first.
    ///
    /// A viewer who follows nobody gets an empty sequence, not an error.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if the viewer does not resolve.
    pub async fn timeline(&self, viewer: UserId) -> Result<Vec<Post>, CoreError> {
        if !self.directory.exists(viewer).await? {
            return Err(CoreError::NotFound(String::from("user")));
        }

        let following = self.graph.following(viewer).await?;
        self.posts.by_authors(&following).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use chrono::{Duration, Utc};

    use crate::memory::{InMemoryFollowStore, InMemoryPostStore};
    use crate::store::FollowStore;
    use crate::testutil::StaticDirectory;
    use chirp_types::FollowEdge;

    struct Fixture {
        follows: Arc<InMemoryFollowStore>,
        posts: Arc<InMemoryPostStore>,
        assembler: TimelineAssembler,
    }

    fn fixture(users: &[i64]) -> Fixture {
        let follows = Arc::new(InMemoryFollowStore::new());
        let posts = Arc::new(InMemoryPostStore::new());
        let directory = Arc::new(StaticDirectory::with_users(users));
        let graph = FollowGraph::new(follows.clone(), directory.clone());
        let assembler = TimelineAssembler::new(graph, posts.clone(), directory);
        Fixture {
            follows,
            posts,
            assembler,
        }
    }

    async fn follow(fix: &Fixture, follower: i64, following: i64) {
        fix.follows
            .insert(FollowEdge {
                follower: UserId::new(follower),
                following: UserId::new(following),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_viewer_is_not_found() {
        let fix = fixture(&[1]);
        let err = fix.assembler.timeline(UserId::new(9)).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn following_nobody_yields_an_empty_timeline() {
        let fix = fixture(&[1, 2]);
        // Someone else's post must not leak in.
        fix.posts
            .insert(UserId::new(2), String::from("not for viewer 1"), Utc::now())
            .await
            .unwrap();

        let feed = fix.assembler.timeline(UserId::new(1)).await.unwrap();
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn timeline_merges_followed_authors_newest_first() {
        let fix = fixture(&[1, 2, 3]);
        follow(&fix, 1, 2).await;
        follow(&fix, 1, 3).await;

        let t1 = Utc::now();
        let t2 = t1 + Duration::seconds(10);
        fix.posts
            .insert(UserId::new(2), String::from("A"), t1)
            .await
            .unwrap();
        fix.posts
            .insert(UserId::new(3), String::from("B"), t2)
            .await
            .unwrap();

        let feed = fix.assembler.timeline(UserId::new(1)).await.unwrap();
        let contents: Vec<&str> = feed.iter().map(|post| post.content.as_str()).collect();
        assert_eq!(contents, ["B", "A"]);
    }

    #[tokio::test]
    async fn unfollowing_removes_that_author_from_the_feed() {
        let fix = fixture(&[1, 2, 3]);
        follow(&fix, 1, 2).await;
        follow(&fix, 1, 3).await;

        let t1 = Utc::now();
        fix.posts
            .insert(UserId::new(2), String::from("A"), t1)
            .await
            .unwrap();
        fix.posts
            .insert(UserId::new(3), String::from("B"), t1 + Duration::seconds(10))
            .await
            .unwrap();

        fix.follows
            .remove(UserId::new(1), UserId::new(3))
            .await
            .unwrap();

        let feed = fix.assembler.timeline(UserId::new(1)).await.unwrap();
        let contents: Vec<&str> = feed.iter().map(|post| post.content.as_str()).collect();
        assert_eq!(contents, ["A"]);
    }

    #[tokio::test]
    async fn own_posts_do_not_appear_without_a_self_edge() {
        let fix = fixture(&[1, 2]);
        follow(&fix, 1, 2).await;

        fix.posts
            .insert(UserId::new(1), String::from("mine"), Utc::now())
            .await
            .unwrap();
        fix.posts
            .insert(UserId::new(2), String::from("theirs"), Utc::now())
            .await
            .unwrap();

        let feed = fix.assembler.timeline(UserId::new(1)).await.unwrap();
        let contents: Vec<&str> = feed.iter().map(|post| post.content.as_str()).collect();
        assert_eq!(contents, ["theirs"]);
    }
}
