//! `PostgreSQL` realization of the follow-edge store.
//!
//! The `follows` table carries both indices implicitly: the primary key
//! serves forward lookups and `follows_following_idx` serves reverse
//! lookups, so a single-row insert or delete updates "both indices"
//! atomically by construction.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;

use chirp_core::CoreError;
use chirp_core::store::FollowStore;
use chirp_types::{FollowEdge, UserId};

/// Backend failures surface as the contract's `Internal` kind.
fn internal(err: &sqlx::Error) -> CoreError {
    CoreError::Internal(format!("postgres: {err}"))
}

/// Operations on the `follows` table.
#[derive(Clone)]
pub struct PgFollowStore {
    pool: PgPool,
}

impl PgFollowStore {
    /// Create a follow store over a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowStore for PgFollowStore {
    async fn insert(&self, edge: FollowEdge) -> Result<(), CoreError> {
        let result = sqlx::query(
            r"INSERT INTO follows (follower_id, following_id, created_at)
              VALUES ($1, $2, $3)
              ON CONFLICT (follower_id, following_id) DO NOTHING",
        )
        .bind(edge.follower.into_inner())
        .bind(edge.following.into_inner())
        .bind(edge.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::Conflict(String::from(
                "already following this user",
            )));
        }
        Ok(())
    }

    async fn remove(&self, follower: UserId, following: UserId) -> Result<(), CoreError> {
        let result = sqlx::query(
            r"DELETE FROM follows WHERE follower_id = $1 AND following_id = $2",
        )
        .bind(follower.into_inner())
        .bind(following.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(String::from("follow relationship")));
        }
        Ok(())
    }

    async fn exists(&self, follower: UserId, following: UserId) -> Result<bool, CoreError> {
        sqlx::query_scalar::<_, bool>(
            r"SELECT EXISTS (
                  SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2
              )",
        )
        .bind(follower.into_inner())
        .bind(following.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| internal(&err))
    }

    async fn followers(&self, user: UserId) -> Result<HashSet<UserId>, CoreError> {
        let ids = sqlx::query_scalar::<_, i64>(
            r"SELECT follower_id FROM follows WHERE following_id = $1",
        )
        .bind(user.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }

    async fn following(&self, user: UserId) -> Result<HashSet<UserId>, CoreError> {
        let ids = sqlx::query_scalar::<_, i64>(
            r"SELECT following_id FROM follows WHERE follower_id = $1",
        )
        .bind(user.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }
}
