//! `PostgreSQL` realization of the post store.
//!
//! Post ids come from the `BIGSERIAL` sequence, which is monotonic and
//! never reuses a value, including after deletes. Merged reads order by
//! `created_at DESC, id` so equal timestamps tie-break exactly like the
//! in-memory realization.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use chirp_core::CoreError;
use chirp_core::store::PostStore;
use chirp_types::{Post, PostId, UserId};

/// Backend failures surface as the contract's `Internal` kind.
fn internal(err: &sqlx::Error) -> CoreError {
    CoreError::Internal(format!("postgres: {err}"))
}

/// Row shape shared by every post query.
#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    author_id: i64,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::new(row.id),
            author: UserId::new(row.author_id),
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Operations on the `posts` table.
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    /// Create a post store over a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn insert(
        &self,
        author: UserId,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Post, CoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            r"INSERT INTO posts (author_id, content, created_at, updated_at)
              VALUES ($1, $2, $3, $3)
              RETURNING id",
        )
        .bind(author.into_inner())
        .bind(&content)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        Ok(Post {
            id: PostId::new(id),
            author,
            content,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: PostId) -> Result<Option<Post>, CoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r"SELECT id, author_id, content, created_at, updated_at
              FROM posts WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        Ok(row.map(Post::from))
    }

    async fn update(
        &self,
        id: PostId,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Post, CoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r"UPDATE posts SET content = $2, updated_at = $3
              WHERE id = $1
              RETURNING id, author_id, content, created_at, updated_at",
        )
        .bind(id.into_inner())
        .bind(&content)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        row.map(Post::from)
            .ok_or_else(|| CoreError::NotFound(String::from("post")))
    }

    async fn remove(&self, id: PostId) -> Result<(), CoreError> {
        let result = sqlx::query(r"DELETE FROM posts WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(|err| internal(&err))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(String::from("post")));
        }
        Ok(())
    }

    async fn by_author(&self, author: UserId) -> Result<Vec<Post>, CoreError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r"SELECT id, author_id, content, created_at, updated_at
              FROM posts
              WHERE author_id = $1
              ORDER BY created_at DESC, id",
        )
        .bind(author.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn by_authors(&self, authors: &HashSet<UserId>) -> Result<Vec<Post>, CoreError> {
        let author_ids: Vec<i64> = authors.iter().map(|id| id.into_inner()).collect();

        let rows = sqlx::query_as::<_, PostRow>(
            r"SELECT id, author_id, content, created_at, updated_at
              FROM posts
              WHERE author_id = ANY($1)
              ORDER BY created_at DESC, id",
        )
        .bind(&author_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        Ok(rows.into_iter().map(Post::from).collect())
    }
}
