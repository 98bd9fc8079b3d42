//! `PostgreSQL` realization of the identity user store.
//!
//! Email uniqueness rides on the unique index: the insert either returns
//! the new row's id or hits the conflict arm, with no separate pre-check
//! to race against.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use chirp_identity::IdentityError;
use chirp_identity::store::{AccountCredentials, NewUser, UserStore};
use chirp_types::{User, UserId};

/// Backend failures surface as the contract's `Internal` kind.
fn internal(err: &sqlx::Error) -> IdentityError {
    IdentityError::Internal(format!("postgres: {err}"))
}

/// Row shape for account queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    profile: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
            profile: self.profile,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn into_credentials(self) -> AccountCredentials {
        let password_hash = self.password_hash.clone();
        AccountCredentials {
            user: self.into_user(),
            password_hash,
        }
    }
}

/// Operations on the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a user store over a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User, IdentityError> {
        let id = sqlx::query_scalar::<_, i64>(
            r"INSERT INTO users (name, email, password_hash, profile, created_at, updated_at)
              VALUES ($1, $2, $3, $4, $5, $5)
              ON CONFLICT (email) DO NOTHING
              RETURNING id",
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.profile)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        let Some(id) = id else {
            return Err(IdentityError::EmailTaken);
        };

        Ok(User {
            id: UserId::new(id),
            name: new_user.name,
            email: new_user.email,
            profile: new_user.profile,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, IdentityError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"SELECT id, name, email, profile, password_hash, created_at, updated_at
              FROM users WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        Ok(row.map(UserRow::into_user))
    }

    async fn get_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountCredentials>, IdentityError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"SELECT id, name, email, profile, password_hash, created_at, updated_at
              FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| internal(&err))?;

        Ok(row.map(UserRow::into_credentials))
    }
}
