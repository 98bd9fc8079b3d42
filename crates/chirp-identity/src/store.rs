//! The user-store contract the identity service is written against.
//!
//! Mirrors the core's store-trait pattern: one trait, two realizations
//! (in-memory here, `PostgreSQL` in `chirp-db`), selected at construction
//! time. Email uniqueness is the store's atomic responsibility -- a
//! pre-check by the caller cannot be atomic with the insert.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use chirp_types::{User, UserId};

use crate::error::IdentityError;

/// Input for account creation. Carries the already-hashed password; the
/// plaintext never reaches a store.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Free-form profile text.
    pub profile: String,
    /// PHC-formatted argon2id hash.
    pub password_hash: String,
}

/// An account together with its stored password hash, for credential
/// verification during login. Never serialized.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    /// The account record.
    pub user: User,
    /// PHC-formatted argon2id hash.
    pub password_hash: String,
}

/// Storage for account records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Store a new account, assigning a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::EmailTaken`] if the email is already
    /// registered; the uniqueness check and the insert are one atomic
    /// step.
    async fn insert(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User, IdentityError>;

    /// Fetch an account by id.
    async fn get(&self, id: UserId) -> Result<Option<User>, IdentityError>;

    /// Fetch an account and its password hash by email.
    async fn get_by_email(&self, email: &str)
    -> Result<Option<AccountCredentials>, IdentityError>;
}
