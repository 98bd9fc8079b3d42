//! Core entity structs: users, follow edges, and posts.
//!
//! These are plain data carriers. Invariants (content length, edge
//! uniqueness, ownership) are enforced by the `chirp-core` services, not
//! by constructors here, because the structs also have to represent rows
//! loaded from a store that already guarantees them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{PostId, UserId};

/// A user account.
///
/// The password hash is deliberately absent: it never leaves the identity
/// store, and nothing outside `chirp-identity` may observe it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address, used as the login identifier.
    pub email: String,
    /// Free-form profile text.
    pub profile: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last modified.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Project this account down to the read-only directory record.
    pub fn record(&self) -> UserRecord {
        UserRecord {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            profile: self.profile.clone(),
        }
    }
}

/// Read-only view of an account, as exposed by the user directory.
///
/// This is all the social-graph core is allowed to see of a user:
/// existence plus basic display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Free-form profile text.
    pub profile: String,
}

/// A directed follow relationship.
///
/// Means "`follower`'s timeline includes `following`'s posts". Edges are
/// created whole and destroyed whole; no field is ever mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    /// The account doing the following.
    pub follower: UserId,
    /// The account being followed.
    pub following: UserId,
    /// When the relationship was created.
    pub created_at: DateTime<Utc>,
}

/// A short text post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Store-assigned identifier, monotonically increasing, never reused.
    pub id: PostId,
    /// The author. Immutable after creation.
    pub author: UserId,
    /// Post text, 1..=300 characters.
    pub content: String,
    /// When the post was created. Immutable after creation.
    pub created_at: DateTime<Utc>,
    /// When the content was last edited.
    pub updated_at: DateTime<Utc>,
}
