//! Type-safe identifier wrappers around `i64`.
//!
//! Every entity has a strongly-typed ID to prevent accidental mixing of
//! identifiers at compile time -- a follower id and a post id are both
//! integers on the wire, and nothing but the type system stops one from
//! being passed where the other is expected.
//!
//! IDs are assigned by the backing store (`BIGSERIAL` in `PostgreSQL`, a
//! monotonic counter in memory) and are always positive once assigned.
//! Zero and negative values never resolve; they are what a missing or
//! defaulted field deserializes to, and the services reject them before
//! touching any store.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `i64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw identifier value.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Return the inner `i64` value.
            pub const fn into_inner(self) -> i64 {
                self.0
            }

            /// Whether this value can refer to a stored entity.
            ///
            /// Store-assigned identifiers start at 1; zero is the serde
            /// default for a missing field and negatives never occur.
            pub const fn is_assigned(self) -> bool {
                self.0 > 0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a user account.
    UserId
}

define_id! {
    /// Unique identifier for a post.
    ///
    /// Post ids are monotonically increasing and never reused, even after
    /// the post they named is deleted.
    PostId
}
