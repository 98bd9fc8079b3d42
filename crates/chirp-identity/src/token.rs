//! Signed-token minting and validation (HS256 JWT).
//!
//! Tokens carry the user id and email and expire after 24 hours. The
//! signing secret comes from configuration; the service never persists
//! tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use chirp_types::{User, UserId};

use crate::error::IdentityError;

/// Token lifetime.
const TOKEN_TTL_HOURS: i64 = 24;

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: i64,
    /// The user's email at mint time.
    pub email: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// The authenticated user id these claims name.
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }
}

/// Mints and validates HS256 tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Build a token service from the shared signing secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Mint a token for an authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Internal`] if signing fails.
    pub fn mint(&self, user: &User) -> Result<String, IdentityError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.into_inner(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| IdentityError::Internal(format!("token signing failed: {err}")))
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Token`] for anything wrong with the
    /// token -- bad signature, wrong algorithm, expired -- without
    /// distinguishing the cases to the caller.
    pub fn validate(&self, token: &str) -> Result<Claims, IdentityError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(error = %err, "token validation failed");
                IdentityError::Token
            })
    }
}
