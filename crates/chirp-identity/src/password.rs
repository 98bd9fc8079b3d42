//! Password hashing and verification using Argon2id.
//!
//! Hashes are PHC-formatted strings carrying the salt and parameters, so
//! verification needs nothing but the stored string.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::IdentityError;

/// Hash a password with a fresh random salt.
///
/// # Errors
///
/// Returns [`IdentityError::Internal`] if hashing fails; this is an
/// environment problem, never a property of the password itself.
pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| IdentityError::Internal(format!("password hashing failed: {err}")))
}

/// Verify a password against a stored PHC hash.
///
/// An unparseable hash verifies as `false` rather than erroring: from
/// the caller's point of view the credentials simply do not match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
