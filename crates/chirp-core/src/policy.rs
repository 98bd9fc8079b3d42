//! Pure policy predicates: content validation and the ownership guard.
//!
//! Both functions are stateless. The services call them before touching
//! any store, so a rejected request never acquires a write lock.

use chirp_types::UserId;

use crate::error::CoreError;

/// Maximum post length in user-perceived characters.
///
/// Counted as `char`s, not bytes, so multi-byte text gets the full 300
/// characters rather than a byte-dependent fraction of them.
pub const MAX_CONTENT_CHARS: usize = 300;

/// Validate post content: non-empty and at most [`MAX_CONTENT_CHARS`].
///
/// # Errors
///
/// Returns [`CoreError::Validation`] naming the first violated rule.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.is_empty() {
        return Err(CoreError::Validation(String::from("content is required")));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(CoreError::Validation(format!(
            "content must be {MAX_CONTENT_CHARS} characters or less"
        )));
    }
    Ok(())
}

/// The ownership guard: only a resource's owner may mutate it.
///
/// # Errors
///
/// Returns [`CoreError::Unauthorized`] when `acting` is not `owner`.
pub fn authorize_mutation(acting: UserId, owner: UserId) -> Result<(), CoreError> {
    if acting == owner {
        Ok(())
    } else {
        Err(CoreError::Unauthorized(String::from(
            "only the owner may modify this resource",
        )))
    }
}
