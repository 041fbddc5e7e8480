/// Resource ownership checks
///
/// Per-user routes declare the owner in the path (`/api/:user_id/tasks`).
/// Before any storage access, the declared owner must match the identity the
/// token carries.
///
/// The comparison is between canonical **string** forms, never numeric: path
/// ids and token subjects may have differing canonical representations, and
/// numeric coercion would silently paper over that (`"01"` must not equal
/// `"1"`).

use super::extractor::AuthenticatedUser;

/// Error type for ownership checks
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The declared owner is not the authenticated user
    #[error("You do not have access to this resource")]
    Forbidden,
}

/// Checks that the path-declared owner is the authenticated user
///
/// # Errors
///
/// Returns `AccessError::Forbidden` when the string form of `path_user_id`
/// does not exactly equal `identity.user_id`.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::extractor::AuthenticatedUser;
/// use taskdeck_shared::auth::guard::authorize_owner;
///
/// let identity = AuthenticatedUser {
///     user_id: "42".to_string(),
///     email: "user@example.com".to_string(),
/// };
///
/// assert!(authorize_owner("42", &identity).is_ok());
/// assert!(authorize_owner("43", &identity).is_err());
/// ```
pub fn authorize_owner(
    path_user_id: &str,
    identity: &AuthenticatedUser,
) -> Result<(), AccessError> {
    if path_user_id != identity.user_id {
        return Err(AccessError::Forbidden);
    }

    Ok(())
}
