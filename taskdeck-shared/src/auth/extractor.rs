/// Bearer token extraction and identity resolution
///
/// This module turns a raw `Authorization` header into an authenticated
/// identity. It parses the `Bearer` scheme, delegates the token to the
/// [`jwt`](super::jwt) module, and checks that the identity claims are
/// present.
///
/// The scheme prefix is matched case-sensitively: `"Bearer "` is accepted,
/// `"bearer "` is not.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::extractor::{extract, AuthError};
///
/// let secret = "test-secret-key-at-least-32-bytes-long";
///
/// // Absent header
/// assert!(matches!(extract(None, secret), Err(AuthError::MissingHeader)));
///
/// // Wrong scheme
/// assert!(matches!(
///     extract(Some("Basic dXNlcjpwYXNz"), secret),
///     Err(AuthError::MalformedHeader(_))
/// ));
/// ```

use serde::{Deserialize, Serialize};

use super::jwt::{self, JwtError};

/// An authenticated identity derived from a verified token
///
/// Transient: exists only for the duration of one request. Handlers receive
/// it through request extensions after the auth middleware has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User id in canonical string form (the token's `sub` claim)
    pub user_id: String,

    /// Email address from the token
    pub email: String,
}

/// Error type for identity extraction
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization header is absent
    #[error("Authorization header is missing")]
    MissingHeader,

    /// Header present but not a usable `Bearer <token>` value
    #[error("{0}")]
    MalformedHeader(String),

    /// Token failed signature or expiry validation
    #[error("{0}")]
    InvalidToken(String),

    /// Validated claims lack a required identity claim
    #[error("Token missing required '{0}' claim")]
    MissingClaim(&'static str),
}

/// Extracts an authenticated identity from an `Authorization` header value
///
/// # Failure modes
///
/// - [`AuthError::MissingHeader`]: header absent
/// - [`AuthError::MalformedHeader`]: header does not start with the literal
///   `"Bearer "` prefix, or the remaining token is empty after trimming
/// - [`AuthError::InvalidToken`]: token expired or failed validation
/// - [`AuthError::MissingClaim`]: token valid but `sub` or `email` absent
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::extractor::extract;
/// use taskdeck_shared::auth::jwt::issue_token;
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let token = issue_token("42", "user@example.com", Duration::minutes(30), secret)?;
///
/// let header = format!("Bearer {}", token);
/// let identity = extract(Some(header.as_str()), secret)?;
/// assert_eq!(identity.user_id, "42");
/// # Ok(())
/// # }
/// ```
pub fn extract(header: Option<&str>, secret: &str) -> Result<AuthenticatedUser, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AuthError::MalformedHeader(
            "Invalid authorization header format. Expected: 'Bearer <token>'".to_string(),
        )
    })?;

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader("Token is empty".to_string()));
    }

    let claims = jwt::validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token has expired".to_string()),
        _ => AuthError::InvalidToken("Could not validate credentials".to_string()),
    })?;

    if claims.sub.is_empty() {
        return Err(AuthError::MissingClaim("sub"));
    }
    if claims.email.is_empty() {
        return Err(AuthError::MissingClaim("email"));
    }

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// Optional-mode extraction: anonymous requests pass, bad credentials fail
///
/// An entirely absent header yields `Ok(None)` instead of an error. A header
/// that is present but unusable still fails, so "anonymous" stays
/// distinguishable from "bad credentials".
pub fn extract_optional(
    header: Option<&str>,
    secret: &str,
) -> Result<Option<AuthenticatedUser>, AuthError> {
    match header {
        None => Ok(None),
        Some(_) => extract(header, secret).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{issue_token, sign_claims, Claims};
    use chrono::Duration;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    fn valid_token() -> String {
        issue_token("42", "user@example.com", Duration::minutes(30), SECRET).unwrap()
    }

    #[test]
    fn test_extract_success() {
        let header = bearer(&valid_token());
        let identity = extract(Some(header.as_str()), SECRET).expect("Should extract identity");

        assert_eq!(identity.user_id, "42");
        assert_eq!(identity.email, "user@example.com");
    }

    #[test]
    fn test_extract_missing_header() {
        let result = extract(None, SECRET);
        assert!(matches!(result, Err(AuthError::MissingHeader)));
    }

    #[test]
    fn test_extract_wrong_scheme() {
        let result = extract(Some("Basic dXNlcjpwYXNz"), SECRET);
        assert!(matches!(result, Err(AuthError::MalformedHeader(_))));
    }

    #[test]
    fn test_extract_scheme_is_case_sensitive() {
        let header = format!("bearer {}", valid_token());
        let result = extract(Some(header.as_str()), SECRET);
        assert!(matches!(result, Err(AuthError::MalformedHeader(_))));
    }

    #[test]
    fn test_extract_empty_token() {
        let result = extract(Some("Bearer "), SECRET);
        assert!(matches!(result, Err(AuthError::MalformedHeader(_))));

        // Whitespace-only token is empty after trimming
        let result = extract(Some("Bearer    "), SECRET);
        assert!(matches!(result, Err(AuthError::MalformedHeader(_))));
    }

    #[test]
    fn test_extract_garbage_token() {
        let result = extract(Some("Bearer not-a-jwt"), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_extract_expired_token() {
        let claims = Claims::new("42", "user@example.com", Duration::seconds(-60));
        let token = sign_claims(&claims, SECRET).unwrap();

        let header = bearer(&token);
        let result = extract(Some(header.as_str()), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_extract_missing_sub_claim() {
        let payload = serde_json::json!({
            "email": "user@example.com",
            "iat": chrono::Utc::now().timestamp(),
            "exp": chrono::Utc::now().timestamp() + 600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let header = bearer(&token);
        let result = extract(Some(header.as_str()), SECRET);
        assert!(matches!(result, Err(AuthError::MissingClaim("sub"))));
    }

    #[test]
    fn test_extract_missing_email_claim() {
        let payload = serde_json::json!({
            "sub": "42",
            "iat": chrono::Utc::now().timestamp(),
            "exp": chrono::Utc::now().timestamp() + 600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let header = bearer(&token);
        let result = extract(Some(header.as_str()), SECRET);
        assert!(matches!(result, Err(AuthError::MissingClaim("email"))));
    }

    #[test]
    fn test_extract_optional_absent_header_is_anonymous() {
        let result = extract_optional(None, SECRET).expect("Absent header should be Ok");
        assert!(result.is_none());
    }

    #[test]
    fn test_extract_optional_valid_token() {
        let header = bearer(&valid_token());
        let identity = extract_optional(Some(header.as_str()), SECRET)
            .expect("Valid token should be Ok")
            .expect("Identity should be present");
        assert_eq!(identity.user_id, "42");
    }

    #[test]
    fn test_extract_optional_invalid_token_still_fails() {
        // Present-but-invalid credentials are not anonymous
        let result = extract_optional(Some("Bearer not-a-jwt"), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
