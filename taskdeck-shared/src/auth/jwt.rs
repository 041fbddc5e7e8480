/// JWT token issuing and validation module
///
/// This module provides the token service for user authentication. Tokens are
/// signed using HS256 (HMAC-SHA256) and carry the user's identity claims.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: configurable TTL (the API defaults to 30 minutes)
/// - **Validation**: signature and expiry checks with zero leeway -- a token
///   is invalid the instant `now > exp`, with no clock-skew tolerance
/// - **Secret Management**: the signing secret is process-wide configuration,
///   loaded once at startup
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::jwt::{issue_token, validate_token};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
///
/// let token = issue_token("42", "user@example.com", Duration::minutes(30), secret)?;
///
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, "42");
/// assert_eq!(claims.email, "user@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature check failed or the token structure is unparseable
    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// JWT claims structure
///
/// # Claims
///
/// - `sub`: Subject (user id, canonical string form)
/// - `email`: Email address of the subject
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration time (Unix timestamp)
///
/// `sub` and `email` default to the empty string when absent from a decoded
/// payload; callers treat an empty claim as missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id as a string
    #[serde(default)]
    pub sub: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates new claims expiring `ttl` from now
    pub fn new(sub: impl Into<String>, email: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: sub.into(),
            email: email.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Checks if the claims are past their expiry instant
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Issues a signed token for the given identity
///
/// Embeds `sub`, `email`, `iat = now` and `exp = now + ttl`, then signs with
/// HS256 using the process-wide secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn issue_token(
    sub: &str,
    email: &str,
    ttl: Duration,
    secret: &str,
) -> Result<String, JwtError> {
    let claims = Claims::new(sub, email, ttl);

    sign_claims(&claims, secret)
}

/// Signs pre-built claims
///
/// Most callers want [`issue_token`]; this exists for callers that need
/// control over `iat`/`exp` (e.g. tests constructing expired tokens).
pub fn sign_claims(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the HS256 signature and the expiry instant. Expiry is compared
/// exactly: `leeway` is zero, so a token is rejected the moment `now > exp`.
///
/// # Errors
///
/// - `JwtError::Expired` when the expiry instant has passed
/// - `JwtError::Malformed` when the signature check fails or the token
///   structure cannot be parsed
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Malformed(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
