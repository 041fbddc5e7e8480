/// Authentication and authorization utilities
///
/// This module provides the security primitives for Taskdeck:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token issuing and validation
/// - [`extractor`]: Bearer token extraction from the Authorization header
/// - [`guard`]: Resource ownership checks
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with configurable expiration and zero
///   clock-skew leeway
/// - **Ownership**: canonical string comparison between the path-declared
///   owner and the token subject
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::password::{hash_password, verify_password};
/// use taskdeck_shared::auth::jwt::{issue_token, validate_token};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash));
///
/// // Token round trip
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let token = issue_token("42", "user@example.com", Duration::minutes(30), secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, "42");
/// # Ok(())
/// # }
/// ```

pub mod extractor;
pub mod guard;
pub mod jwt;
pub mod password;
