/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new user
/// - `POST /api/auth/login` - Login with email and password
///
/// Both return the same token envelope:
///
/// ```json
/// {
///   "access_token": "eyJ...",
///   "token_type": "bearer",
///   "user": { "id": 42, "email": "user@example.com", "name": "John Doe" }
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Public view of a user, embedded in the token envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct UserPublic {
    /// User id
    pub id: i64,

    /// Email address
    pub email: String,

    /// Display name
    pub name: String,
}

/// Token envelope returned by both register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed access token
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,

    /// The authenticated user
    pub user: UserPublic,
}

impl AuthResponse {
    fn new(access_token: String, user: &User) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user: UserPublic {
                id: user.id,
                email: user.email.clone(),
                name: user.name.clone(),
            },
        }
    }
}

/// Register a new user
///
/// # Errors
///
/// - `409 Conflict`: email already registered
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    // Refuse early with a clear conflict; the unique constraint still backs
    // this up against races
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict(
            "A user with this email already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            name: req.name,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Registered new user");

    let access_token = jwt::issue_token(
        &user.id.to_string(),
        &user.email,
        state.token_ttl(),
        state.jwt_secret(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(access_token, &user)),
    ))
}

/// Login with email and password
///
/// The response does not distinguish an unknown email from a wrong password.
///
/// # Errors
///
/// - `401 Unauthorized`: bad credentials
/// - `422 Unprocessable Entity`: validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Incorrect email or password".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized(
            "Incorrect email or password".to_string(),
        ));
    }

    tracing::debug!(user_id = user.id, "User logged in");

    let access_token = jwt::issue_token(
        &user.id.to_string(),
        &user.email,
        state.token_ttl(),
        state.jwt_secret(),
    )?;

    Ok(Json(AuthResponse::new(access_token, &user)))
}
