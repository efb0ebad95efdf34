//! Authentication endpoints

use axum::{Json, extract::State, http::StatusCode};

use super::dto::{AuthResponse, MessageResponse, TokenResponse};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::User;
use crate::error::AppError;
use crate::service::{Credentials, Registration, Session};

fn auth_response(state: &AppState, session: Session) -> AuthResponse {
    AuthResponse {
        token: session.token,
        expires_in: state.tokens.ttl_seconds(),
        user: session.user.into(),
    }
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let session = state.account_service().register(registration).await?;
    Ok((StatusCode::CREATED, Json(auth_response(&state, session))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = state.account_service().login(credentials).await?;
    Ok(Json(auth_response(&state, session)))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.account_service().refresh(&user)?;
    Ok(Json(TokenResponse {
        token,
        expires_in: state.tokens.ttl_seconds(),
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(CurrentUser(user): CurrentUser) -> Json<MessageResponse> {
    tracing::info!(user_id = %user.id, "User logged out");
    Json(MessageResponse::new("logged out successfully"))
}

/// GET /api/auth/profile
pub async fn profile(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
