//! User and follow-graph endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};

use super::dto::{IdentityListResponse, OkResponse, SearchParams, SearchResponse};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{ProfilePatch, User};
use crate::error::AppError;

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.account_service().list().await)
}

/// GET /api/users/search?q=&limit=
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let users = state
        .account_service()
        .search(&params.q, params.limit())
        .await;
    Json(SearchResponse {
        count: users.len(),
        users,
    })
}

/// GET /api/users/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// PUT /api/users/me
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<User>, AppError> {
    let user = state
        .account_service()
        .update_profile(&user.id, patch)
        .await?;
    Ok(Json(user))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.account_service().get_active(&id).await?))
}

/// GET /api/users/:id/following
pub async fn following(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<IdentityListResponse> {
    Json(state.timeline_service().following(&id).await.into())
}

/// GET /api/users/:id/followers
pub async fn followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<IdentityListResponse> {
    Json(state.timeline_service().followers(&id).await.into())
}

/// POST /api/users/:id/follow
pub async fn follow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(target): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    state.timeline_service().follow(&user.id, &target).await?;
    Ok(Json(OkResponse::ok()))
}

/// DELETE /api/users/:id/follow
pub async fn unfollow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(target): Path<String>,
) -> Json<OkResponse> {
    state.timeline_service().unfollow(&user.id, &target).await;
    Json(OkResponse::ok())
}
