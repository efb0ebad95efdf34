//! Social endpoints: feed, posts, reactions, comments and messages

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::dto::{FeedResponse, MessageResponse, ReactRequest, ReactionsResponse, TextRequest};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{Comment, Message, Post};
use crate::error::AppError;

/// GET /api/social/feed
pub async fn feed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<FeedResponse> {
    Json(state.timeline_service().feed(&user.id).await)
}

/// GET /api/social/posts
pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.post_service().list().await)
}

/// POST /api/social/posts
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<TextRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let post = state.post_service().create(&user.id, &body.text).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/social/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    Ok(Json(state.post_service().get(&id).await?))
}

/// PUT /api/social/posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<TextRequest>,
) -> Result<Json<Post>, AppError> {
    let post = state
        .post_service()
        .update(&id, &user.id, &body.text)
        .await?;
    Ok(Json(post))
}

/// DELETE /api/social/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.post_service().delete(&id, &user.id).await?;
    Ok(Json(MessageResponse::new("post deleted")))
}

/// POST /api/social/posts/:id/react
///
/// The body is optional; a missing or unreadable body means "like".
pub async fn react(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    body: Option<Json<ReactRequest>>,
) -> Result<Json<Post>, AppError> {
    let kind = body.and_then(|Json(body)| body.kind);
    let post = state
        .post_service()
        .react(&id, &user.id, kind.as_deref())
        .await?;
    Ok(Json(post))
}

/// GET /api/social/posts/:id/reactions
pub async fn reactions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReactionsResponse>, AppError> {
    let reactions = state.post_service().reactions(&id).await?;
    Ok(Json(ReactionsResponse { reactions }))
}

/// POST /api/social/posts/:id/comments
pub async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<TextRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = state
        .post_service()
        .add_comment(&id, &user.id, &body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/social/posts/:id/comments
pub async fn comments(State(state): State<AppState>, Path(id): Path<String>) -> Json<Vec<Comment>> {
    Json(state.post_service().comments(&id).await)
}

/// GET /api/messages
pub async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Json<Vec<Message>> {
    Json(state.post_service().messages().await)
}

/// POST /api/messages
pub async fn create_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<TextRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let message = state
        .post_service()
        .send_message(&user.id, &body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
