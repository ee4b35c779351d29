//! Axum route handlers for users and posts.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::post::{Post, RecentPost};
use crate::models::user::User;
use crate::social::posts::{self, PostCreated};
use crate::social::users;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub user_id: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub success: bool,
    #[serde(flatten)]
    pub created: PostCreated,
}

#[derive(Debug, Serialize)]
pub struct PostMutationResponse {
    pub success: bool,
    pub message: String,
    pub post: Post,
}

#[derive(Debug, Deserialize)]
pub struct RecentPostsQuery {
    pub limit: Option<i64>,
}

/// A path segment that is not a UUID can never name a stored post.
fn parse_post_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Post {raw} not found")))
}

fn require(field: Option<String>, name: &str) -> Result<String, AppError> {
    field.ok_or_else(|| AppError::Validation(format!("Missing required field: {name}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/users
pub async fn handle_list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(users::list_users(state.store.as_ref()).await?))
}

/// POST /api/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, AppError> {
    let user_id = require(req.user_id, "user_id")?;
    let name = require(req.name, "name")?;
    let user = users::create_user(state.store.as_ref(), &user_id, &name).await?;
    Ok(Json(CreateUserResponse { success: true, user }))
}

/// GET /api/users/:user_id/posts
pub async fn handle_list_user_posts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(posts::list_user_posts(state.store.as_ref(), &user_id).await?))
}

/// POST /api/posts
pub async fn handle_create_post(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> Result<Json<CreatePostResponse>, AppError> {
    let user_id = require(req.user_id, "user_id")?;
    let content = require(req.content, "content")?;
    let created =
        posts::create_post(state.store.as_ref(), &state.recomputer, &user_id, &content).await?;
    Ok(Json(CreatePostResponse {
        success: true,
        created,
    }))
}

/// GET /api/posts/:post_id
pub async fn handle_get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Post>, AppError> {
    Ok(Json(posts::get_post(state.store.as_ref(), parse_post_id(&post_id)?).await?))
}

/// DELETE /api/posts/:post_id
pub async fn handle_delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<PostMutationResponse>, AppError> {
    let post = posts::soft_delete_post(state.store.as_ref(), parse_post_id(&post_id)?).await?;
    Ok(Json(PostMutationResponse {
        success: true,
        message: "Post deleted successfully".to_string(),
        post,
    }))
}

/// POST /api/posts/:post_id/restore
pub async fn handle_restore_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<PostMutationResponse>, AppError> {
    let post = posts::restore_post(state.store.as_ref(), parse_post_id(&post_id)?).await?;
    Ok(Json(PostMutationResponse {
        success: true,
        message: "Post restored successfully".to_string(),
        post,
    }))
}

/// GET /api/recent-posts?limit=N
pub async fn handle_recent_posts(
    State(state): State<AppState>,
    Query(params): Query<RecentPostsQuery>,
) -> Result<Json<Vec<RecentPost>>, AppError> {
    let limit = params.limit.unwrap_or(state.config.recent_posts_limit);
    Ok(Json(posts::list_recent_posts(state.store.as_ref(), limit).await?))
}
