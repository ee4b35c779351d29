use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::graph::recompute::{Recomputer, RelationshipStatus};
use crate::models::post::{Post, RecentPost};
use crate::sentiment;
use crate::store::GraphStore;

pub const MAX_RECENT_POSTS: i64 = 100;

/// Outcome of `create_post`. The post is durably stored whenever this value
/// exists; `relationships` reports the best-effort edge recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct PostCreated {
    pub post: Post,
    pub relationships: RelationshipStatus,
}

/// Scores and stores a new post, then recomputes similarity edges inline.
///
/// Fails only when the post itself cannot be stored (`NotFound` for an unknown
/// user, store errors). A failed recomputation is logged and surfaced in
/// `PostCreated::relationships`.
pub async fn create_post(
    store: &dyn GraphStore,
    recomputer: &Recomputer,
    user_id: &str,
    content: &str,
) -> Result<PostCreated, AppError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation("user_id must not be empty".to_string()));
    }

    let sentiment = sentiment::score(content);
    debug!("Creating post for user {user_id} with sentiment {}", sentiment.as_str());

    let post = store.insert_post(user_id, content, sentiment).await?;
    info!(post_id = %post.post_id, user_id, "Post created");

    let relationships = recomputer.refresh_after_post().await;
    Ok(PostCreated { post, relationships })
}

pub async fn get_post(store: &dyn GraphStore, post_id: Uuid) -> Result<Post, AppError> {
    store.get_post(post_id).await
}

pub async fn list_user_posts(store: &dyn GraphStore, user_id: &str) -> Result<Vec<Post>, AppError> {
    store.list_user_posts(user_id).await
}

/// Newest live posts; `limit` is clamped to `1..=MAX_RECENT_POSTS`.
pub async fn list_recent_posts(store: &dyn GraphStore, limit: i64) -> Result<Vec<RecentPost>, AppError> {
    store.list_recent_posts(limit.clamp(1, MAX_RECENT_POSTS)).await
}

pub async fn soft_delete_post(store: &dyn GraphStore, post_id: Uuid) -> Result<Post, AppError> {
    let post = store.soft_delete_post(post_id).await?;
    info!("Soft-deleted post {post_id}");
    Ok(post)
}

pub async fn restore_post(store: &dyn GraphStore, post_id: Uuid) -> Result<Post, AppError> {
    let post = store.restore_post(post_id).await?;
    info!("Restored post {post_id}");
    Ok(post)
}
