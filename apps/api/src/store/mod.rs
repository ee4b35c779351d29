//! Graph store adapter. The boundary between the service and persisted users,
//! posts and SIMILAR_CONTENT edges.
//!
//! `AppState` holds an `Arc<dyn GraphStore>`. Production uses [`PgGraphStore`];
//! tests run against the in-memory implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::graph::{SimilarityEdge, UserActivity, UserCorpus};
use crate::models::post::{Post, RecentPost, Sentiment};
use crate::models::user::User;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgGraphStore;

/// Separator placed between a user's posts when building their corpus document.
pub const CORPUS_SEPARATOR: &str = " ";

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Cheap round-trip proving the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;

    /// Creates the user or renames an existing one (merge on `user_id`).
    async fn upsert_user(&self, user_id: &str, name: &str) -> Result<User, AppError>;

    /// All users, sorted by name.
    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    async fn count_users(&self) -> Result<i64, AppError>;

    /// Persists a new post. Fails with `NotFound` when the user does not exist.
    async fn insert_post(
        &self,
        user_id: &str,
        content: &str,
        sentiment: Sentiment,
    ) -> Result<Post, AppError>;

    /// Direct fetch; returns soft-deleted posts too.
    async fn get_post(&self, post_id: Uuid) -> Result<Post, AppError>;

    /// A user's posts, newest first.
    async fn list_user_posts(&self, user_id: &str) -> Result<Vec<Post>, AppError>;

    /// Newest posts that are not soft-deleted, with their author's name.
    async fn list_recent_posts(&self, limit: i64) -> Result<Vec<RecentPost>, AppError>;

    async fn soft_delete_post(&self, post_id: Uuid) -> Result<Post, AppError>;

    async fn restore_post(&self, post_id: Uuid) -> Result<Post, AppError>;

    /// One document per user that has at least one post, ordered by `user_id`.
    /// Post contents are joined with [`CORPUS_SEPARATOR`] in timestamp order.
    async fn list_users_with_posts(&self, include_deleted: bool)
        -> Result<Vec<UserCorpus>, AppError>;

    /// Deletes every SIMILAR_CONTENT edge and inserts `edges`, atomically.
    /// On error the previous edge set is left intact.
    async fn replace_similarity_edges(&self, edges: &[SimilarityEdge]) -> Result<(), AppError>;

    async fn list_similarity_edges(&self) -> Result<Vec<SimilarityEdge>, AppError>;

    /// Every user with all of their posts' content and sentiment.
    async fn list_user_activity(&self) -> Result<Vec<UserActivity>, AppError>;

    /// Releases pooled resources. Called once at shutdown.
    async fn close(&self);
}
