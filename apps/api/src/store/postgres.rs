use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::graph::{SimilarityEdge, UserActivity, UserCorpus};
use crate::models::post::{Post, PostRow, RecentPost, RecentPostRow, Sentiment};
use crate::models::user::User;
use crate::store::{GraphStore, CORPUS_SEPARATOR};

/// Transaction-scoped advisory lock key guarding SIMILAR_CONTENT rewrites.
const EDGE_REWRITE_LOCK_KEY: i64 = 0x5349_4d5f_4544_4745; // "SIM_EDGE"

const POST_COLUMNS: &str = "post_id, user_id, content, sentiment, timestamp, deleted, deleted_at";

/// PostgreSQL-backed graph store. Owns the connection pool for the process.
#[derive(Clone)]
pub struct PgGraphStore {
    pool: PgPool,
}

impl PgGraphStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("migration failed: {e}")))?;
        info!("Schema migrations applied");
        Ok(())
    }
}

#[derive(FromRow)]
struct ActivityRow {
    user_id: String,
    name: String,
    contents: Vec<String>,
    sentiments: Vec<String>,
}

#[async_trait]
impl GraphStore for PgGraphStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn upsert_user(&self, user_id: &str, name: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, name)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET name = EXCLUDED.name
            RETURNING user_id, name
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        debug!("Upserted user {user_id}");
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT user_id, name FROM users ORDER BY name, user_id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn insert_post(
        &self,
        user_id: &str,
        content: &str,
        sentiment: Sentiment,
    ) -> Result<Post, AppError> {
        let row: Option<PostRow> = sqlx::query_as(&format!(
            r#"
            INSERT INTO posts (post_id, user_id, content, sentiment)
            SELECT $1, u.user_id, $3, $4
            FROM users u
            WHERE u.user_id = $2
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(content)
        .bind(sentiment.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Post::from)
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Post, AppError> {
        let row: Option<PostRow> =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE post_id = $1"))
                .bind(post_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Post::from)
            .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))
    }

    async fn list_user_posts(&self, user_id: &str) -> Result<Vec<Post>, AppError> {
        let rows: Vec<PostRow> = sqlx::query_as(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = $1 ORDER BY timestamp DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn list_recent_posts(&self, limit: i64) -> Result<Vec<RecentPost>, AppError> {
        let rows: Vec<RecentPostRow> = sqlx::query_as(
            r#"
            SELECT p.post_id, p.user_id, p.content, p.sentiment, p.timestamp,
                   p.deleted, p.deleted_at, u.name AS user_name
            FROM posts p
            JOIN users u ON u.user_id = p.user_id
            WHERE p.deleted IS NOT TRUE
            ORDER BY p.timestamp DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RecentPost::from).collect())
    }

    async fn soft_delete_post(&self, post_id: Uuid) -> Result<Post, AppError> {
        let row: Option<PostRow> = sqlx::query_as(&format!(
            r#"
            UPDATE posts SET deleted = TRUE, deleted_at = now()
            WHERE post_id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Post::from)
            .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))
    }

    async fn restore_post(&self, post_id: Uuid) -> Result<Post, AppError> {
        let row: Option<PostRow> = sqlx::query_as(&format!(
            r#"
            UPDATE posts SET deleted = NULL, deleted_at = NULL
            WHERE post_id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Post::from)
            .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))
    }

    async fn list_users_with_posts(
        &self,
        include_deleted: bool,
    ) -> Result<Vec<UserCorpus>, AppError> {
        Ok(sqlx::query_as::<_, UserCorpus>(
            r#"
            SELECT u.user_id, string_agg(p.content, $2 ORDER BY p.timestamp) AS content
            FROM users u
            JOIN posts p ON p.user_id = u.user_id
            WHERE $1 OR p.deleted IS NOT TRUE
            GROUP BY u.user_id
            ORDER BY u.user_id
            "#,
        )
        .bind(include_deleted)
        .bind(CORPUS_SEPARATOR)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn replace_similarity_edges(&self, edges: &[SimilarityEdge]) -> Result<(), AppError> {
        let sources: Vec<String> = edges.iter().map(|e| e.source.clone()).collect();
        let targets: Vec<String> = edges.iter().map(|e| e.target.clone()).collect();

        // Dropping `tx` on an early return rolls back, leaving the old edges in place.
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(EDGE_REWRITE_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let removed = sqlx::query("DELETE FROM similar_content")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let inserted = sqlx::query(
            r#"
            INSERT INTO similar_content (source_user_id, target_user_id)
            SELECT e.source, e.target
            FROM UNNEST($1::text[], $2::text[]) AS e(source, target)
            JOIN users s ON s.user_id = e.source
            JOIN users t ON t.user_id = e.target
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&sources)
        .bind(&targets)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        debug!(removed, inserted, "Replaced SIMILAR_CONTENT edges");
        Ok(())
    }

    async fn list_similarity_edges(&self) -> Result<Vec<SimilarityEdge>, AppError> {
        Ok(sqlx::query_as::<_, SimilarityEdge>(
            r#"
            SELECT source_user_id AS source, target_user_id AS target
            FROM similar_content
            ORDER BY source_user_id, target_user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_user_activity(&self) -> Result<Vec<UserActivity>, AppError> {
        let rows: Vec<ActivityRow> = sqlx::query_as(
            r#"
            SELECT u.user_id, u.name,
                   COALESCE(array_agg(p.content ORDER BY p.timestamp)
                            FILTER (WHERE p.post_id IS NOT NULL), '{}') AS contents,
                   COALESCE(array_agg(p.sentiment ORDER BY p.timestamp)
                            FILTER (WHERE p.post_id IS NOT NULL), '{}') AS sentiments
            FROM users u
            LEFT JOIN posts p ON p.user_id = u.user_id
            GROUP BY u.user_id, u.name
            ORDER BY u.user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserActivity {
                user_id: row.user_id,
                name: row.name,
                posts: row
                    .contents
                    .into_iter()
                    .zip(row.sentiments.iter().map(|s| Sentiment::from_stored(s)))
                    .collect(),
            })
            .collect())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}
