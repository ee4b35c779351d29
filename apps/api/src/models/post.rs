use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Sentiment label assigned to a post once, at creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Lenient parse for stored values; anything unrecognised reads as neutral.
    pub fn from_stored(s: &str) -> Self {
        match s {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

/// A post as exposed by every operation.
///
/// `deleted` and `deleted_at` are only present while the post is soft-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: Uuid,
    pub user_id: String,
    pub content: String,
    pub sentiment: Sentiment,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Row shape of the `posts` table.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub post_id: Uuid,
    pub user_id: String,
    pub content: String,
    pub sentiment: String,
    pub timestamp: DateTime<Utc>,
    pub deleted: Option<bool>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            post_id: row.post_id,
            user_id: row.user_id,
            content: row.content,
            sentiment: Sentiment::from_stored(&row.sentiment),
            timestamp: row.timestamp,
            deleted: row.deleted,
            deleted_at: row.deleted_at,
        }
    }
}

/// A live post together with its author, for the recent-posts feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentPost {
    #[serde(flatten)]
    pub post: Post,
    pub user_name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecentPostRow {
    #[sqlx(flatten)]
    pub post: PostRow,
    pub user_name: String,
}

impl From<RecentPostRow> for RecentPost {
    fn from(row: RecentPostRow) -> Self {
        RecentPost {
            post: row.post.into(),
            user_name: row.user_name,
        }
    }
}
