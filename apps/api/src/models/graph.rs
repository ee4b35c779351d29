use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::post::Sentiment;

/// Directed SIMILAR_CONTENT relation between two users.
///
/// Edges form a set of ordered pairs: `a → b` and `b → a` are distinct edges
/// even though the underlying cosine score is symmetric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, FromRow)]
pub struct SimilarityEdge {
    pub source: String,
    pub target: String,
}

impl SimilarityEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// One user's aggregated post text, the unit document of the similarity corpus.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserCorpus {
    pub user_id: String,
    pub content: String,
}

/// A user with every post's content and sentiment, in timestamp order.
#[derive(Debug, Clone, PartialEq)]
pub struct UserActivity {
    pub user_id: String,
    pub name: String,
    pub posts: Vec<(String, Sentiment)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub sentiment: Sentiment,
    pub contents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<SimilarityEdge>,
}
