//! Relationship recomputation: rebuilds every SIMILAR_CONTENT edge from the
//! full post corpus.
//!
//! A run reads one document per user, vectorizes them with TF-IDF, scores every
//! pair by cosine similarity and replaces the whole edge set in one atomic store
//! call. Runs are serialized by `lock`, which is held for the entire run, so two
//! racing post creations never interleave their reads and writes. Nothing else
//! in the service takes this lock.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::CorpusPolicy;
use crate::errors::AppError;
use crate::similarity::engine::{candidate_edges, similarity_matrix};
use crate::similarity::vectorizer::{informative_documents, vectorize};
use crate::store::GraphStore;

/// Minimum number of users with usable post text for a run to touch edges.
pub const MIN_CORPUS_USERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecomputeState {
    Idle,
    Recomputing,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecomputeOutcome {
    /// Edges were replaced; `edges` may be zero, which cleared the set.
    Updated { users: usize, edges: usize },
    /// Not enough data; the existing edges were left untouched.
    Skipped { users: usize },
}

/// Status of the secondary relationship update after a post was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RelationshipStatus {
    Updated { users: usize, edges: usize },
    Skipped { users: usize },
    Failed { error: String },
}

impl From<RecomputeOutcome> for RelationshipStatus {
    fn from(outcome: RecomputeOutcome) -> Self {
        match outcome {
            RecomputeOutcome::Updated { users, edges } => RelationshipStatus::Updated { users, edges },
            RecomputeOutcome::Skipped { users } => RelationshipStatus::Skipped { users },
        }
    }
}

pub struct Recomputer {
    store: Arc<dyn GraphStore>,
    threshold: f64,
    policy: CorpusPolicy,
    lock: Mutex<()>,
}

impl Recomputer {
    pub fn new(store: Arc<dyn GraphStore>, threshold: f64, policy: CorpusPolicy) -> Self {
        Self {
            store,
            threshold,
            policy,
            lock: Mutex::new(()),
        }
    }

    pub fn state(&self) -> RecomputeState {
        match self.lock.try_lock() {
            Ok(_) => RecomputeState::Idle,
            Err(_) => RecomputeState::Recomputing,
        }
    }

    /// Runs one full recomputation. Any failure aborts the run before or inside
    /// the atomic edge replacement and is returned as `AppError::Recomputation`.
    pub async fn run(&self) -> Result<RecomputeOutcome, AppError> {
        let _running = self.lock.lock().await;

        let corpus = self
            .store
            .list_users_with_posts(self.policy.include_deleted())
            .await
            .map_err(|e| AppError::Recomputation(format!("reading corpus: {e}")))?;

        let documents: Vec<&str> = corpus.iter().map(|c| c.content.as_str()).collect();
        let informative = informative_documents(&documents);
        if corpus.len() < MIN_CORPUS_USERS || informative < MIN_CORPUS_USERS {
            debug!(
                users = corpus.len(),
                informative, "Not enough users with posts to create relationships"
            );
            return Ok(RecomputeOutcome::Skipped { users: corpus.len() });
        }

        let matrix = vectorize(&documents);
        let similarity = similarity_matrix(&matrix);
        let user_ids: Vec<String> = corpus.into_iter().map(|c| c.user_id).collect();
        let edges = candidate_edges(&user_ids, &similarity, self.threshold);

        self.store
            .replace_similarity_edges(&edges)
            .await
            .map_err(|e| AppError::Recomputation(format!("replacing edges: {e}")))?;

        if edges.is_empty() {
            info!(users = user_ids.len(), "No relationships met the similarity threshold");
        } else {
            info!(
                users = user_ids.len(),
                edges = edges.len(),
                vocabulary = matrix.vocabulary.len(),
                "Recomputed similarity relationships"
            );
        }

        Ok(RecomputeOutcome::Updated {
            users: user_ids.len(),
            edges: edges.len(),
        })
    }

    /// Runs a recomputation on the post-creation path. Failures are logged and
    /// reported in the returned status, never propagated.
    pub async fn refresh_after_post(&self) -> RelationshipStatus {
        match self.run().await {
            Ok(outcome) => outcome.into(),
            Err(e) => {
                error!("Error updating relationships: {e}");
                RelationshipStatus::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
