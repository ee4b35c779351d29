//! In-memory `GraphStore` used by the test suite, with failure injection hooks.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::graph::{SimilarityEdge, UserActivity, UserCorpus};
use crate::models::post::{Post, RecentPost, Sentiment};
use crate::models::user::User;
use crate::store::{GraphStore, CORPUS_SEPARATOR};

#[derive(Default)]
struct Inner {
    users: BTreeMap<String, String>,
    /// Insertion order; timestamps are strictly increasing.
    posts: Vec<Post>,
    edges: BTreeSet<SimilarityEdge>,
    last_timestamp: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct MemoryGraphStore {
    inner: Mutex<Inner>,
    edge_replacements: AtomicUsize,
    /// When set, edge replacement fails after inserting this many edges.
    fail_edge_insert_after: Mutex<Option<usize>>,
    fail_corpus_reads: AtomicBool,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `replace_similarity_edges` calls that reached the write phase.
    pub fn edge_replacements(&self) -> usize {
        self.edge_replacements.load(Ordering::SeqCst)
    }

    pub fn fail_edge_insert_after(&self, inserted: Option<usize>) {
        *self.fail_edge_insert_after.lock().unwrap() = inserted;
    }

    pub fn fail_corpus_reads(&self, fail: bool) {
        self.fail_corpus_reads.store(fail, Ordering::SeqCst);
    }

    /// Seeds the edge set directly, bypassing replacement bookkeeping.
    pub fn seed_edges(&self, edges: &[SimilarityEdge]) {
        self.inner.lock().unwrap().edges = edges.iter().cloned().collect();
    }

    pub fn edges(&self) -> Vec<SimilarityEdge> {
        self.inner.lock().unwrap().edges.iter().cloned().collect()
    }

    pub fn post_count(&self) -> usize {
        self.inner.lock().unwrap().posts.len()
    }

    fn update_post<F>(&self, post_id: Uuid, f: F) -> Result<Post, AppError>
    where
        F: FnOnce(&mut Post),
    {
        let mut inner = self.inner.lock().unwrap();
        let post = inner
            .posts
            .iter_mut()
            .find(|p| p.post_id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))?;
        f(post);
        Ok(post.clone())
    }
}

fn is_deleted(post: &Post) -> bool {
    post.deleted.unwrap_or(false)
}

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    posts
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn upsert_user(&self, user_id: &str, name: &str) -> Result<User, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.users.insert(user_id.to_string(), name.to_string());
        Ok(User {
            user_id: user_id.to_string(),
            name: name.to_string(),
        })
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut users: Vec<User> = inner
            .users
            .iter()
            .map(|(user_id, name)| User {
                user_id: user_id.clone(),
                name: name.clone(),
            })
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.user_id.cmp(&b.user_id)));
        Ok(users)
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(self.inner.lock().unwrap().users.len() as i64)
    }

    async fn insert_post(
        &self,
        user_id: &str,
        content: &str,
        sentiment: Sentiment,
    ) -> Result<Post, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.users.contains_key(user_id) {
            return Err(AppError::NotFound(format!("User {user_id} not found")));
        }

        let now = Utc::now();
        let timestamp = match inner.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        inner.last_timestamp = Some(timestamp);

        let post = Post {
            post_id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            sentiment,
            timestamp,
            deleted: None,
            deleted_at: None,
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Post, AppError> {
        self.inner
            .lock()
            .unwrap()
            .posts
            .iter()
            .find(|p| p.post_id == post_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))
    }

    async fn list_user_posts(&self, user_id: &str) -> Result<Vec<Post>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(newest_first(
            inner
                .posts
                .iter()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_recent_posts(&self, limit: i64) -> Result<Vec<RecentPost>, AppError> {
        let inner = self.inner.lock().unwrap();
        let live = newest_first(inner.posts.iter().filter(|p| !is_deleted(p)).cloned().collect());
        Ok(live
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|post| RecentPost {
                user_name: inner.users.get(&post.user_id).cloned().unwrap_or_default(),
                post,
            })
            .collect())
    }

    async fn soft_delete_post(&self, post_id: Uuid) -> Result<Post, AppError> {
        self.update_post(post_id, |p| {
            p.deleted = Some(true);
            p.deleted_at = Some(Utc::now());
        })
    }

    async fn restore_post(&self, post_id: Uuid) -> Result<Post, AppError> {
        self.update_post(post_id, |p| {
            p.deleted = None;
            p.deleted_at = None;
        })
    }

    async fn list_users_with_posts(
        &self,
        include_deleted: bool,
    ) -> Result<Vec<UserCorpus>, AppError> {
        if self.fail_corpus_reads.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!("injected corpus read failure")));
        }

        let inner = self.inner.lock().unwrap();
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for post in inner
            .posts
            .iter()
            .filter(|p| include_deleted || !is_deleted(p))
        {
            grouped.entry(&post.user_id).or_default().push(&post.content);
        }

        Ok(grouped
            .into_iter()
            .map(|(user_id, contents)| UserCorpus {
                user_id: user_id.to_string(),
                content: contents.join(CORPUS_SEPARATOR),
            })
            .collect())
    }

    async fn replace_similarity_edges(&self, edges: &[SimilarityEdge]) -> Result<(), AppError> {
        self.edge_replacements.fetch_add(1, Ordering::SeqCst);
        let fail_after = *self.fail_edge_insert_after.lock().unwrap();

        let mut inner = self.inner.lock().unwrap();
        // Stage the new set and swap it in only once every insert succeeded.
        let mut staged = BTreeSet::new();
        for (inserted, edge) in edges.iter().enumerate() {
            if fail_after == Some(inserted) {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "injected failure after {inserted} edge inserts"
                )));
            }
            if inner.users.contains_key(&edge.source) && inner.users.contains_key(&edge.target) {
                staged.insert(edge.clone());
            }
        }
        inner.edges = staged;
        Ok(())
    }

    async fn list_similarity_edges(&self) -> Result<Vec<SimilarityEdge>, AppError> {
        Ok(self.edges())
    }

    async fn list_user_activity(&self) -> Result<Vec<UserActivity>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .map(|(user_id, name)| UserActivity {
                user_id: user_id.clone(),
                name: name.clone(),
                posts: inner
                    .posts
                    .iter()
                    .filter(|p| &p.user_id == user_id)
                    .map(|p| (p.content.clone(), p.sentiment))
                    .collect(),
            })
            .collect())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> MemoryGraphStore {
        let store = MemoryGraphStore::new();
        store.upsert_user("a", "Ann").await.unwrap();
        store.upsert_user("b", "Bob").await.unwrap();
        store.seed_edges(&[SimilarityEdge::new("a", "b"), SimilarityEdge::new("b", "a")]);
        store
    }

    #[tokio::test]
    async fn test_replace_edges_swaps_whole_set() {
        let store = seeded().await;
        store
            .replace_similarity_edges(&[SimilarityEdge::new("a", "b")])
            .await
            .unwrap();
        assert_eq!(store.edges(), vec![SimilarityEdge::new("a", "b")]);
    }

    #[tokio::test]
    async fn test_mid_write_failure_keeps_previous_edges() {
        let store = seeded().await;
        store.upsert_user("c", "Cy").await.unwrap();
        let before = store.edges();

        store.fail_edge_insert_after(Some(1));
        let result = store
            .replace_similarity_edges(&[SimilarityEdge::new("a", "c"), SimilarityEdge::new("c", "a")])
            .await;

        assert!(result.is_err());
        assert_eq!(store.edges(), before);
    }

    #[tokio::test]
    async fn test_edges_to_unknown_users_are_dropped() {
        let store = seeded().await;
        store
            .replace_similarity_edges(&[SimilarityEdge::new("a", "ghost")])
            .await
            .unwrap();
        assert!(store.edges().is_empty());
    }

    #[tokio::test]
    async fn test_corpus_joins_posts_in_order_and_respects_policy() {
        let store = seeded().await;
        store.insert_post("a", "first", Sentiment::Neutral).await.unwrap();
        let second = store.insert_post("a", "second", Sentiment::Neutral).await.unwrap();
        store.soft_delete_post(second.post_id).await.unwrap();

        let all = store.list_users_with_posts(true).await.unwrap();
        assert_eq!(
            all,
            vec![UserCorpus {
                user_id: "a".to_string(),
                content: "first second".to_string()
            }]
        );

        let active = store.list_users_with_posts(false).await.unwrap();
        assert_eq!(active[0].content, "first");
    }
}
