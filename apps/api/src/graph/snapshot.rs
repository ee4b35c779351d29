use crate::errors::AppError;
use crate::models::graph::{GraphNode, GraphSnapshot};
use crate::models::post::Sentiment;
use crate::store::GraphStore;

/// Majority vote of positive against negative posts. Neutral posts do not vote;
/// a tie or no posts at all is neutral.
pub fn aggregate_sentiment<I>(sentiments: I) -> Sentiment
where
    I: IntoIterator<Item = Sentiment>,
{
    let (pos, neg) = sentiments
        .into_iter()
        .fold((0usize, 0usize), |(pos, neg), s| match s {
            Sentiment::Positive => (pos + 1, neg),
            Sentiment::Negative => (pos, neg + 1),
            Sentiment::Neutral => (pos, neg),
        });

    match pos.cmp(&neg) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Every user as a node with aggregate sentiment and raw post contents, plus
/// the current SIMILAR_CONTENT edges.
pub async fn build_snapshot(store: &dyn GraphStore) -> Result<GraphSnapshot, AppError> {
    let activity = store.list_user_activity().await?;
    let edges = store.list_similarity_edges().await?;

    let nodes = activity
        .into_iter()
        .map(|user| GraphNode {
            sentiment: aggregate_sentiment(user.posts.iter().map(|(_, s)| *s)),
            contents: user.posts.into_iter().map(|(content, _)| content).collect(),
            id: user.user_id,
            name: user.name,
        })
        .collect();

    Ok(GraphSnapshot { nodes, edges })
}
