// Content similarity between users: TF-IDF vectorization of each user's
// aggregated post text, pairwise cosine similarity, threshold into edges.

pub mod engine;
pub mod vectorizer;
