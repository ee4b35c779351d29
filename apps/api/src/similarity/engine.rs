use crate::models::graph::SimilarityEdge;
use crate::similarity::vectorizer::TfIdfMatrix;

pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// Cosine similarity of two equal-length vectors. A zero vector is similar to nothing.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Square, symmetric similarity matrix over the rows of `m`. The diagonal is 1.
pub fn similarity_matrix(m: &TfIdfMatrix) -> Vec<Vec<f64>> {
    let n = m.rows.len();
    let mut s = vec![vec![0.0; n]; n];
    for i in 0..n {
        s[i][i] = 1.0;
        for j in (i + 1)..n {
            let v = cosine(&m.rows[i], &m.rows[j]);
            s[i][j] = v;
            s[j][i] = v;
        }
    }
    s
}

/// Emits an edge `ids[i] → ids[j]` for every ordered pair with `i != j` whose
/// similarity is strictly above `threshold`.
///
/// Both directions are checked and emitted on their own; no symmetric
/// de-duplication is applied.
pub fn candidate_edges(ids: &[String], similarity: &[Vec<f64>], threshold: f64) -> Vec<SimilarityEdge> {
    let mut edges = Vec::new();
    for (i, row) in similarity.iter().enumerate() {
        for (j, &score) in row.iter().enumerate() {
            if i != j && score > threshold {
                edges.push(SimilarityEdge::new(ids[i].clone(), ids[j].clone()));
            }
        }
    }
    edges
}
