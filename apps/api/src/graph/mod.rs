// Similarity graph: recomputation of SIMILAR_CONTENT edges and the snapshot view.

pub mod handlers;
pub mod recompute;
pub mod snapshot;
